//! Administrator gate in front of mutating operations

use std::sync::Arc;
use tracing::warn;

use crate::traits::*;
use crate::types::*;

/// Runs the configured [`AuthorizationPolicy`] against the administrator
/// credential recorded at bootstrap.
#[derive(Clone)]
pub struct AuthorizationGate<S: StateStore> {
    storage: S,
    policy: Arc<dyn AuthorizationPolicy>,
}

impl<S: StateStore> AuthorizationGate<S> {
    /// Create a gate reading the credential from `storage`
    pub fn new(storage: S, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self { storage, policy }
    }

    /// Fail with [`LedgerError::AuthorizationFailed`] unless the request was
    /// signed by the administrator.
    pub async fn require_admin(&self, request: &RequestContext, operation: &str) -> LedgerResult<()> {
        let credential = self.storage.get_state(ADMIN_CREDENTIAL_KEY).await?;
        if self.policy.is_authorized(request, credential.as_deref())? {
            Ok(())
        } else {
            warn!(operation, "caller is not the administrator");
            Err(LedgerError::AuthorizationFailed(format!(
                "the caller of '{}' is not the administrator",
                operation
            )))
        }
    }
}
