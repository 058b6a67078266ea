//! Account registration

use tracing::{debug, info};

use crate::ledger::AuthorizationGate;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_account_id;

/// Registers new zero-balance accounts
#[derive(Clone)]
pub struct AccountRegistrar<S: AccountStore + StateStore> {
    storage: S,
    gate: AuthorizationGate<S>,
}

impl<S: AccountStore + StateStore> AccountRegistrar<S> {
    /// Create a new registrar behind `gate`
    pub fn new(storage: S, gate: AuthorizationGate<S>) -> Self {
        Self { storage, gate }
    }

    /// Assign a new account with a zero balance
    pub async fn assign(&self, request: &RequestContext, account_id: &str) -> LedgerResult<Account> {
        debug!(account_id, "assigning account");

        self.gate.require_admin(request, "assign").await?;
        validate_account_id(account_id)?;

        let account = self.storage.insert(account_id, 0).await?;

        info!(account_id, "new account has been added");
        Ok(account)
    }
}
