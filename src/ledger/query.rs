//! Read-only lookups

use tracing::debug;

use crate::traits::*;
use crate::types::*;

/// Balance and raw-state queries
#[derive(Clone)]
pub struct QueryService<S: AccountStore + StateStore> {
    storage: S,
}

impl<S: AccountStore + StateStore> QueryService<S> {
    /// Create a query service over `storage`
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get the balance of an account
    pub async fn get_balance(&self, account_id: &str) -> LedgerResult<i64> {
        let account = self.storage.get(account_id).await?;
        debug!(account_id, balance = account.balance, "balance queried");
        Ok(account.balance)
    }

    /// Read raw host state; an absent key reads as empty bytes
    pub async fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        Ok(self.storage.get_state(key).await?.unwrap_or_default())
    }
}
