//! Two-party balance transfers

use tracing::{debug, info};

use crate::ledger::AuthorizationGate;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::parse_amount;

/// Outcome of a transfer that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both balances were committed
    Applied,
    /// Nothing had to be written (zero amount or self transfer)
    Unchanged,
}

/// Moves balance between two accounts
///
/// Both writes of a transfer go to the store as a single fenced batch, so a
/// transfer is either fully applied or not applied at all.
#[derive(Clone)]
pub struct TransferEngine<S: AccountStore + StateStore> {
    storage: S,
    gate: AuthorizationGate<S>,
}

impl<S: AccountStore + StateStore> TransferEngine<S> {
    /// Create a new transfer engine behind `gate`
    pub fn new(storage: S, gate: AuthorizationGate<S>) -> Self {
        Self { storage, gate }
    }

    /// Transfer `amount` (a decimal string) from `from_id` to `to_id`
    pub async fn transfer(
        &self,
        request: &RequestContext,
        from_id: &str,
        to_id: &str,
        amount: &str,
    ) -> LedgerResult<TransferOutcome> {
        debug!(from = from_id, to = to_id, amount, "transfer requested");

        let amount = parse_amount(amount)?;

        // Read both sides before any mutation; their versions fence the commit
        let from = self.storage.get(from_id).await?;
        let to = self.storage.get(to_id).await?;

        self.gate.require_admin(request, "transfer").await?;

        if amount == 0 {
            debug!(from = from_id, to = to_id, "zero amount, nothing to transfer");
            return Ok(TransferOutcome::Unchanged);
        }

        if amount > from.balance {
            debug!(account_id = from_id, balance = from.balance, amount, "balance not enough");
            return Err(LedgerError::InsufficientBalance {
                account_id: from.id,
                requested: amount,
                available: from.balance,
            });
        }

        if from.id == to.id {
            return Ok(TransferOutcome::Unchanged);
        }

        let credited = to.balance.checked_add(amount).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("balance of '{}' would overflow", to.id))
        })?;

        self.storage
            .commit(&[
                BalanceUpdate::fenced(&from, from.balance - amount),
                BalanceUpdate::fenced(&to, credited),
            ])
            .await?;

        info!(from = from_id, to = to_id, amount, "transfer committed");
        Ok(TransferOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    async fn seeded(accounts: &[(&str, i64)]) -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.create_schema().await.unwrap();
        for (id, balance) in accounts {
            storage.insert(id, *balance).await.unwrap();
        }
        storage
    }

    fn engine<S: AccountStore + StateStore + Clone>(storage: S) -> TransferEngine<S> {
        let gate = AuthorizationGate::new(storage.clone(), Arc::new(AllowAll));
        TransferEngine::new(storage, gate)
    }

    async fn balance(storage: &impl AccountStore, id: &str) -> i64 {
        storage.get(id).await.unwrap().balance
    }

    /// Store that lets another writer slip in between a transfer's reads and
    /// its commit.
    #[derive(Clone)]
    struct RacingStorage {
        inner: MemoryStorage,
        raced: Arc<AtomicBool>,
    }

    #[async_trait]
    impl AccountStore for RacingStorage {
        async fn create_schema(&self) -> LedgerResult<()> {
            self.inner.create_schema().await
        }

        async fn drop_schema(&self) -> LedgerResult<()> {
            self.inner.drop_schema().await
        }

        async fn insert(&self, account_id: &str, balance: i64) -> LedgerResult<Account> {
            self.inner.insert(account_id, balance).await
        }

        async fn get(&self, account_id: &str) -> LedgerResult<Account> {
            self.inner.get(account_id).await
        }

        async fn replace(&self, account_id: &str, balance: i64) -> LedgerResult<Account> {
            self.inner.replace(account_id, balance).await
        }

        async fn commit(&self, updates: &[BalanceUpdate]) -> LedgerResult<()> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                // a concurrent spend drains the debited account first
                let from = &updates[0].account_id;
                self.inner.replace(from, 0).await?;
            }
            self.inner.commit(updates).await
        }
    }

    #[async_trait]
    impl StateStore for RacingStorage {
        async fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
            self.inner.get_state(key).await
        }

        async fn put_state(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
            self.inner.put_state(key, value).await
        }
    }

    #[tokio::test]
    async fn test_transfer_conserves_total() {
        let storage = seeded(&[("admin", 1_000), ("alice", 0)]).await;
        let engine = engine(storage.clone());

        let outcome = engine
            .transfer(&RequestContext::default(), "admin", "alice", "250")
            .await
            .unwrap();
        assert_eq!(outcome, TransferOutcome::Applied);
        assert_eq!(balance(&storage, "admin").await, 750);
        assert_eq!(balance(&storage, "alice").await, 250);
    }

    #[tokio::test]
    async fn test_transfer_entire_balance() {
        let storage = seeded(&[("admin", 10), ("alice", 0)]).await;
        let engine = engine(storage.clone());

        engine
            .transfer(&RequestContext::default(), "admin", "alice", "10")
            .await
            .unwrap();
        assert_eq!(balance(&storage, "admin").await, 0);
        assert_eq!(balance(&storage, "alice").await, 10);
    }

    #[tokio::test]
    async fn test_insufficient_balance_changes_nothing() {
        let storage = seeded(&[("admin", 10), ("alice", 0)]).await;
        let engine = engine(storage.clone());

        let err = engine
            .transfer(&RequestContext::default(), "admin", "alice", "11")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { requested: 11, available: 10, .. }
        ));
        assert_eq!(balance(&storage, "admin").await, 10);
        assert_eq!(balance(&storage, "alice").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_accounts_are_not_found() {
        let storage = seeded(&[("admin", 10)]).await;
        let engine = engine(storage.clone());
        let request = RequestContext::default();

        let err = engine.transfer(&request, "ghost", "admin", "1").await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(id) if id == "ghost"));

        let err = engine.transfer(&request, "admin", "ghost", "1").await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(id) if id == "ghost"));

        assert_eq!(balance(&storage, "admin").await, 10);
    }

    #[tokio::test]
    async fn test_zero_and_self_transfers_are_no_ops() {
        let storage = seeded(&[("admin", 10), ("alice", 0)]).await;
        let engine = engine(storage.clone());
        let request = RequestContext::default();

        let outcome = engine.transfer(&request, "admin", "alice", "0").await.unwrap();
        assert_eq!(outcome, TransferOutcome::Unchanged);

        let outcome = engine.transfer(&request, "admin", "admin", "5").await.unwrap();
        assert_eq!(outcome, TransferOutcome::Unchanged);

        // the balance check comes first, even when nothing would move
        let err = engine.transfer(&request, "admin", "admin", "11").await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        let admin = storage.get("admin").await.unwrap();
        assert_eq!(admin.balance, 10);
        assert_eq!(admin.version, Version::INITIAL);
        assert_eq!(balance(&storage, "alice").await, 0);
    }

    #[tokio::test]
    async fn test_bad_amounts_are_invalid_arguments() {
        let storage = seeded(&[("admin", 10), ("alice", 0)]).await;
        let engine = engine(storage.clone());
        let request = RequestContext::default();

        for amount in ["-5", "five", ""] {
            let err = engine
                .transfer(&request, "admin", "alice", amount)
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)), "{amount:?}");
        }
        assert_eq!(balance(&storage, "admin").await, 10);
    }

    #[tokio::test]
    async fn test_credit_overflow_is_rejected() {
        let storage = seeded(&[("admin", 10), ("whale", i64::MAX)]).await;
        let engine = engine(storage.clone());

        let err = engine
            .transfer(&RequestContext::default(), "admin", "whale", "1")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert_eq!(balance(&storage, "admin").await, 10);
    }

    #[tokio::test]
    async fn test_stale_read_is_a_conflict() {
        let inner = seeded(&[("admin", 10), ("alice", 0)]).await;
        let storage = RacingStorage {
            inner: inner.clone(),
            raced: Arc::new(AtomicBool::new(false)),
        };
        let engine = engine(storage);
        let request = RequestContext::default();

        let err = engine
            .transfer(&request, "admin", "alice", "10")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, LedgerError::Conflict { ref account_id, .. } if account_id == "admin"));

        // the racing write stands, the stale debit and its credit do not
        assert_eq!(balance(&inner, "admin").await, 0);
        assert_eq!(balance(&inner, "alice").await, 0);

        // a retry re-reads the drained balance
        let err = engine
            .transfer(&request, "admin", "alice", "10")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }
}
