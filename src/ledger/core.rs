//! Main ledger orchestrator that wires the store, the gate and the services

use std::sync::Arc;

use crate::auth::{Ed25519Verifier, SignatureAuthorizer};
use crate::config::{AuthorizationMode, LedgerConfig};
use crate::ledger::{
    AccountRegistrar, AuthorizationGate, LedgerInitializer, QueryService, TransferEngine,
    TransferOutcome,
};
use crate::traits::*;
use crate::types::*;

/// Main ledger system that orchestrates all operations over one store
///
/// Every operation takes `&self`; the ledger can be shared between tasks
/// behind an `Arc`.
pub struct Ledger<S: AccountStore + StateStore> {
    initializer: LedgerInitializer<S>,
    registrar: AccountRegistrar<S>,
    transfers: TransferEngine<S>,
    queries: QueryService<S>,
}

impl<S: AccountStore + StateStore + Clone> Ledger<S> {
    /// Create a new ledger with the authorization gate disabled
    pub fn new(storage: S) -> Self {
        Self::with_policy(storage, Arc::new(AllowAll))
    }

    /// Create a new ledger with a custom authorization policy
    pub fn with_policy(storage: S, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self::build(storage, policy, LedgerInitializer::new)
    }

    /// Create a ledger from configuration
    pub fn from_config(storage: S, config: &LedgerConfig) -> Self {
        let policy: Arc<dyn AuthorizationPolicy> = match config.authorization {
            AuthorizationMode::Disabled => Arc::new(AllowAll),
            AuthorizationMode::Signature => Arc::new(SignatureAuthorizer::new(Ed25519Verifier)),
        };
        Self::build(storage, policy, |storage| {
            LedgerInitializer::with_genesis(
                storage,
                config.genesis_account.clone(),
                config.initial_supply,
            )
        })
    }

    fn build(
        storage: S,
        policy: Arc<dyn AuthorizationPolicy>,
        initializer: impl FnOnce(S) -> LedgerInitializer<S>,
    ) -> Self {
        let gate = AuthorizationGate::new(storage.clone(), policy);
        Self {
            initializer: initializer(storage.clone()),
            registrar: AccountRegistrar::new(storage.clone(), gate.clone()),
            transfers: TransferEngine::new(storage.clone(), gate),
            queries: QueryService::new(storage),
        }
    }

    /// Identifier of the genesis account
    pub fn genesis_account(&self) -> &str {
        self.initializer.genesis_account()
    }

    /// Bootstrap the ledger once, seeding the genesis account
    pub async fn bootstrap(&self, admin_credential: Option<&[u8]>) -> LedgerResult<Account> {
        self.initializer.bootstrap(admin_credential).await
    }

    /// Register a new zero-balance account
    pub async fn assign(&self, request: &RequestContext, account_id: &str) -> LedgerResult<Account> {
        self.registrar.assign(request, account_id).await
    }

    /// Move `amount` from one account to another
    pub async fn transfer(
        &self,
        request: &RequestContext,
        from_id: &str,
        to_id: &str,
        amount: &str,
    ) -> LedgerResult<TransferOutcome> {
        self.transfers
            .transfer(request, from_id, to_id, amount)
            .await
    }

    /// Get the balance of an account
    pub async fn get_balance(&self, account_id: &str) -> LedgerResult<i64> {
        self.queries.get_balance(account_id).await
    }

    /// Read raw host state
    pub async fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        self.queries.read(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let ledger = Ledger::new(MemoryStorage::new());
        let request = RequestContext::default();

        ledger.bootstrap(None).await.unwrap();
        assert_eq!(ledger.get_balance("admin").await.unwrap(), 10_000_000);

        ledger.assign(&request, "alice").await.unwrap();
        assert_eq!(ledger.get_balance("alice").await.unwrap(), 0);

        ledger
            .transfer(&request, "admin", "alice", "500")
            .await
            .unwrap();
        assert_eq!(ledger.get_balance("admin").await.unwrap(), 9_999_500);
        assert_eq!(ledger.get_balance("alice").await.unwrap(), 500);

        ledger
            .transfer(&request, "alice", "admin", "500")
            .await
            .unwrap();
        assert_eq!(ledger.get_balance("alice").await.unwrap(), 0);
        assert_eq!(ledger.get_balance("admin").await.unwrap(), 10_000_000);
    }

    #[tokio::test]
    async fn test_from_config_uses_custom_genesis() {
        let config = LedgerConfig::default().with_genesis("treasury", 1_000);
        let ledger = Ledger::from_config(MemoryStorage::new(), &config);

        ledger.bootstrap(None).await.unwrap();
        assert_eq!(ledger.genesis_account(), "treasury");
        assert_eq!(ledger.get_balance("treasury").await.unwrap(), 1_000);
        assert!(matches!(
            ledger.get_balance("admin").await.unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid_genesis_at_bootstrap() {
        let config = LedgerConfig::default().with_genesis("admin", -100);
        let ledger = Ledger::from_config(MemoryStorage::new(), &config);
        assert!(matches!(
            ledger.bootstrap(None).await.unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
        assert!(ledger.get_balance("admin").await.is_err());

        let config = LedgerConfig::default().with_genesis("  ", 5);
        let ledger = Ledger::from_config(MemoryStorage::new(), &config);
        assert!(matches!(
            ledger.bootstrap(None).await.unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
        assert!(ledger.get_balance("  ").await.is_err());
    }

    #[tokio::test]
    async fn test_signature_mode_without_credential_denies_mutations() {
        let config = LedgerConfig::default().with_authorization(AuthorizationMode::Signature);
        let ledger = Ledger::from_config(MemoryStorage::new(), &config);
        ledger.bootstrap(None).await.unwrap();

        let err = ledger
            .assign(&RequestContext::default(), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AuthorizationFailed(_)));
    }

    #[tokio::test]
    async fn test_read_returns_recorded_credential() {
        let ledger = Ledger::new(MemoryStorage::new());
        ledger.bootstrap(Some(b"cert".as_slice())).await.unwrap();

        assert_eq!(ledger.read("admin").await.unwrap(), b"cert".to_vec());
        assert!(ledger.read("missing").await.unwrap().is_empty());
    }
}
