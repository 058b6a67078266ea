//! One-time ledger bootstrap

use tracing::{info, warn};

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_account_id;

/// Creates the account table and seeds the genesis account
#[derive(Clone)]
pub struct LedgerInitializer<S: AccountStore + StateStore> {
    storage: S,
    genesis_account: String,
    initial_supply: i64,
}

impl<S: AccountStore + StateStore> LedgerInitializer<S> {
    /// Create an initializer seeding [`GENESIS_ACCOUNT_ID`] with [`INITIAL_SUPPLY`]
    pub fn new(storage: S) -> Self {
        Self::with_genesis(storage, GENESIS_ACCOUNT_ID.to_string(), INITIAL_SUPPLY)
    }

    /// Create an initializer with a custom genesis account and supply
    pub fn with_genesis(storage: S, genesis_account: String, initial_supply: i64) -> Self {
        Self {
            storage,
            genesis_account,
            initial_supply,
        }
    }

    /// Identifier of the genesis account
    pub fn genesis_account(&self) -> &str {
        &self.genesis_account
    }

    /// Bootstrap the ledger.
    ///
    /// Fails with [`LedgerError::AlreadyInitialized`] on every call after the
    /// first, leaving existing balances untouched. When `admin_credential` is
    /// given it is recorded for the authorization gate. If seeding fails after
    /// the table was created, the table is dropped again so the call can be
    /// retried.
    pub async fn bootstrap(&self, admin_credential: Option<&[u8]>) -> LedgerResult<Account> {
        info!("initializing ledger");

        validate_account_id(&self.genesis_account)?;
        if self.initial_supply < 0 {
            return Err(LedgerError::InvalidArgument(format!(
                "Initial supply must not be negative: {}",
                self.initial_supply
            )));
        }
        if admin_credential.is_some_and(<[u8]>::is_empty) {
            return Err(LedgerError::InvalidArgument(
                "Invalid admin credential: empty".to_string(),
            ));
        }

        self.storage.create_schema().await?;
        let genesis = match self.seed(admin_credential).await {
            Ok(genesis) => genesis,
            Err(e) => {
                warn!(error = %e, "bootstrap failed, dropping account table");
                if let Err(rollback) = self.storage.drop_schema().await {
                    warn!(error = %rollback, "failed to drop account table");
                }
                return Err(e);
            }
        };

        info!(
            account_id = %genesis.id,
            balance = genesis.balance,
            "ledger initialized"
        );
        Ok(genesis)
    }

    async fn seed(&self, admin_credential: Option<&[u8]>) -> LedgerResult<Account> {
        let genesis = self
            .storage
            .insert(&self.genesis_account, self.initial_supply)
            .await?;

        if let Some(credential) = admin_credential {
            self.storage
                .put_state(ADMIN_CREDENTIAL_KEY, credential)
                .await?;
            info!(credential_len = credential.len(), "administrator credential recorded");
        }
        Ok(genesis)
    }
}
