//! Traits for storage abstraction and pluggable authorization

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the account table
///
/// This trait allows the ledger to work with any keyed-table backend supplied
/// by the host by implementing these methods. Reads return the record's
/// [`Version`], which later writes are fenced on.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the empty account table
    async fn create_schema(&self) -> LedgerResult<()>;

    /// Remove the account table and every account in it
    async fn drop_schema(&self) -> LedgerResult<()>;

    /// Insert a new account, failing if the id is already present
    async fn insert(&self, account_id: &str, balance: i64) -> LedgerResult<Account>;

    /// Get an account by ID
    async fn get(&self, account_id: &str) -> LedgerResult<Account>;

    /// Overwrite the balance of an existing account without any version check
    async fn replace(&self, account_id: &str, balance: i64) -> LedgerResult<Account>;

    /// Apply every update or none of them.
    ///
    /// Each update is accepted only if the stored version still equals its
    /// `expected_version`.
    async fn commit(&self, updates: &[BalanceUpdate]) -> LedgerResult<()>;
}

/// Raw key/value state kept by the host outside the account table
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the raw value stored under `key`
    async fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Store a raw value under `key`
    async fn put_state(&self, key: &str, value: &[u8]) -> LedgerResult<()>;
}

/// Signature verification primitive provided by the host
pub trait SignatureVerifier: Send + Sync {
    /// Check `signature` over `message` against `credential`.
    ///
    /// Returns `Ok(false)` for a signature that does not verify and
    /// [`LedgerError::VerificationFailure`] when the check cannot be performed.
    fn verify(&self, credential: &[u8], signature: &[u8], message: &[u8]) -> LedgerResult<bool>;
}

/// Trait for deciding whether a request may mutate the ledger
pub trait AuthorizationPolicy: Send + Sync {
    /// Check that the request was signed by the holder of `credential`.
    ///
    /// `credential` is `None` when no administrator credential was recorded at
    /// bootstrap.
    fn is_authorized(
        &self,
        request: &RequestContext,
        credential: Option<&[u8]>,
    ) -> LedgerResult<bool>;
}

/// Policy that authorizes every request (the disabled gate)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationPolicy for AllowAll {
    fn is_authorized(
        &self,
        _request: &RequestContext,
        _credential: Option<&[u8]>,
    ) -> LedgerResult<bool> {
        Ok(true)
    }
}
