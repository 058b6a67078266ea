//! Core types and data structures for the points ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the account seeded at bootstrap
pub const GENESIS_ACCOUNT_ID: &str = "admin";

/// Balance credited to the genesis account at bootstrap
pub const INITIAL_SUPPLY: i64 = 10_000_000;

/// Raw state key holding the administrator credential
pub const ADMIN_CREDENTIAL_KEY: &str = "admin";

/// Fencing token attached to every stored account.
///
/// Starts at 1 when the record is inserted and is bumped on every write, so a
/// writer holding an older version knows its read is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    /// Version of a freshly inserted record
    pub const INITIAL: Version = Version(1);

    /// The version a record carries after one more write
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A single account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, the primary key of the account table
    pub id: String,
    /// Credit count held by the account
    pub balance: i64,
    /// Fencing token of the last committed write
    pub version: Version,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the balance was last written
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new account record at the initial version
    pub fn new(id: String, balance: i64) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            balance,
            version: Version::INITIAL,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the balance and advance the version
    pub fn set_balance(&mut self, balance: i64) {
        self.balance = balance;
        self.version = self.version.next();
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// One fenced write inside an atomic batch commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    /// Account being written
    pub account_id: String,
    /// Version observed when the balance was read
    pub expected_version: Version,
    /// Balance to store if the version still matches
    pub new_balance: i64,
}

impl BalanceUpdate {
    /// Build an update fenced on the version of a previously read account
    pub fn fenced(account: &Account, new_balance: i64) -> Self {
        Self {
            account_id: account.id.clone(),
            expected_version: account.version,
            new_balance,
        }
    }
}

/// Authorization material the host attaches to a request.
///
/// `signature` is the detached signature (`sigma`) made by the caller over
/// `payload || binding`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub signature: Vec<u8>,
    pub payload: Vec<u8>,
    pub binding: Vec<u8>,
}

impl RequestContext {
    /// Create a request context from its raw parts
    pub fn new(signature: Vec<u8>, payload: Vec<u8>, binding: Vec<u8>) -> Self {
        Self {
            signature,
            payload,
            binding,
        }
    }

    /// The message covered by the signature: `payload || binding`
    pub fn signed_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.payload.len() + self.binding.len());
        message.extend_from_slice(&self.payload);
        message.extend_from_slice(&self.binding);
        message
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Ledger is already initialized")]
    AlreadyInitialized,
    #[error("Account was already assigned: {0}")]
    AlreadyExists(String),
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Insufficient balance in {account_id}: requested {requested}, available {available}")]
    InsufficientBalance {
        account_id: String,
        requested: i64,
        available: i64,
    },
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),
    #[error("Signature verification could not be performed: {0}")]
    VerificationFailure(String),
    #[error("Concurrent modification of {account_id}: expected {expected}, found {found}")]
    Conflict {
        account_id: String,
        expected: Version,
        found: Version,
    },
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Whether re-issuing the operation after re-reading balances may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Conflict { .. })
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
