//! # Points Ledger
//!
//! A minimal points/credit ledger: named accounts hold an integer balance, a
//! bootstrap step seeds the genesis account, accounts can be registered and
//! balances moved between them.
//!
//! ## Features
//!
//! - **Fenced atomic transfers**: both sides of a transfer are committed in one
//!   batch that is rejected with a retryable `Conflict` if either account
//!   changed since it was read
//! - **Balance invariants**: transfers never overdraw and conserve the sum of
//!   the two balances
//! - **Pluggable authorization**: mutating operations pass through an
//!   [`AuthorizationPolicy`], either disabled or Ed25519 signature checking
//! - **Storage abstraction**: the account table and raw state are traits; an
//!   in-memory backend is provided
//!
//! ## Quick Start
//!
//! ```rust
//! use points_ledger::{utils::MemoryStorage, Ledger, RequestContext};
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let ledger = Ledger::new(MemoryStorage::new());
//! let request = RequestContext::default();
//!
//! ledger.bootstrap(None).await.unwrap();
//! ledger.assign(&request, "alice").await.unwrap();
//! ledger.transfer(&request, "admin", "alice", "500").await.unwrap();
//!
//! assert_eq!(ledger.get_balance("alice").await.unwrap(), 500);
//! # });
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use auth::*;
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
