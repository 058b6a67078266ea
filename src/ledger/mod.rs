//! Ledger engine: bootstrap, registration, transfers and queries

pub mod account;
pub mod core;
pub mod dispatch;
pub mod gate;
pub mod genesis;
pub mod query;
pub mod transaction;

pub use account::*;
pub use self::core::*;
pub use gate::*;
pub use genesis::*;
pub use query::*;
pub use transaction::*;
