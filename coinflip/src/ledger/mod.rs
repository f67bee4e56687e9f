//! Ledger module owning per-user currency balances.
//!
//! Balances live in an [`AccountStore`](crate::db::AccountStore). Accounts are
//! created lazily with the configured starting balance the first time they are
//! read or written, and a debit only commits when the stored balance covers it.
//!
//! ## Example
//!
//! ```no_run
//! use coinflip::db::MemoryStore;
//! use coinflip::ledger::Ledger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = Ledger::new(Arc::new(MemoryStore::new()), 100);
//!
//!     let balance = ledger.subtract(1, 40).await?;
//!     assert_eq!(balance, 60);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{LedgerError, LedgerResult};
pub use manager::Ledger;
pub use models::{Account, UserId};
