//! # Coinflip
//!
//! A coinflip gambling engine for chat bots: a user bets part of their balance
//! on heads or tails, a fair coin is flipped, and the balance and cumulative
//! gambling statistics are updated.
//!
//! ## Core Modules
//!
//! - [`ledger`]: Per-user balances that never go negative
//! - [`game`]: Bet validation, the coin flip, payouts and the one-game-per-user guard
//! - [`stats`]: Cumulative wins, losses and amounts wagered
//! - [`db`]: Store traits with PostgreSQL and in-memory implementations
//!
//! ## Example
//!
//! ```
//! use coinflip::db::MemoryStore;
//! use coinflip::game::{BetRequest, CoinSide, FixedFlipper, GameConfig, Resolver};
//! use coinflip::ledger::Ledger;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let ledger = Ledger::new(Arc::new(store.clone()), 100);
//! let resolver = Resolver::new(ledger, Arc::new(store), GameConfig::default())
//!     .with_flipper(Arc::new(FixedFlipper(CoinSide::Heads)));
//!
//! let outcome = resolver.resolve(BetRequest::new(1, CoinSide::Heads, 50)).await?;
//! assert_eq!(outcome.new_balance, 150);
//! # Ok(())
//! # }
//! ```

/// Storage traits and implementations.
pub mod db;

/// Coinflip resolution.
pub mod game;
pub use game::{BetRequest, CoinSide, FlipOutcome, GameConfig, GameError, Resolver};

/// Balances.
pub mod ledger;
pub use ledger::{Ledger, LedgerError, UserId};

/// Gambling statistics.
pub mod stats;
pub use stats::{GamblingStats, StatsSummary};
