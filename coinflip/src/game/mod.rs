//! Coinflip game engine.
//!
//! A [`Resolver`] takes a [`BetRequest`], checks it against the user's
//! balance, flips a coin through its [`CoinFlipper`], settles the balance on
//! the [`Ledger`](crate::ledger::Ledger) and records the game in the stats
//! store. Only one game per user may be in flight; a second request fails
//! fast with [`GameError::GameInProgress`].
//!
//! ## Payouts
//!
//! A winning bet returns `floor(bet * win_multiplier)` gross, so the balance
//! grows by that minus the stake. A losing bet forfeits the stake. The
//! multiplier defaults to 2.0 and is held in basis points.

pub mod config;
pub mod errors;
pub mod flipper;
pub mod guard;
pub mod models;
pub mod resolver;

pub use config::{GameConfig, GameConfigError};
pub use errors::{GameError, GameResult};
pub use flipper::{CoinFlipper, FixedFlipper, RandomFlipper};
pub use guard::{ActiveGames, GameGuard};
pub use models::{BetRequest, CoinSide, FlipOutcome};
pub use resolver::Resolver;
