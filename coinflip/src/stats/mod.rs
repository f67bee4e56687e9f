//! Per-user gambling statistics.
//!
//! Every resolved game produces a [`StatsDelta`] that a
//! [`StatsStore`](crate::db::StatsStore) folds additively into the user's
//! [`GamblingStats`]. The record is created on the first game and never removed.

pub mod errors;
pub mod models;

pub use errors::{StatsError, StatsResult};
pub use models::{GamblingStats, StatsDelta, StatsSummary};
