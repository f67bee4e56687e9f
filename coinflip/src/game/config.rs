//! Game configuration.

use crate::db::config::parse_env_or;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basis points in 1.0x
pub const BPS_SCALE: u32 = 10_000;

/// Winning pays back twice the stake
pub const DEFAULT_WIN_MULTIPLIER_BPS: u32 = 20_000;

/// Game configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum GameConfigError {
    #[error("Win multiplier must be a finite number >= 1.0, got {0}")]
    InvalidMultiplier(f64),
}

/// Coinflip settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Gross payout on a win, in basis points of the stake
    pub win_multiplier_bps: u32,
}

impl GameConfig {
    /// Load settings from the environment
    ///
    /// - `WIN_MULTIPLIER`: gross payout ratio on a win (default: 2.0)
    ///
    /// # Errors
    ///
    /// Returns error if `WIN_MULTIPLIER` is set but not a finite value >= 1.0
    pub fn from_env() -> Result<Self, GameConfigError> {
        let multiplier = parse_env_or("WIN_MULTIPLIER", 2.0);
        Self::default().with_win_multiplier(multiplier)
    }

    /// Set the payout ratio, e.g. `2.0` for double-or-nothing, `1.95` for a 2.5% edge
    pub fn with_win_multiplier(mut self, multiplier: f64) -> Result<Self, GameConfigError> {
        let bps = multiplier * f64::from(BPS_SCALE);
        if !multiplier.is_finite() || multiplier < 1.0 || bps > f64::from(u32::MAX) {
            return Err(GameConfigError::InvalidMultiplier(multiplier));
        }

        self.win_multiplier_bps = bps.round() as u32;
        Ok(self)
    }

    pub fn win_multiplier(&self) -> f64 {
        f64::from(self.win_multiplier_bps) / f64::from(BPS_SCALE)
    }

    /// Validate settings after construction
    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.win_multiplier_bps < BPS_SCALE {
            return Err(GameConfigError::InvalidMultiplier(self.win_multiplier()));
        }

        Ok(())
    }

    /// Gross return on a winning bet, rounded down
    ///
    /// Returns `None` if it does not fit in an `i64`.
    pub fn payout(&self, bet_amount: i64) -> Option<i64> {
        let gross =
            i128::from(bet_amount) * i128::from(self.win_multiplier_bps) / i128::from(BPS_SCALE);
        i64::try_from(gross).ok()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_multiplier_bps: DEFAULT_WIN_MULTIPLIER_BPS,
        }
    }
}
