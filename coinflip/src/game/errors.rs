//! Game error types.

use crate::ledger::{LedgerError, UserId};
use crate::stats::StatsError;
use thiserror::Error;

/// Errors surfaced by a coinflip game
#[derive(Debug, Error)]
pub enum GameError {
    /// Non-positive or unparsable bet
    #[error("Invalid bet: {0}")]
    InvalidBet(String),

    /// Bet exceeds the current balance
    #[error("Insufficient funds: balance {balance}, bet {bet}")]
    InsufficientFunds { balance: i64, bet: i64 },

    /// Another game for the same user has not finished
    #[error("User {0} already has a game in progress")]
    GameInProgress(UserId),

    /// Balance or stats store failed; nothing was applied
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl GameError {
    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            GameError::Persistence(_) => "Internal server error".to_string(),
            GameError::GameInProgress(_) => "You already have an ongoing game".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                available,
                required,
            } => GameError::InsufficientFunds {
                balance: available,
                bet: required,
            },
            LedgerError::InvalidAmount(amount) => {
                GameError::InvalidBet(format!("amount must be positive, got {amount}"))
            }
            LedgerError::BalanceOverflow => {
                GameError::InvalidBet("winnings would overflow the balance".to_string())
            }
            other => GameError::Persistence(other.to_string()),
        }
    }
}

impl From<StatsError> for GameError {
    fn from(err: StatsError) -> Self {
        GameError::Persistence(err.to_string())
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
