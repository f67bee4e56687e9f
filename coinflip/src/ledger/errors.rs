//! Ledger error types.

use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested debit exceeds the stored balance
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: i64, required: i64 },

    /// Invalid amount (must be positive)
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Credit would push the balance past `i64::MAX`
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Backing store unavailable or rejected the write
    #[error("Store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Database(_) | LedgerError::Store(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_store_details() {
        let err = LedgerError::Store("connection refused to 10.0.0.4:5432".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_keeps_funds_details() {
        let err = LedgerError::InsufficientFunds {
            available: 30,
            required: 50,
        };
        let msg = err.client_message();
        assert!(msg.contains("30"));
        assert!(msg.contains("50"));
    }
}
