//! Ledger over an [`AccountStore`], guarding every balance mutation.

use super::{
    errors::{LedgerError, LedgerResult},
    models::{Account, UserId},
};
use crate::db::AccountStore;
use std::sync::Arc;

/// Per-user currency ledger
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn AccountStore>,
    starting_balance: i64,
}

impl Ledger {
    /// Create a new ledger
    ///
    /// # Arguments
    ///
    /// * `store` - Account store backing the balances
    /// * `starting_balance` - Balance given to an account on first access
    pub fn new(store: Arc<dyn AccountStore>, starting_balance: i64) -> Self {
        Self {
            store,
            starting_balance,
        }
    }

    /// Get the account for a user, creating it lazily
    pub async fn get_account(&self, user_id: UserId) -> LedgerResult<Account> {
        self.store
            .get_or_create(user_id, self.starting_balance)
            .await
    }

    /// Get the current balance for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - User ID
    ///
    /// # Returns
    ///
    /// * `LedgerResult<i64>` - Current balance (starting balance for unknown users)
    pub async fn get_balance(&self, user_id: UserId) -> LedgerResult<i64> {
        Ok(self.get_account(user_id).await?.balance)
    }

    /// Credit a user's balance
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - Amount is zero or negative
    /// * `LedgerError::BalanceOverflow` - Result does not fit in an `i64`
    pub async fn add(&self, user_id: UserId, amount: i64) -> LedgerResult<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        self.store
            .credit(user_id, amount, self.starting_balance)
            .await
    }

    /// Debit a user's balance
    ///
    /// The check and the write happen in one store operation, so two callers
    /// racing on the same account can never take it below zero.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - Amount is zero or negative
    /// * `LedgerError::InsufficientFunds` - Amount exceeds the balance
    pub async fn subtract(&self, user_id: UserId, amount: i64) -> LedgerResult<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        self.store
            .debit(user_id, amount, self.starting_balance)
            .await
    }
}
