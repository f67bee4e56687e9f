//! In-process store for tests and database-less deployments.

use async_trait::async_trait;
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::repository::{AccountStore, StatsStore};
use crate::ledger::{Account, LedgerError, LedgerResult, UserId};
use crate::stats::{GamblingStats, StatsDelta, StatsResult};

/// Accounts and stats held in memory
///
/// Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
    stats: Arc<RwLock<HashMap<UserId, GamblingStats>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a balance, creating the account if needed
    pub async fn set_balance(&self, user_id: UserId, balance: i64) {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(user_id)
            .or_insert_with(|| Account::new(user_id, balance));
        account.balance = balance;
        account.updated_at = Utc::now();
    }

    /// Number of accounts created so far
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_or_create(
        &self,
        user_id: UserId,
        starting_balance: i64,
    ) -> LedgerResult<Account> {
        if let Some(account) = self.accounts.read().await.get(&user_id) {
            return Ok(account.clone());
        }

        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user_id).or_insert_with(|| {
            log::info!("Created account for user {user_id} with balance {starting_balance}");
            Account::new(user_id, starting_balance)
        });

        Ok(account.clone())
    }

    async fn credit(
        &self,
        user_id: UserId,
        amount: i64,
        starting_balance: i64,
    ) -> LedgerResult<i64> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(user_id)
            .or_insert_with(|| Account::new(user_id, starting_balance));

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        account.updated_at = Utc::now();

        Ok(account.balance)
    }

    async fn debit(
        &self,
        user_id: UserId,
        amount: i64,
        starting_balance: i64,
    ) -> LedgerResult<i64> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(user_id)
            .or_insert_with(|| Account::new(user_id, starting_balance));

        if account.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                available: account.balance,
                required: amount,
            });
        }

        account.balance -= amount;
        account.updated_at = Utc::now();

        Ok(account.balance)
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn find(&self, user_id: UserId) -> StatsResult<Option<GamblingStats>> {
        Ok(self.stats.read().await.get(&user_id).cloned())
    }

    async fn record(&self, user_id: UserId, delta: &StatsDelta) -> StatsResult<GamblingStats> {
        let mut stats = self.stats.write().await;
        let entry = stats
            .entry(user_id)
            .or_insert_with(|| GamblingStats::empty(user_id));
        entry.apply(delta);

        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = MemoryStore::new();

        let first = store.get_or_create(1, 100).await.unwrap();
        let second = store.get_or_create(1, 999).await.unwrap();

        assert_eq!(first.balance, 100);
        assert_eq!(second.balance, 100);
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_debit_creates_account_before_checking() {
        let store = MemoryStore::new();

        let err = store.debit(5, 10, 0).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                available: 0,
                required: 10
            }
        ));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_record_accumulates() {
        let store = MemoryStore::new();
        assert!(store.find(3).await.unwrap().is_none());

        store.record(3, &StatsDelta::win(10, 20)).await.unwrap();
        let stats = store.record(3, &StatsDelta::loss(4)).await.unwrap();

        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.wins + stats.losses, stats.total_games);
        assert_eq!(store.find(3).await.unwrap(), Some(stats));
    }

    #[tokio::test]
    async fn test_set_balance() {
        let store = MemoryStore::new();
        store.set_balance(2, 30).await;
        assert_eq!(store.get_or_create(2, 0).await.unwrap().balance, 30);
    }
}
