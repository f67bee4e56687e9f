//! Store traits for balances and statistics, with PostgreSQL implementations.
//!
//! The traits let the ledger and the resolver run against PostgreSQL in
//! production and against [`MemoryStore`](super::MemoryStore) in tests.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;

use crate::ledger::{Account, LedgerError, LedgerResult, UserId};
use crate::stats::{GamblingStats, StatsDelta, StatsResult};

/// SQLSTATE raised by PostgreSQL on `BIGINT` overflow
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Durable balance storage keyed by user id
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get the account, creating it with `starting_balance` when absent
    async fn get_or_create(&self, user_id: UserId, starting_balance: i64)
    -> LedgerResult<Account>;

    /// Add `amount` to the balance and return the new balance
    async fn credit(&self, user_id: UserId, amount: i64, starting_balance: i64)
    -> LedgerResult<i64>;

    /// Remove `amount` from the balance only if the balance covers it
    async fn debit(&self, user_id: UserId, amount: i64, starting_balance: i64)
    -> LedgerResult<i64>;
}

/// Durable statistics storage keyed by user id
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Stats for a user, `None` if they never finished a game
    async fn find(&self, user_id: UserId) -> StatsResult<Option<GamblingStats>>;

    /// Upsert the stats record, adding the delta to every counter
    async fn record(&self, user_id: UserId, delta: &StatsDelta) -> StatsResult<GamblingStats>;
}

/// PostgreSQL implementation of `AccountStore`
pub struct PgAccountStore {
    pool: Arc<PgPool>,
}

impl PgAccountStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn ensure_account(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        starting_balance: i64,
    ) -> LedgerResult<bool> {
        let result = sqlx::query(
            "INSERT INTO accounts (user_id, balance)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(starting_balance)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get_or_create(
        &self,
        user_id: UserId,
        starting_balance: i64,
    ) -> LedgerResult<Account> {
        let mut tx = self.pool.begin().await?;

        if Self::ensure_account(&mut tx, user_id, starting_balance).await? {
            log::info!("Created account for user {user_id} with balance {starting_balance}");
        }

        let row = sqlx::query(
            r#"
            SELECT user_id, balance, created_at, updated_at
            FROM accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Account {
            user_id: row.get("user_id"),
            balance: row.get("balance"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        })
    }

    async fn credit(
        &self,
        user_id: UserId,
        amount: i64,
        starting_balance: i64,
    ) -> LedgerResult<i64> {
        let initial = starting_balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        // Single upsert: creates the account already credited, or adds in place
        let row = sqlx::query(
            "INSERT INTO accounts (user_id, balance, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (user_id)
             DO UPDATE SET
                balance = accounts.balance + $3,
                updated_at = NOW()
             RETURNING balance",
        )
        .bind(user_id)
        .bind(initial)
        .bind(amount)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            let overflow = e
                .as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == NUMERIC_VALUE_OUT_OF_RANGE);
            if overflow {
                LedgerError::BalanceOverflow
            } else {
                LedgerError::Database(e)
            }
        })?;

        Ok(row.get("balance"))
    }

    async fn debit(
        &self,
        user_id: UserId,
        amount: i64,
        starting_balance: i64,
    ) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;

        Self::ensure_account(&mut tx, user_id, starting_balance).await?;

        // Check and debit in one statement so concurrent debits cannot overdraw
        let debited = sqlx::query(
            "UPDATE accounts
             SET balance = balance - $1, updated_at = NOW()
             WHERE user_id = $2 AND balance >= $1
             RETURNING balance",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let new_balance: i64 = match debited {
            Some(row) => row.get("balance"),
            None => {
                let row = sqlx::query("SELECT balance FROM accounts WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&mut *tx)
                    .await?;

                return Err(LedgerError::InsufficientFunds {
                    available: row.get("balance"),
                    required: amount,
                });
            }
        };

        tx.commit().await?;

        Ok(new_balance)
    }
}

/// PostgreSQL implementation of `StatsStore`
pub struct PgStatsStore {
    pool: Arc<PgPool>,
}

impl PgStatsStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn stats_from_row(row: &sqlx::postgres::PgRow) -> GamblingStats {
        GamblingStats {
            user_id: row.get("user_id"),
            total_games: row.get("total_games"),
            wins: row.get("wins"),
            losses: row.get("losses"),
            total_bet: row.get("total_bet"),
            total_won: row.get("total_won"),
            total_lost: row.get("total_lost"),
        }
    }
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn find(&self, user_id: UserId) -> StatsResult<Option<GamblingStats>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, total_games, wins, losses, total_bet, total_won, total_lost
            FROM gambling_stats
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.as_ref().map(Self::stats_from_row))
    }

    async fn record(&self, user_id: UserId, delta: &StatsDelta) -> StatsResult<GamblingStats> {
        let row = sqlx::query(
            r#"
            INSERT INTO gambling_stats
                (user_id, total_games, wins, losses, total_bet, total_won, total_lost, updated_at)
            VALUES ($1, 1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                total_games = gambling_stats.total_games + 1,
                wins = gambling_stats.wins + EXCLUDED.wins,
                losses = gambling_stats.losses + EXCLUDED.losses,
                total_bet = gambling_stats.total_bet + EXCLUDED.total_bet,
                total_won = gambling_stats.total_won + EXCLUDED.total_won,
                total_lost = gambling_stats.total_lost + EXCLUDED.total_lost,
                updated_at = NOW()
            RETURNING user_id, total_games, wins, losses, total_bet, total_won, total_lost
            "#,
        )
        .bind(user_id)
        .bind(delta.wins())
        .bind(delta.losses())
        .bind(delta.bet)
        .bind(delta.total_won())
        .bind(delta.total_lost())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::stats_from_row(&row))
    }
}
