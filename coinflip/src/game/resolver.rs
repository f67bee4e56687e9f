//! Coinflip resolution: validate, flip, settle the balance, record stats.

use super::{
    config::GameConfig,
    errors::{GameError, GameResult},
    flipper::{CoinFlipper, RandomFlipper},
    guard::ActiveGames,
    models::{BetRequest, FlipOutcome},
};
use crate::db::StatsStore;
use crate::ledger::{Ledger, UserId};
use crate::stats::{StatsDelta, StatsSummary};
use std::sync::Arc;

/// Balance movement applied by a settled game
#[derive(Debug, Clone, Copy)]
enum Settlement {
    Credited(i64),
    Debited(i64),
    Unchanged,
}

/// Runs coinflip games against a ledger and a stats store
#[derive(Clone)]
pub struct Resolver {
    ledger: Ledger,
    stats: Arc<dyn StatsStore>,
    flipper: Arc<dyn CoinFlipper>,
    config: GameConfig,
    active_games: ActiveGames,
}

impl Resolver {
    /// Create a resolver flipping a fair coin
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger holding user balances
    /// * `stats` - Store receiving per-game statistics
    /// * `config` - Payout settings
    pub fn new(ledger: Ledger, stats: Arc<dyn StatsStore>, config: GameConfig) -> Self {
        Self {
            ledger,
            stats,
            flipper: Arc::new(RandomFlipper),
            config,
            active_games: ActiveGames::new(),
        }
    }

    /// Replace the outcome source
    pub fn with_flipper(mut self, flipper: Arc<dyn CoinFlipper>) -> Self {
        self.flipper = flipper;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether the user has an unresolved game
    pub fn is_in_progress(&self, user_id: UserId) -> bool {
        self.active_games.contains(user_id)
    }

    /// Current balance for a user
    pub async fn balance(&self, user_id: UserId) -> GameResult<i64> {
        Ok(self.ledger.get_balance(user_id).await?)
    }

    /// Stats with win rate and profit, `None` if the user never played
    pub async fn stats(&self, user_id: UserId) -> GameResult<Option<StatsSummary>> {
        let stats = self.stats.find(user_id).await?;
        Ok(stats.map(|s| s.summary()))
    }

    /// Play one game
    ///
    /// The game runs on its own task, so dropping the returned future does not
    /// stop it halfway: a settled balance is always followed by its stats write
    /// or its reversal. The user's slot in the active-games table is held until
    /// that task finishes and is released on every exit path.
    ///
    /// # Errors
    ///
    /// * `GameError::GameInProgress` - The user already has a game running
    /// * `GameError::InvalidBet` - Bet is zero or negative, or a win would overflow the balance
    /// * `GameError::InsufficientFunds` - Bet exceeds the balance
    /// * `GameError::Persistence` - A store write failed; the balance is left as it was
    pub async fn resolve(&self, request: BetRequest) -> GameResult<FlipOutcome> {
        let guard = self.active_games.try_acquire(request.user_id)?;
        let resolver = self.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;
            resolver.resolve_locked(request).await
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(GameError::Persistence(format!("game task failed: {e}"))),
        };

        if let Err(e) = &outcome {
            log::debug!("Coinflip for user {} rejected: {}", request.user_id, e);
        }

        outcome
    }

    async fn resolve_locked(&self, request: BetRequest) -> GameResult<FlipOutcome> {
        let BetRequest {
            user_id,
            side_chosen,
            bet_amount,
        } = request;

        if bet_amount <= 0 {
            return Err(GameError::InvalidBet(
                "can't bet zero or negative amounts".to_string(),
            ));
        }

        let balance = self.ledger.get_balance(user_id).await?;
        if bet_amount > balance {
            return Err(GameError::InsufficientFunds {
                balance,
                bet: bet_amount,
            });
        }

        // Both outcomes must be settleable before the coin is flipped
        let payout = self
            .config
            .payout(bet_amount)
            .ok_or_else(|| GameError::InvalidBet(format!("payout for {bet_amount} overflows")))?;
        let net = payout - bet_amount;
        if balance.checked_add(net).is_none() {
            return Err(GameError::InvalidBet(format!(
                "winnings of {net} would overflow the balance"
            )));
        }

        let result = self.flipper.flip();
        let won = result == side_chosen;

        let (new_balance, settlement, delta) = if won {
            if net > 0 {
                let new_balance = self.ledger.add(user_id, net).await?;
                (
                    new_balance,
                    Settlement::Credited(net),
                    StatsDelta::win(bet_amount, payout),
                )
            } else {
                (
                    balance,
                    Settlement::Unchanged,
                    StatsDelta::win(bet_amount, payout),
                )
            }
        } else {
            let new_balance = self.ledger.subtract(user_id, bet_amount).await?;
            (
                new_balance,
                Settlement::Debited(bet_amount),
                StatsDelta::loss(bet_amount),
            )
        };

        let stats = match self.stats.record(user_id, &delta).await {
            Ok(stats) => stats,
            Err(e) => {
                self.reverse(user_id, settlement).await;
                return Err(e.into());
            }
        };

        log::debug!(
            "Coinflip user={} bet={} chose={} result={} won={} balance={}",
            user_id,
            bet_amount,
            side_chosen,
            result,
            won,
            new_balance
        );

        Ok(FlipOutcome {
            side_chosen,
            result,
            won,
            bet_amount,
            payout: delta.total_won(),
            new_balance,
            stats,
        })
    }

    /// Undo a committed balance change after the stats write failed
    async fn reverse(&self, user_id: UserId, settlement: Settlement) {
        let reversed = match settlement {
            Settlement::Credited(amount) => self.ledger.subtract(user_id, amount).await,
            Settlement::Debited(amount) => self.ledger.add(user_id, amount).await,
            Settlement::Unchanged => return,
        };

        match reversed {
            Ok(balance) => log::warn!(
                "Reversed {:?} for user {} after stats failure, balance {}",
                settlement,
                user_id,
                balance
            ),
            Err(e) => log::error!(
                "Failed to reverse {:?} for user {}: {}",
                settlement,
                user_id,
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::game::{CoinSide, FixedFlipper};

    async fn resolver_with(balance: i64, result: CoinSide) -> (Resolver, MemoryStore) {
        let store = MemoryStore::new();
        store.set_balance(1, balance).await;

        let ledger = Ledger::new(Arc::new(store.clone()), 0);
        let resolver = Resolver::new(ledger, Arc::new(store.clone()), GameConfig::default())
            .with_flipper(Arc::new(FixedFlipper(result)));

        (resolver, store)
    }

    #[tokio::test]
    async fn test_win_doubles_stake() {
        let (resolver, _) = resolver_with(100, CoinSide::Heads).await;

        let outcome = resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 50))
            .await
            .unwrap();

        assert!(outcome.won);
        assert_eq!(outcome.result, CoinSide::Heads);
        assert_eq!(outcome.payout, 100);
        assert_eq!(outcome.new_balance, 150);
        assert_eq!(outcome.stats.wins, 1);
        assert_eq!(outcome.stats.total_won, 100);
    }

    #[tokio::test]
    async fn test_loss_takes_stake() {
        let (resolver, _) = resolver_with(100, CoinSide::Tails).await;

        let outcome = resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 50))
            .await
            .unwrap();

        assert!(!outcome.won);
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.new_balance, 50);
        assert_eq!(outcome.stats.losses, 1);
        assert_eq!(outcome.stats.total_lost, 50);
    }

    #[tokio::test]
    async fn test_even_money_win_leaves_balance() {
        let store = MemoryStore::new();
        store.set_balance(1, 100).await;
        let config = GameConfig::default().with_win_multiplier(1.0).unwrap();
        let resolver = Resolver::new(
            Ledger::new(Arc::new(store.clone()), 0),
            Arc::new(store),
            config,
        )
        .with_flipper(Arc::new(FixedFlipper(CoinSide::Tails)));

        let outcome = resolver
            .resolve(BetRequest::new(1, CoinSide::Tails, 40))
            .await
            .unwrap();

        assert!(outcome.won);
        assert_eq!(outcome.new_balance, 100);
        assert_eq!(outcome.stats.total_won, 40);
    }

    #[tokio::test]
    async fn test_insufficient_funds_changes_nothing() {
        let (resolver, _) = resolver_with(30, CoinSide::Heads).await;

        let err = resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 50))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GameError::InsufficientFunds {
                balance: 30,
                bet: 50
            }
        ));
        assert_eq!(resolver.balance(1).await.unwrap(), 30);
        assert!(resolver.stats(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_bet_is_invalid() {
        let (resolver, _) = resolver_with(100, CoinSide::Heads).await;

        let err = resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::InvalidBet(_)));
        assert_eq!(resolver.balance(1).await.unwrap(), 100);
        assert!(resolver.stats(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slot_released_after_error() {
        let (resolver, _) = resolver_with(10, CoinSide::Heads).await;

        let _ = resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 500))
            .await;

        assert!(!resolver.is_in_progress(1));
        assert!(
            resolver
                .resolve(BetRequest::new(1, CoinSide::Heads, 5))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_stats_summary() {
        let (resolver, _) = resolver_with(100, CoinSide::Heads).await;

        resolver
            .resolve(BetRequest::new(1, CoinSide::Heads, 10))
            .await
            .unwrap();
        resolver
            .resolve(BetRequest::new(1, CoinSide::Tails, 10))
            .await
            .unwrap();

        let summary = resolver.stats(1).await.unwrap().unwrap();
        assert_eq!(summary.stats.total_games, 2);
        assert_eq!(summary.win_rate, 50.0);
        assert_eq!(summary.profit, 10);
    }
}
