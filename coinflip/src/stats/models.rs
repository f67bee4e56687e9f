//! Gambling statistics models.

use crate::ledger::UserId;
use serde::{Deserialize, Serialize};

/// Cumulative gambling statistics for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamblingStats {
    pub user_id: UserId,
    pub total_games: i64,
    pub wins: i64,
    pub losses: i64,
    pub total_bet: i64,
    pub total_won: i64,
    pub total_lost: i64,
}

impl GamblingStats {
    /// Stats for a user with no resolved games
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            total_games: 0,
            wins: 0,
            losses: 0,
            total_bet: 0,
            total_won: 0,
            total_lost: 0,
        }
    }

    /// Fold one game into the running totals
    pub fn apply(&mut self, delta: &StatsDelta) {
        self.total_games = self.total_games.saturating_add(1);
        self.wins = self.wins.saturating_add(delta.wins());
        self.losses = self.losses.saturating_add(delta.losses());
        self.total_bet = self.total_bet.saturating_add(delta.bet);
        self.total_won = self.total_won.saturating_add(delta.total_won());
        self.total_lost = self.total_lost.saturating_add(delta.total_lost());
    }

    /// Percentage of games won, 0.0 for a user with no games
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.total_games.max(1) as f64 * 100.0
    }

    /// Gross winnings minus stakes lost
    pub fn profit(&self) -> i64 {
        self.total_won.saturating_sub(self.total_lost)
    }

    /// Stats together with the derived figures shown to users
    pub fn summary(self) -> StatsSummary {
        StatsSummary {
            win_rate: self.win_rate(),
            profit: self.profit(),
            stats: self,
        }
    }
}

/// Increment produced by a single resolved game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub won: bool,
    pub bet: i64,
    /// Gross amount returned on a win (stake included), 0 on a loss
    pub payout: i64,
}

impl StatsDelta {
    /// Delta for a won game
    pub fn win(bet: i64, payout: i64) -> Self {
        Self {
            won: true,
            bet,
            payout,
        }
    }

    /// Delta for a lost game
    pub fn loss(bet: i64) -> Self {
        Self {
            won: false,
            bet,
            payout: 0,
        }
    }

    pub fn wins(&self) -> i64 {
        i64::from(self.won)
    }

    pub fn losses(&self) -> i64 {
        i64::from(!self.won)
    }

    pub fn total_won(&self) -> i64 {
        if self.won { self.payout } else { 0 }
    }

    pub fn total_lost(&self) -> i64 {
        if self.won { 0 } else { self.bet }
    }
}

/// Stats view with win rate and profit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(flatten)]
    pub stats: GamblingStats,
    pub win_rate: f64,
    pub profit: i64,
}
