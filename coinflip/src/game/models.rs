//! Coinflip request and outcome models.

use super::errors::{GameError, GameResult};
use crate::ledger::UserId;
use crate::stats::GamblingStats;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Side of the coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl std::fmt::Display for CoinSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

impl FromStr for CoinSide {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heads" => Ok(CoinSide::Heads),
            "tails" => Ok(CoinSide::Tails),
            other => Err(GameError::InvalidBet(format!(
                "side must be heads or tails, got {other:?}"
            ))),
        }
    }
}

/// Uniform over both sides
impl Distribution<CoinSide> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CoinSide {
        if rng.random() {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

/// One wager, as submitted by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRequest {
    pub user_id: UserId,
    pub side_chosen: CoinSide,
    pub bet_amount: i64,
}

impl BetRequest {
    pub fn new(user_id: UserId, side_chosen: CoinSide, bet_amount: i64) -> Self {
        Self {
            user_id,
            side_chosen,
            bet_amount,
        }
    }

    /// Build a request from raw user input
    ///
    /// # Errors
    ///
    /// * `GameError::InvalidBet` - Unknown side, or an amount that is not a positive integer
    pub fn parse(user_id: UserId, side: &str, amount: &str) -> GameResult<Self> {
        let side_chosen = side.parse()?;
        let bet_amount: i64 = amount
            .trim()
            .parse()
            .map_err(|_| GameError::InvalidBet(format!("{amount:?} is not a valid number")))?;

        if bet_amount <= 0 {
            return Err(GameError::InvalidBet(
                "can't bet zero or negative amounts".to_string(),
            ));
        }

        Ok(Self::new(user_id, side_chosen, bet_amount))
    }
}

/// Result of a resolved coinflip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipOutcome {
    pub side_chosen: CoinSide,
    pub result: CoinSide,
    pub won: bool,
    pub bet_amount: i64,
    /// Gross amount returned on a win (stake included), 0 on a loss
    pub payout: i64,
    pub new_balance: i64,
    pub stats: GamblingStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_parse_side() {
        assert_eq!("heads".parse::<CoinSide>().unwrap(), CoinSide::Heads);
        assert_eq!(" Tails ".parse::<CoinSide>().unwrap(), CoinSide::Tails);
        assert!(matches!(
            "edge".parse::<CoinSide>(),
            Err(GameError::InvalidBet(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for side in [CoinSide::Heads, CoinSide::Tails] {
            assert_eq!(side.to_string().parse::<CoinSide>().unwrap(), side);
        }
    }

    #[test]
    fn test_bet_request_parse() {
        let request = BetRequest::parse(4, "heads", " 50 ").unwrap();
        assert_eq!(request, BetRequest::new(4, CoinSide::Heads, 50));
    }

    #[test]
    fn test_bet_request_rejects_bad_amounts() {
        for amount in ["0", "-10", "ten", "", "1.5", "99999999999999999999"] {
            assert!(
                matches!(
                    BetRequest::parse(4, "tails", amount),
                    Err(GameError::InvalidBet(_))
                ),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sides_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let heads = (0..10_000)
            .map(|_| rng.random::<CoinSide>())
            .filter(|side| *side == CoinSide::Heads)
            .count();

        assert!((4_500..=5_500).contains(&heads), "heads came up {heads} times");
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CoinSide::Heads).unwrap(),
            "\"heads\""
        );
    }
}
