//! Sources of coin outcomes.

use super::models::CoinSide;
use rand::Rng;

/// Produces one coin outcome per call
pub trait CoinFlipper: Send + Sync {
    fn flip(&self) -> CoinSide;
}

/// Fair coin backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFlipper;

impl CoinFlipper for RandomFlipper {
    fn flip(&self) -> CoinSide {
        rand::rng().random()
    }
}

/// Always lands on the same side
#[derive(Debug, Clone, Copy)]
pub struct FixedFlipper(pub CoinSide);

impl CoinFlipper for FixedFlipper {
    fn flip(&self) -> CoinSide {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_flipper() {
        let flipper = FixedFlipper(CoinSide::Tails);
        assert!((0..20).all(|_| flipper.flip() == CoinSide::Tails));
    }

    #[test]
    fn test_random_flipper_lands_on_both_sides() {
        let flipper = RandomFlipper;
        let flips: Vec<_> = (0..200).map(|_| flipper.flip()).collect();

        assert!(flips.contains(&CoinSide::Heads));
        assert!(flips.contains(&CoinSide::Tails));
    }
}
