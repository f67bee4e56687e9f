/// Property-based tests for balance and stats bookkeeping using proptest
///
/// Random sequences of bets are played against a memory store and compared
/// with a simple model of what the balance and counters should be.
use coinflip::db::MemoryStore;
use coinflip::game::{BetRequest, CoinSide, FixedFlipper, GameConfig, GameError, Resolver};
use coinflip::ledger::Ledger;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::sync::Arc;

const USER: i64 = 1;

fn side_strategy() -> impl Strategy<Value = CoinSide> {
    prop_oneof![Just(CoinSide::Heads), Just(CoinSide::Tails)]
}

// (bet, side chosen, side the coin lands on)
fn game_strategy() -> impl Strategy<Value = (i64, CoinSide, CoinSide)> {
    (-20i64..400, side_strategy(), side_strategy())
}

fn multiplier_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(1.5), Just(1.95), Just(2.0), Just(3.0)]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

proptest! {
    #[test]
    fn test_balance_and_stats_follow_model(
        starting in 0i64..1_000,
        multiplier in multiplier_strategy(),
        games in prop::collection::vec(game_strategy(), 1..40),
    ) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let config = GameConfig::default().with_win_multiplier(multiplier).unwrap();
            let ledger = Ledger::new(Arc::new(store.clone()), starting);

            let mut balance = starting;
            let mut played = 0i64;
            let mut total_bet = 0i64;

            for (bet, chosen, landed) in games {
                // A resolver per game so each one can force its own result
                let resolver = Resolver::new(ledger.clone(), Arc::new(store.clone()), config)
                    .with_flipper(Arc::new(FixedFlipper(landed)));

                let result = resolver.resolve(BetRequest::new(USER, chosen, bet)).await;

                if bet <= 0 {
                    prop_assert!(matches!(result, Err(GameError::InvalidBet(_))));
                } else if bet > balance {
                    prop_assert!(matches!(result, Err(GameError::InsufficientFunds { .. })), "expected InsufficientFunds");
                } else {
                    let outcome = result.map_err(|e| TestCaseError::fail(e.to_string()))?;
                    let expected = if chosen == landed {
                        balance + config.payout(bet).unwrap() - bet
                    } else {
                        balance - bet
                    };

                    prop_assert_eq!(outcome.won, chosen == landed);
                    prop_assert_eq!(outcome.new_balance, expected);
                    prop_assert_eq!(
                        outcome.stats.wins + outcome.stats.losses,
                        outcome.stats.total_games
                    );

                    balance = expected;
                    played += 1;
                    total_bet += bet;
                }

                prop_assert!(balance >= 0);
                prop_assert_eq!(ledger.get_balance(USER).await.unwrap(), balance);
            }

            let summary = Resolver::new(ledger.clone(), Arc::new(store.clone()), config)
                .stats(USER)
                .await
                .unwrap();

            match summary {
                Some(summary) => {
                    prop_assert_eq!(summary.stats.total_games, played);
                    prop_assert_eq!(summary.stats.total_bet, total_bet);
                    prop_assert_eq!(
                        summary.stats.wins + summary.stats.losses,
                        summary.stats.total_games
                    );
                }
                None => prop_assert_eq!(played, 0),
            }

            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_payout_never_below_stake(bet in 1i64..1_000_000_000, multiplier in multiplier_strategy()) {
        let config = GameConfig::default().with_win_multiplier(multiplier).unwrap();
        let payout = config.payout(bet).unwrap();

        prop_assert!(payout >= bet);
        prop_assert!(payout as f64 <= bet as f64 * multiplier + 1.0);
    }
}
