//! One-game-per-user lock table.

use super::errors::{GameError, GameResult};
use crate::ledger::UserId;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Users with an unresolved game
///
/// Acquisition never waits: a user already in the table is rejected.
#[derive(Debug, Clone, Default)]
pub struct ActiveGames {
    users: Arc<Mutex<HashSet<UserId>>>,
}

impl ActiveGames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as playing
    ///
    /// # Errors
    ///
    /// * `GameError::GameInProgress` - The user already holds a guard
    pub fn try_acquire(&self, user_id: UserId) -> GameResult<GameGuard> {
        if !lock(&self.users).insert(user_id) {
            log::warn!("Rejected concurrent game for user {user_id}");
            return Err(GameError::GameInProgress(user_id));
        }

        Ok(GameGuard {
            user_id,
            users: Arc::clone(&self.users),
        })
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        lock(&self.users).contains(&user_id)
    }

    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the user's slot when dropped
#[must_use = "the game slot is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GameGuard {
    user_id: UserId,
    users: Arc<Mutex<HashSet<UserId>>>,
}

impl Drop for GameGuard {
    fn drop(&mut self) {
        lock(&self.users).remove(&self.user_id);
    }
}

// The set stays consistent even if a holder panicked, so poisoning is ignored.
fn lock(users: &Mutex<HashSet<UserId>>) -> MutexGuard<'_, HashSet<UserId>> {
    users.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected() {
        let games = ActiveGames::new();

        let _guard = games.try_acquire(1).unwrap();
        assert!(matches!(
            games.try_acquire(1),
            Err(GameError::GameInProgress(1))
        ));
    }

    #[test]
    fn test_different_users_do_not_block() {
        let games = ActiveGames::new();

        let _first = games.try_acquire(1).unwrap();
        let _second = games.try_acquire(2).unwrap();
        assert_eq!(games.len(), 2);
    }

    #[test]
    fn test_drop_releases_slot() {
        let games = ActiveGames::new();

        let guard = games.try_acquire(1).unwrap();
        assert!(games.contains(1));
        drop(guard);

        assert!(!games.contains(1));
        assert!(games.is_empty());
        assert!(games.try_acquire(1).is_ok());
    }

    #[test]
    fn test_slot_released_after_panic() {
        let games = ActiveGames::new();
        let cloned = games.clone();

        let result = std::thread::spawn(move || {
            let _guard = cloned.try_acquire(1).unwrap();
            panic!("game handler crashed");
        })
        .join();

        assert!(result.is_err());
        assert!(!games.contains(1));
    }
}
