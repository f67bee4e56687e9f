//! Ledger data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier as issued by the chat platform
pub type UserId = i64;

/// Account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Fresh account holding the starting balance
    pub fn new(user_id: UserId, starting_balance: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance: starting_balance,
            created_at: now,
            updated_at: now,
        }
    }
}
