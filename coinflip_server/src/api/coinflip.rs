//! Coinflip game handler.
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/coinflip \
//!   -H "Content-Type: application/json" \
//!   -d '{"user_id": 42, "side": "heads", "amount": 50}'
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use coinflip::{BetRequest, FlipOutcome, GameError, UserId};
use serde::Deserialize;
use serde_json::Value;

use super::{AppState, ErrorResponse, error_response, request_id::RequestId};
use crate::metrics;

/// Bet as typed by the user
///
/// `side` and `amount` are taken as raw JSON so malformed input reaches the
/// game's own validation and comes back as an invalid bet.
#[derive(Debug, Deserialize)]
pub struct CoinflipRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub side: Value,
    #[serde(default)]
    pub amount: Value,
}

impl CoinflipRequest {
    fn to_bet(&self) -> Result<BetRequest, GameError> {
        BetRequest::parse(self.user_id, &raw_text(&self.side), &raw_text(&self.amount))
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Play one coinflip.
///
/// # Response
///
/// Returns `200 OK` with the outcome:
/// ```json
/// {
///   "side_chosen": "heads",
///   "result": "tails",
///   "won": false,
///   "bet_amount": 50,
///   "payout": 0,
///   "new_balance": 50,
///   "stats": { "user_id": 42, "total_games": 1, "wins": 0, "losses": 1,
///              "total_bet": 50, "total_won": 0, "total_lost": 50 }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, unknown side, or amount not a positive integer
/// - `409 Conflict`: The user already has a game in progress
/// - `422 Unprocessable Entity`: Bet exceeds the balance
/// - `500 Internal Server Error`: Store failure; no balance change was applied
pub async fn flip(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CoinflipRequest>, JsonRejection>,
) -> Result<Json<FlipOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(request_id = request_id.as_str(), error = %rejection, "Malformed bet body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    let result = match request.to_bet() {
        Ok(bet) => state.resolver.resolve(bet).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            metrics::game_resolved(outcome.won, outcome.bet_amount);
            tracing::info!(
                request_id = request_id.as_str(),
                user_id = request.user_id,
                bet = outcome.bet_amount,
                result = %outcome.result,
                won = outcome.won,
                new_balance = outcome.new_balance,
                "Coinflip resolved"
            );
            Ok(Json(outcome))
        }
        Err(e) => {
            metrics::game_rejected(&e);
            if matches!(e, GameError::Persistence(_)) {
                tracing::error!(
                    request_id = request_id.as_str(),
                    user_id = request.user_id,
                    error = %e,
                    "Coinflip failed"
                );
            } else {
                tracing::debug!(
                    request_id = request_id.as_str(),
                    user_id = request.user_id,
                    error = %e,
                    "Coinflip rejected"
                );
            }
            Err(error_response(&e))
        }
    }
}
