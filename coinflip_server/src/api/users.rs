//! Balance and statistics lookups.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use coinflip::{StatsSummary, UserId};
use serde::Serialize;

use super::{AppState, ErrorResponse, error_response};

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub user_id: UserId,
    pub balance: i64,
}

/// Get a user's balance.
///
/// Unknown users are given an account at the configured starting balance,
/// so this never returns 404.
pub async fn balance(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.resolver.balance(user_id).await {
        Ok(balance) => Ok(Json(BalanceResponse { user_id, balance })),
        Err(e) => {
            tracing::error!(user_id, error = %e, "Balance lookup failed");
            Err(error_response(&e))
        }
    }
}

/// Get a user's gambling statistics with win rate and profit.
///
/// # Errors
///
/// - `404 Not Found`: The user has not played any gambling games yet
/// - `500 Internal Server Error`: Store failure
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<StatsSummary>, (StatusCode, Json<ErrorResponse>)> {
    match state.resolver.stats(user_id).await {
        Ok(Some(summary)) => Ok(Json(summary)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "You haven't played any gambling games yet".to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!(user_id, error = %e, "Stats lookup failed");
            Err(error_response(&e))
        }
    }
}
