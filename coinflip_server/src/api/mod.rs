//! HTTP API for the coinflip server.
//!
//! The API stands in for the chat front end: it accepts a bet, runs it through
//! the [`Resolver`], and returns the outcome for rendering. It also exposes a
//! user's balance and gambling statistics.
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                              - Health check
//! POST /api/v1/coinflip                     - Play one game
//! GET  /api/v1/users/{user_id}/balance      - Current balance
//! GET  /api/v1/users/{user_id}/stats        - Gambling statistics
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use coinflip::{db::MemoryStore, GameConfig, Ledger, Resolver};
//! use coinflip_server::api::{create_router, AppState};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let ledger = Ledger::new(Arc::new(store.clone()), 100);
//! let resolver = Resolver::new(ledger, Arc::new(store), GameConfig::default());
//!
//! let app = create_router(AppState::new(resolver, None));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod coinflip;
pub mod request_id;
pub mod users;

use ::coinflip::{GameError, Resolver, db::Database};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// `database` is `None` when the server runs on the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(resolver: Resolver, database: Option<Database>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            database,
        }
    }
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a game error onto an HTTP status and a client-safe body
pub fn error_response(err: &GameError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        GameError::InvalidBet(_) => StatusCode::BAD_REQUEST,
        GameError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        GameError::GameInProgress(_) => StatusCode::CONFLICT,
        GameError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/coinflip", post(coinflip::flip))
        .route("/users/{user_id}/balance", get(users::balance))
        .route("/users/{user_id}/stats", get(users::stats));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the store is reachable, `503 Service Unavailable`
/// otherwise. The in-memory store is always healthy.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (store, healthy) = match &state.database {
        Some(db) => ("postgres", db.health_check().await.is_ok()),
        None => ("memory", true),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "win_multiplier": state.resolver.config().win_multiplier(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
