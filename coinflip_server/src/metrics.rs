//! Prometheus metrics for monitoring the coinflip server.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener when
//! `--metrics-bind` (or `METRICS_BIND`) is given. Without an installed
//! exporter the recording helpers are no-ops.
//!
//! # Metrics
//!
//! - `coinflip_games_total{outcome}`: resolved games, `win` or `loss`
//! - `coinflip_wagered_total`: sum of accepted stakes
//! - `coinflip_rejected_total{reason}`: bets refused before or during settlement
//! - `http_requests_total{method,status}` and `http_request_duration_ms{method}`
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use coinflip_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::game_resolved(true, 50);
//! ```

use coinflip::GameError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Record a resolved game and its stake.
pub fn game_resolved(won: bool, bet_amount: i64) {
    let outcome = if won { "win" } else { "loss" };
    metrics::counter!("coinflip_games_total", "outcome" => outcome).increment(1);
    metrics::counter!("coinflip_wagered_total").increment(bet_amount.max(0) as u64);
}

/// Record a bet that did not resolve.
pub fn game_rejected(err: &GameError) {
    metrics::counter!("coinflip_rejected_total", "reason" => rejection_reason(err)).increment(1);
}

/// Label value for a rejected bet
pub fn rejection_reason(err: &GameError) -> &'static str {
    match err {
        GameError::InvalidBet(_) => "invalid_bet",
        GameError::InsufficientFunds { .. } => "insufficient_funds",
        GameError::GameInProgress(_) => "game_in_progress",
        GameError::Persistence(_) => "persistence",
    }
}
