//! Coinflip gambling server.
//!
//! Serves the coinflip game over HTTP, backed by PostgreSQL or, with
//! `--memory`, by an in-process store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use coinflip::{
    Ledger, Resolver,
    db::{Database, MemoryStore, PgAccountStore, PgStatsStore},
};
use coinflip_server::{
    api,
    config::{Overrides, ServerConfig},
    logging, metrics,
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run the coinflip gambling server

USAGE:
  coinflip_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --db-url        URL      Database connection string  [default: env DATABASE_URL]
  --metrics-bind  IP:PORT  Prometheus scrape address   [default: env METRICS_BIND or disabled]

FLAGS:
  --memory                 Keep balances and stats in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  STARTING_BALANCE         Balance given to new accounts (default: 0)
  WIN_MULTIPLIER           Gross payout ratio on a win (default: 2.0)
  DB_MAX_CONNECTIONS       Pool size and other DB_* pool settings
  RUST_LOG                 Log filter (default: info)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        memory: pargs.contains("--memory"),
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        metrics_bind: pargs.opt_value_from_str::<_, SocketAddr>("--metrics-bind")?,
    };

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    logging::init();
    info!("Starting coinflip server at {}", config.bind);
    info!(
        "Starting balance {}, win multiplier {}x",
        config.starting_balance,
        config.game.win_multiplier()
    );

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exposed at http://{addr}/metrics");
    }

    let (resolver, database) = match &config.database {
        Some(db_config) => {
            let db = Database::new(db_config)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
            db.apply_schema()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to apply schema: {}", e))?;
            info!("Database connected successfully");

            let pool = Arc::new(db.pool().clone());
            let ledger = Ledger::new(
                Arc::new(PgAccountStore::new(pool.clone())),
                config.starting_balance,
            );
            let resolver = Resolver::new(ledger, Arc::new(PgStatsStore::new(pool)), config.game);
            (resolver, Some(db))
        }
        None => {
            log::warn!("Running on the in-memory store; balances are lost on exit");
            let store = MemoryStore::new();
            let ledger = Ledger::new(Arc::new(store.clone()), config.starting_balance);
            (Resolver::new(ledger, Arc::new(store), config.game), None)
        }
    };

    let app = api::create_router(api::AppState::new(resolver, database.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
