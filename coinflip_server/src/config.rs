//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use coinflip::{GameConfig, db::DatabaseConfig, game::GameConfigError};
use std::net::SocketAddr;

const DEFAULT_BIND: &str = "127.0.0.1:6969";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration, `None` to run on the in-memory store
    pub database: Option<DatabaseConfig>,
    /// Balance given to an account on first access
    pub starting_balance: i64,
    /// Payout settings
    pub game: GameConfig,
    /// Prometheus scrape endpoint, disabled when `None`
    pub metrics_bind: Option<SocketAddr>,
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub memory: bool,
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if `DATABASE_URL` is missing while the in-memory store
    /// was not requested, or if any set variable is invalid
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_addr_var("SERVER_BIND")?.unwrap_or(default_bind()),
        };

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_addr_var("METRICS_BIND")?,
        };

        let database = if overrides.memory {
            None
        } else {
            let database_url = overrides
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "Set a PostgreSQL URL or pass --memory".to_string(),
                })?;
            Some(DatabaseConfig::with_url(database_url))
        };

        let starting_balance = match std::env::var("STARTING_BALANCE") {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "STARTING_BALANCE".to_string(),
                reason: format!("Expected a whole number, got {value:?}"),
            })?,
            Err(_) => 0,
        };

        let game = GameConfig::from_env().map_err(ConfigError::from)?;

        Ok(ServerConfig {
            bind,
            database,
            starting_balance,
            game,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_balance < 0 {
            return Err(ConfigError::Invalid {
                var: "STARTING_BALANCE".to_string(),
                reason: format!("Must not be negative, got {}", self.starting_balance),
            });
        }

        self.game.validate()?;

        if let Some(db) = &self.database {
            if db.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }

            if db.min_connections > db.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!("Cannot exceed max connections ({})", db.max_connections),
                });
            }
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl From<GameConfigError> for ConfigError {
    fn from(err: GameConfigError) -> Self {
        let var = match err {
            GameConfigError::InvalidMultiplier(_) => "WIN_MULTIPLIER",
        };

        ConfigError::Invalid {
            var: var.to_string(),
            reason: err.to_string(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6969))
}

/// Parse an address variable, treating a malformed value as an error
fn parse_addr_var(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Expected IP:PORT (e.g. {DEFAULT_BIND}), got {value:?}"),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            database: None,
            starting_balance: 0,
            game: GameConfig::default(),
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Pass --memory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Pass --memory"));
    }

    #[test]
    fn test_default_bind_matches_help() {
        assert_eq!(default_bind().to_string(), DEFAULT_BIND);
    }

    #[test]
    fn test_memory_config_valid() {
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_game_error_names_variable() {
        let err: ConfigError = GameConfigError::InvalidMultiplier(0.5).into();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "WIN_MULTIPLIER"));
    }

    #[test]
    fn test_validation_negative_starting_balance() {
        let mut config = memory_config();
        config.starting_balance = -5;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "STARTING_BALANCE"));
    }

    #[test]
    fn test_validation_pool_bounds() {
        let mut config = memory_config();
        let mut db = DatabaseConfig::development();
        db.min_connections = 10;
        db.max_connections = 5;
        config.database = Some(db);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "DB_MIN_CONNECTIONS"));
    }

    #[test]
    fn test_validation_metrics_port_clash() {
        let mut config = memory_config();
        config.metrics_bind = Some(config.bind);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_bypass_environment() {
        let config = ServerConfig::from_env(Overrides {
            bind: Some("0.0.0.0:7000".parse().unwrap()),
            database_url: Some("postgres://example/db".to_string()),
            memory: false,
            metrics_bind: Some("0.0.0.0:9100".parse().unwrap()),
        })
        .unwrap();

        assert_eq!(config.bind.port(), 7000);
        assert_eq!(config.metrics_bind.map(|a| a.port()), Some(9100));
        assert_eq!(
            config.database.map(|db| db.database_url),
            Some("postgres://example/db".to_string())
        );
    }

    #[test]
    fn test_memory_flag_skips_database() {
        let config = ServerConfig::from_env(Overrides {
            bind: Some("127.0.0.1:7001".parse().unwrap()),
            database_url: Some("postgres://ignored/db".to_string()),
            memory: true,
            metrics_bind: Some("127.0.0.1:9101".parse().unwrap()),
        })
        .unwrap();

        assert!(config.database.is_none());
    }
}
