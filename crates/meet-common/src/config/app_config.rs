//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub database: Option<DatabaseConfig>,
    pub game: GameConfig,
    pub room: RoomConfig,
    pub recommendation: RecommendationConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// PostgreSQL configuration; absent means the in-memory store is used
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Mini-game timing
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Seconds past the target value before a running game auto-ends
    #[serde(default = "default_game_grace_secs")]
    pub grace_secs: u64,
    /// Seconds a finished game stays in memory
    #[serde(default = "default_game_retention_secs")]
    pub retention_secs: u64,
}

impl GameConfig {
    #[must_use]
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grace_secs: default_game_grace_secs(),
            retention_secs: default_game_retention_secs(),
        }
    }
}

/// Room fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Outbound frames buffered per connection before deliveries are dropped
    #[serde(default = "default_room_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_room_buffer_size(),
        }
    }
}

/// Location recommendation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// How many ranked venues are returned
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
    /// Search radius when no participant states a maximum distance
    #[serde(default = "default_max_distance_km")]
    pub default_max_distance_km: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            limit: default_recommendation_limit(),
            default_max_distance_km: default_max_distance_km(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "meet-consensus".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_game_grace_secs() -> u64 {
    15
}

fn default_game_retention_secs() -> u64 {
    300 // 5 minutes
}

fn default_room_buffer_size() -> usize {
    100
}

fn default_recommendation_limit() -> usize {
    10
}

fn default_max_distance_km() -> f64 {
    30.0
}

/// Parse an optional variable, rejecting values that are set but malformed
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env_name = env::var("APP_ENV").ok();
        let app_env = match env_name.as_deref() {
            Some(raw) => Environment::parse(raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw.to_string()))?,
            None => Environment::default(),
        };

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Some(DatabaseConfig {
                url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
            _ => None,
        };

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: app_env,
            },
            gateway: ServerConfig {
                host: env::var("GATEWAY_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("GATEWAY_PORT")?.ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?,
            },
            database,
            game: GameConfig {
                grace_secs: parse_var("GAME_GRACE_SECS")?.unwrap_or_else(default_game_grace_secs),
                retention_secs: parse_var("GAME_RETENTION_SECS")?
                    .unwrap_or_else(default_game_retention_secs),
            },
            room: RoomConfig {
                buffer_size: parse_var("ROOM_BUFFER_SIZE")?.unwrap_or_else(default_room_buffer_size),
            },
            recommendation: RecommendationConfig {
                limit: parse_var("RECOMMENDATION_LIMIT")?
                    .unwrap_or_else(default_recommendation_limit),
                default_max_distance_km: parse_var("DEFAULT_MAX_DISTANCE_KM")?
                    .unwrap_or_else(default_max_distance_km),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room.buffer_size == 0 {
            return Err(ConfigError::InvalidValue("ROOM_BUFFER_SIZE", "0".to_string()));
        }
        if self.recommendation.limit == 0 {
            return Err(ConfigError::InvalidValue("RECOMMENDATION_LIMIT", "0".to_string()));
        }
        if !(self.recommendation.default_max_distance_km > 0.0) {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_MAX_DISTANCE_KM",
                self.recommendation.default_max_distance_km.to_string(),
            ));
        }
        Ok(())
    }

    /// Configuration for tests and embedded use: in-memory store, ephemeral port
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            gateway: ServerConfig {
                host: default_host(),
                port: 0,
            },
            database: None,
            game: GameConfig::default(),
            room: RoomConfig::default(),
            recommendation: RecommendationConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("Production"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::for_testing();
        assert_eq!(config.game.grace(), Duration::from_secs(15));
        assert_eq!(config.game.retention(), Duration::from_secs(300));
        assert_eq!(config.room.buffer_size, 100);
        assert_eq!(config.recommendation.limit, 10);
        assert!((config.recommendation.default_max_distance_km - 30.0).abs() < f64::EPSILON);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let mut config = AppConfig::for_testing();
        config.room.buffer_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("ROOM_BUFFER_SIZE", _))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_distance() {
        let mut config = AppConfig::for_testing();
        config.recommendation.default_max_distance_km = 0.0;
        assert!(config.validate().is_err());
    }
}
