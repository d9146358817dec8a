use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::chatbot::ChatTimings;
use crate::submissions::ListingAccess;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the site backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub chatbot: ChatbotConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            database: DatabaseConfig::load()?,
            admin: AdminConfig::load(),
            chatbot: ChatbotConfig::load()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the submission store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

impl DatabaseConfig {
    fn load() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: "DATABASE_POOL_SIZE",
                    value: raw,
                })?,
            Err(_) => 4,
        };

        Ok(Self { url, pool_size })
    }
}

/// Access rules for the submission listing endpoints.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub api_token: Option<String>,
    pub open_listings: bool,
}

impl AdminConfig {
    fn load() -> Self {
        let api_token = env::var("ADMIN_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let open_listings = env::var("ADMIN_LISTINGS_OPEN")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            api_token,
            open_listings,
        }
    }

    pub fn listing_access(&self) -> ListingAccess {
        match (&self.api_token, self.open_listings) {
            (Some(token), _) => ListingAccess::Bearer(token.clone()),
            (None, true) => ListingAccess::Open,
            (None, false) => ListingAccess::Disabled,
        }
    }
}

/// Pacing of the scripted chat widget.
#[derive(Debug, Clone, Copy)]
pub struct ChatbotConfig {
    pub typing_delay_ms: u64,
    pub story_delay_ms: u64,
    pub auto_open_ms: u64,
}

impl ChatbotConfig {
    /// Loads chatbot pacing on its own so the terminal chat does not need a database.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            typing_delay_ms: millis_from_env("CHATBOT_TYPING_DELAY_MS", 1_000)?,
            story_delay_ms: millis_from_env("CHATBOT_STORY_DELAY_MS", 2_000)?,
            auto_open_ms: millis_from_env("CHATBOT_AUTO_OPEN_MS", 5_000)?,
        })
    }

    pub fn timings(&self) -> ChatTimings {
        ChatTimings {
            typing_delay: Duration::from_millis(self.typing_delay_ms),
            story_delay: Duration::from_millis(self.story_delay_ms),
            auto_open_delay: Duration::from_millis(self.auto_open_ms),
        }
    }
}

fn millis_from_env(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingDatabaseUrl,
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL must be set to reach the submission store")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a valid integer (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingDatabaseUrl
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}
