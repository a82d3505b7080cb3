//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
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
    /// Parse an `APP_ENV` value; unknown values fall back to development
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" => Self::Staging,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
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

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Attachment storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory uploads are written under; also served at `/upload`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_image_bytes: default_max_image_bytes(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Real-time chat settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Per-connection delivery queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Capacity of the hub's command intake
    #[serde(default = "default_hub_intake_capacity")]
    pub hub_intake_capacity: usize,
    /// How long after sending a message its author may delete it (seconds)
    #[serde(default = "default_delete_window_secs")]
    pub delete_window_secs: i64,
    /// Time a closing connection gets to flush its queue (milliseconds)
    #[serde(default = "default_close_grace_ms")]
    pub close_grace_ms: u64,
}

impl ChatConfig {
    #[must_use]
    pub fn delete_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.delete_window_secs)
    }

    #[must_use]
    pub fn close_grace(&self) -> Duration {
        Duration::from_millis(self.close_grace_ms)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            hub_intake_capacity: default_hub_intake_capacity(),
            delete_window_secs: default_delete_window_secs(),
            close_grace_ms: default_close_grace_ms(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "campus-chat".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_access_token_expiry() -> i64 {
    86_400 // 24 hours
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./upload".to_string()
}

fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_queue_capacity() -> usize {
    256
}

fn default_hub_intake_capacity() -> usize {
    1024
}

fn default_delete_window_secs() -> i64 {
    15 * 60
}

fn default_close_grace_ms() -> u64 {
    2_000
}

/// Read an optional variable, failing if it is set but unparsable
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
    /// Returns an error if required environment variables are missing
    /// or a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let chat = ChatConfig {
            queue_capacity: parse_var("CHAT_QUEUE_CAPACITY")?
                .unwrap_or_else(default_queue_capacity),
            hub_intake_capacity: parse_var("CHAT_HUB_INTAKE_CAPACITY")?
                .unwrap_or_else(default_hub_intake_capacity),
            delete_window_secs: parse_var("CHAT_DELETE_WINDOW_SECS")?
                .unwrap_or_else(default_delete_window_secs),
            close_grace_ms: parse_var("CHAT_CLOSE_GRACE_MS")?
                .unwrap_or_else(default_close_grace_ms),
        };
        if chat.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "CHAT_QUEUE_CAPACITY",
                "must be at least 1".to_string(),
            ));
        }
        if chat.hub_intake_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "CHAT_HUB_INTAKE_CAPACITY",
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .map(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: parse_var("DATABASE_RUN_MIGRATIONS")?.unwrap_or_else(default_true),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| default_upload_dir()),
                max_image_bytes: parse_var("UPLOAD_MAX_IMAGE_BYTES")?
                    .unwrap_or_else(default_max_image_bytes),
                max_file_bytes: parse_var("UPLOAD_MAX_FILE_BYTES")?
                    .unwrap_or_else(default_max_file_bytes),
            },
            chat,
        })
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
