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
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub http: HttpConfig,
    pub sources: SourcesConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
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
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(()),
        }
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
}

/// Synchronization scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Seconds between incremental crawls
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,
    /// Seconds between complete refreshes
    #[serde(default = "default_full_refresh_interval")]
    pub full_refresh_interval_secs: u64,
    /// Number of stored bans used as the overlap window
    #[serde(default = "default_recent_window")]
    pub recent_window: i64,
    /// Upper bound on pages per incremental crawl
    #[serde(default)]
    pub max_pages: Option<u32>,
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn full_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.full_refresh_interval_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sync_interval(),
            full_refresh_interval_secs: default_full_refresh_interval(),
            recent_window: default_recent_window(),
            max_pages: None,
        }
    }
}

/// Outbound HTTP client settings shared by every source
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Per-source settings
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub bubber: BubberConfig,
}

/// Bubberstation source settings
#[derive(Debug, Clone, Deserialize)]
pub struct BubberConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bubber_base_url")]
    pub base_url: String,
}

impl Default for BubberConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_bubber_base_url(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "centcom".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_sync_interval() -> u64 {
    300 // 5 minutes
}

fn default_full_refresh_interval() -> u64 {
    86400 // 1 day
}

fn default_recent_window() -> i64 {
    5
}

fn default_http_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("centcom-sync/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_bubber_base_url() -> String {
    "https://bubberstation.org".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    /// or a variable is set to an unparsable value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&lookup, "APP_ENV")?.unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            sync: SyncConfig {
                interval_secs: parse_var(&lookup, "SYNC_INTERVAL_SECS")?
                    .unwrap_or_else(default_sync_interval),
                full_refresh_interval_secs: parse_var(&lookup, "SYNC_FULL_REFRESH_INTERVAL_SECS")?
                    .unwrap_or_else(default_full_refresh_interval),
                recent_window: parse_var(&lookup, "SYNC_RECENT_WINDOW")?
                    .unwrap_or_else(default_recent_window),
                max_pages: parse_var(&lookup, "SYNC_MAX_PAGES")?,
            },
            http: HttpConfig {
                timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS")?
                    .unwrap_or_else(default_http_timeout),
                user_agent: lookup("HTTP_USER_AGENT").unwrap_or_else(default_user_agent),
            },
            sources: SourcesConfig {
                bubber: BubberConfig {
                    enabled: parse_var(&lookup, "BUBBER_ENABLED")?.unwrap_or_else(default_enabled),
                    base_url: lookup("BUBBER_BASE_URL").unwrap_or_else(default_bubber_base_url),
                },
            },
        };

        if config.sync.interval_secs == 0 {
            return Err(ConfigError::InvalidValue("SYNC_INTERVAL_SECS", "0".to_string()));
        }
        if config.sync.full_refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SYNC_FULL_REFRESH_INTERVAL_SECS",
                "0".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Parse an optional variable, rejecting values that are present but malformed
fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
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
