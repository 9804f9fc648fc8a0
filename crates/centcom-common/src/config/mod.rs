//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BubberConfig, ConfigError, DatabaseConfig, Environment, HttpConfig,
    SourcesConfig, SyncConfig,
};
