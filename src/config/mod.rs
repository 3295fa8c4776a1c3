//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, EngineConfig, LogFormat, LoggingConfig, ProviderConfig, ServerConfig,
};
