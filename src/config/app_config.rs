use serde::Deserialize;

use crate::domain::{DomainError, ModelCatalog, RetryPolicy};

/// Environment variables read when `provider.api_key` / `provider.base_url`
/// are not configured
const API_KEY_ENV: &str = "UNBOUND_API_KEY";
const API_BASE_ENV: &str = "UNBOUND_API_BASE";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
    pub provider: ProviderConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Retry behavior of the step runner
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_attempts: u32,
    pub attempt_timeout_ms: u64,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub retry_backoff_multiplier: f64,
}

/// OpenAI-compatible gateway settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();

        Self {
            max_attempts: policy.max_attempts,
            attempt_timeout_ms: policy.attempt_timeout_ms,
            retry_initial_delay_ms: policy.initial_delay_ms,
            retry_max_delay_ms: policy.max_delay_ms,
            retry_backoff_multiplier: policy.backoff_multiplier,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 2048,
            models: vec![
                "fireworks-ai/kimi-k2-instruct-0905".to_string(),
                "fireworks-ai/kimi-k2p5".to_string(),
            ],
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("provider.models")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.provider.apply_env_fallbacks();

        Ok(app_config)
    }
}

impl EngineConfig {
    /// Retry policy for the step runner, with the attempt budget clamped to 1
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_attempt_timeout(self.attempt_timeout_ms)
            .with_initial_delay(self.retry_initial_delay_ms)
            .with_max_delay(self.retry_max_delay_ms)
            .with_backoff_multiplier(self.retry_backoff_multiplier)
    }
}

impl ProviderConfig {
    fn apply_env_fallbacks(&mut self) {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = std::env::var(API_KEY_ENV).ok();
        }

        if self.base_url.as_deref().is_none_or(str::is_empty) {
            self.base_url = std::env::var(API_BASE_ENV).ok();
        }
    }

    /// API key required to reach the gateway
    pub fn require_api_key(&self) -> Result<&str, DomainError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(DomainError::configuration(format!(
                "provider.api_key is not set (use APP__PROVIDER__API_KEY or {})",
                API_KEY_ENV
            ))),
        }
    }

    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::new(self.models.iter().cloned())
    }
}
