//! Configuration management for the FarmLink platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARMLINK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Cache and counter store
    pub cache: CacheConfig,

    /// JWT session configuration
    pub jwt: JwtConfig,

    /// Login attempt limiting
    pub rate_limit: RateLimitConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// OpenAI crop advisory configuration
    pub openai: OpenAiConfig,

    /// SMS gateway configuration
    pub sms: SmsConfig,

    /// Irrigation reminder worker
    pub irrigation: IrrigationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Which store backs the cache and the login counters
    pub backend: CacheBackend,

    /// Redis connection URL, used when backend is `redis`
    pub redis_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Session lifetime in seconds
    pub expiry_seconds: i64,

    /// Name of the session cookie
    pub cookie_name: String,

    /// Only send the cookie over HTTPS
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Failed logins allowed per window
    pub max_attempts: i64,

    /// Window length in seconds, counted from the first failure
    pub window_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// How long a city's weather stays cached, in seconds
    pub cache_ttl_seconds: u64,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// City used for irrigation checks when the request names none
    pub default_city: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    /// Chat completions endpoint base URL
    pub api_endpoint: String,

    /// OpenAI API key
    pub api_key: String,

    /// Chat model name
    pub model: String,

    /// Serve a canned answer instead of calling OpenAI
    pub mock: bool,

    /// How long a recommendation stays cached, in seconds
    pub cache_ttl_seconds: u64,

    /// Pause before each uncached call, in milliseconds
    pub pre_call_delay_ms: u64,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmsConfig {
    /// Send real SMS through Twilio; otherwise messages are only logged
    pub enabled: bool,

    /// Twilio REST API base URL
    pub api_endpoint: String,

    /// Twilio account SID
    pub account_sid: String,

    /// Twilio auth token
    pub auth_token: String,

    /// Sender phone number
    pub from_number: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IrrigationConfig {
    /// Run the reminder worker in this process
    pub reminders_enabled: bool,

    /// Seconds between reminder sweeps
    pub poll_interval_seconds: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARMLINK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("cache.backend", "memory")?
            .set_default("cache.redis_url", "redis://127.0.0.1:6379")?
            .set_default("jwt.expiry_seconds", 30 * 24 * 3600)?
            .set_default("jwt.cookie_name", "jwt")?
            .set_default("jwt.secure_cookie", false)?
            .set_default("rate_limit.max_attempts", 5)?
            .set_default("rate_limit.window_seconds", 900)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.cache_ttl_seconds", 600)?
            .set_default("weather.timeout_seconds", 10)?
            .set_default("weather.default_city", "Delhi")?
            .set_default("openai.api_endpoint", "https://api.openai.com/v1")?
            .set_default("openai.api_key", "")?
            .set_default("openai.model", "gpt-3.5-turbo")?
            .set_default("openai.mock", false)?
            .set_default("openai.cache_ttl_seconds", 3600)?
            .set_default("openai.pre_call_delay_ms", 3000)?
            .set_default("openai.timeout_seconds", 30)?
            .set_default("sms.enabled", false)?
            .set_default("sms.api_endpoint", "https://api.twilio.com/2010-04-01")?
            .set_default("sms.account_sid", "")?
            .set_default("sms.auth_token", "")?
            .set_default("sms.from_number", "")?
            .set_default("irrigation.reminders_enabled", true)?
            .set_default("irrigation.poll_interval_seconds", 60)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARMLINK_ prefix)
            .add_source(
                Environment::with_prefix("FARMLINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl OpenAiConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn pre_call_delay(&self) -> Duration {
        Duration::from_millis(self.pre_call_delay_ms)
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 900,
        }
    }
}
