use std::time::Duration;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SEARCH_LIMIT: u32 = 10;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

pub struct Configuration {
    pub bind_addr: String,
    pub unsplash_access_key: String,
    pub vision_api_key: String,
    pub search_limit: u32,
    pub lookup_timeout: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            unsplash_access_key: String::new(),
            vision_api_key: String::new(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl Configuration {
    /// Reads the configuration from the environment once at startup.
    /// Missing provider credentials abort startup instead of degrading later.
    pub fn from_env() -> Result<Self, AppError> {
        let unsplash_access_key = require_env("UNSPLASH_ACCESS_KEY")?;
        let vision_api_key = require_env("GOOGLE_VISION_API_KEY")?;

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let search_limit = std::env::var("SEARCH_LIMIT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SEARCH_LIMIT);
        let lookup_timeout_secs = std::env::var("LOOKUP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS);

        Ok(Self {
            bind_addr,
            unsplash_access_key,
            vision_api_key,
            search_limit,
            lookup_timeout: Duration::from_secs(lookup_timeout_secs),
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "Missing required environment variable: {}",
            name
        ))),
    }
}
