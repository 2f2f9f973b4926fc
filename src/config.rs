use crate::adapters::outbound::{DEFAULT_CACHE_MAXSIZE, DEFAULT_CACHE_TTL};
use crate::application::DEFAULT_API_URL;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    // Credentials and endpoint
    pub private_key: String,
    pub base_url: String,
    pub user_agent: Option<String>,

    // Default cache settings
    pub cache_max_size: usize,
    pub cache_ttl_secs: u64,

    // Per-call default timeout
    pub timeout_ms: Option<u64>,

    // Error policy
    pub cache_on_error: bool,
    pub log_api_errors: bool,
    pub raise_exc_on_error: bool,

    pub debug: bool,
}

impl ClientConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: None,
            cache_max_size: DEFAULT_CACHE_MAXSIZE,
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            timeout_ms: None,
            cache_on_error: true,
            log_api_errors: true,
            raise_exc_on_error: true,
            debug: false,
        }
    }
}

/// Environment variable with a fallback.
pub fn env_get(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

pub fn load_config() -> anyhow::Result<ClientConfig> {
    let private_key = env_get("PARITYVEND_SECRET_KEY", "");

    let base_url = env_get("PARITYVEND_API_URL", DEFAULT_API_URL);

    let user_agent = std::env::var("PARITYVEND_USER_AGENT").ok();

    let cache_max_size = std::env::var("PARITYVEND_CACHE_MAXSIZE")
        .unwrap_or_else(|_| DEFAULT_CACHE_MAXSIZE.to_string())
        .parse()
        .unwrap_or(DEFAULT_CACHE_MAXSIZE);

    let cache_ttl_secs = std::env::var("PARITYVEND_CACHE_TTL_SECS")
        .unwrap_or_else(|_| DEFAULT_CACHE_TTL.as_secs().to_string())
        .parse()
        .unwrap_or(DEFAULT_CACHE_TTL.as_secs());

    let timeout_ms = std::env::var("PARITYVEND_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok());

    // Error policy
    let cache_on_error = env_flag("PARITYVEND_CACHE_ON_ERROR", true);
    let log_api_errors = env_flag("PARITYVEND_LOG_API_ERRORS", true);
    let raise_exc_on_error = env_flag("PARITYVEND_RAISE_EXC_ON_ERROR", true);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(ClientConfig {
        private_key,
        base_url,
        user_agent,
        cache_max_size,
        cache_ttl_secs,
        timeout_ms,
        cache_on_error,
        log_api_errors,
        raise_exc_on_error,
        debug,
    })
}
