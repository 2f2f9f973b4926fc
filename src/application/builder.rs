//! Client Builder
//!
//! Collects credentials, cache/decoder/transport injections and policy
//! flags, then builds either client around one RequestCore.

use super::async_client::AsyncParityVendClient;
use super::blocking_client::ParityVendClient;
use super::request_core::{ErrorPolicy, RequestCore, DEFAULT_API_URL};
use crate::adapters::outbound::{
    BlockingReqwestTransport, ReqwestConnector, SerdeJsonDecoder, TtlCache, DEFAULT_CACHE_MAXSIZE,
    DEFAULT_CACHE_TTL,
};
use crate::config::ClientConfig;
use crate::domain::errors::{ParityVendError, Result};
use crate::domain::ports::{BlockingTransport, JsonDecoder, ResponseCache, SessionConnector};
use std::sync::Arc;
use std::time::Duration;

pub struct ClientBuilder {
    private_key: String,
    base_url: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    cache: Option<Arc<dyn ResponseCache>>,
    cache_max_size: usize,
    cache_ttl: Duration,
    decoder: Arc<dyn JsonDecoder>,
    policy: ErrorPolicy,
    transport: Option<Arc<dyn BlockingTransport>>,
    connector: Option<Arc<dyn SessionConnector>>,
}

impl ClientBuilder {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            headers: Vec::new(),
            timeout: None,
            cache: None,
            cache_max_size: DEFAULT_CACHE_MAXSIZE,
            cache_ttl: DEFAULT_CACHE_TTL,
            decoder: Arc::new(SerdeJsonDecoder),
            policy: ErrorPolicy::default(),
            transport: None,
            connector: None,
        }
    }

    /// Builder seeded from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::new(config.private_key.clone())
            .base_url(config.base_url.clone())
            .cache_options(config.cache_max_size, config.cache_ttl())
            .cache_on_error(config.cache_on_error)
            .log_api_errors(config.log_api_errors)
            .raise_exc_on_error(config.raise_exc_on_error);
        builder.timeout = config.timeout();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.header("User-Agent", user_agent.clone());
        }
        builder
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add or override a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Default timeout for calls that do not set their own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-supplied cache instead of the default TtlCache.
    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Size and lifetime of the default cache. Ignored with a custom cache.
    pub fn cache_options(mut self, max_size: usize, ttl: Duration) -> Self {
        self.cache_max_size = max_size;
        self.cache_ttl = ttl;
        self
    }

    pub fn json_decoder(mut self, decoder: impl JsonDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn cache_on_error(mut self, enabled: bool) -> Self {
        self.policy.cache_on_error = enabled;
        self
    }

    pub fn log_api_errors(mut self, enabled: bool) -> Self {
        self.policy.log_api_errors = enabled;
        self
    }

    pub fn raise_exc_on_error(mut self, enabled: bool) -> Self {
        self.policy.raise_exc_on_error = enabled;
        self
    }

    /// Transport for the blocking client.
    pub fn transport(mut self, transport: Arc<dyn BlockingTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Session connector for the async client.
    pub fn connector(mut self, connector: Arc<dyn SessionConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    fn core(&self) -> RequestCore {
        let cache: Arc<dyn ResponseCache> = match &self.cache {
            Some(cache) => cache.clone(),
            None => Arc::new(TtlCache::new(self.cache_max_size, self.cache_ttl)),
        };

        let mut core = RequestCore::new(self.private_key.clone())
            .with_base_url(self.base_url.clone())
            .with_default_timeout(self.timeout)
            .with_cache(cache)
            .with_decoder(self.decoder.clone())
            .with_policy(self.policy);
        for (name, value) in &self.headers {
            core = core.with_header(name.clone(), value.clone());
        }
        core
    }

    /// Build the blocking client.
    ///
    /// Without an injected transport this opens a pooled reqwest client,
    /// which must happen outside of an async runtime.
    pub fn build(self) -> Result<ParityVendClient> {
        let core = self.core();
        let transport: Arc<dyn BlockingTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                BlockingReqwestTransport::build()
                    .map_err(|e| ParityVendError::Connection(e.to_string()))?,
            ),
        };
        Ok(ParityVendClient::from_parts(core, transport))
    }

    /// Build the async client. No session is opened until first use.
    pub fn build_async(self) -> AsyncParityVendClient {
        let core = self.core();
        let connector: Arc<dyn SessionConnector> = match self.connector {
            Some(connector) => connector,
            None => Arc::new(ReqwestConnector),
        };
        AsyncParityVendClient::from_parts(core, connector)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_core_defaults() {
        let core = ClientBuilder::new("key").core();
        assert_eq!(core.base_url(), "https://api.parityvend.com");
        assert_eq!(core.policy(), ErrorPolicy::default());
        assert_eq!(core.headers().len(), 1);
    }

    #[test]
    fn test_header_override() {
        let core = ClientBuilder::new("key")
            .header("User-Agent", "custom")
            .header("X-Extra", "1")
            .core();

        assert_eq!(core.headers().len(), 2);
        assert!(core
            .headers()
            .iter()
            .any(|(name, value)| name == "User-Agent" && value == "custom"));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            private_key: "secret".into(),
            base_url: "http://localhost:9000/".into(),
            user_agent: Some("agent/2".into()),
            raise_exc_on_error: false,
            timeout_ms: Some(250),
            ..ClientConfig::default()
        };

        let core = ClientBuilder::from_config(&config).core();
        assert_eq!(core.private_key(), "secret");
        assert_eq!(core.base_url(), "http://localhost:9000");
        assert!(!core.policy().raise_exc_on_error);
        assert_eq!(core.headers()[0].1, "agent/2");

        let call = core.prepare(
            super::super::request_core::Endpoint::QuotaInfo,
            vec![],
            Default::default(),
        );
        assert_eq!(call.request.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_custom_cache_is_shared() {
        let cache: Arc<dyn ResponseCache> = Arc::new(TtlCache::new(8, Duration::from_secs(1)));
        let core = ClientBuilder::new("key").cache(cache.clone()).core();

        let key = crate::domain::value_objects::CacheKey::new("get-quota-info", vec![]);
        cache.set(key.clone(), crate::domain::value_objects::Payload::Text("x".into()));
        assert!(core.cache().contains(&key));
    }
}
