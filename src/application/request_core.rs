//! Request Core - shared call pipeline
//!
//! Everything both clients do apart from moving bytes: building endpoint
//! URLs, cache lookup, classifying HTTP outcomes, the caching policy and
//! turning payloads into typed results. Each client only supplies the
//! transport call and its session lifecycle.

use crate::adapters::outbound::{SerdeJsonDecoder, TtlCache};
use crate::domain::entities::{Country, Discounts};
use crate::domain::errors::{ParityVendError, Result};
use crate::domain::ports::{HttpRequest, HttpResponse, JsonDecoder, ResponseCache, TransportError};
use crate::domain::response::Response;
use crate::domain::value_objects::{CacheKey, CallOptions, Payload};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Production API host.
pub const DEFAULT_API_URL: &str = "https://api.parityvend.com";

/// Error kinds whose payloads may be cached when `cache_on_error` is set.
pub const RECOVERABLE_ERRORS: &[&str] = &["not_identified", "incorrect_request"];

const OVER_QUOTA: &str = "over_quota";

/// User-Agent sent with every request unless overridden.
pub fn default_user_agent() -> String {
    format!("Rust ParityVend API Client/{}", env!("CARGO_PKG_VERSION"))
}

/// API endpoints served under `/backend/<name>/<private_key>/<args...>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CountryFromIp,
    DiscountFromIp,
    BannerFromIp,
    DiscountWithHtmlFromIp,
    QuotaInfo,
    DiscountsInfo,
    ExchangeRateInfo,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Self::CountryFromIp => "get-country-from-ip",
            Self::DiscountFromIp => "get-discount-from-ip",
            Self::BannerFromIp => "get-banner-from-ip",
            Self::DiscountWithHtmlFromIp => "get-discount-with-html-from-ip",
            Self::QuotaInfo => "get-quota-info",
            Self::DiscountsInfo => "get-discounts-info",
            Self::ExchangeRateInfo => "get-exchange-rate-info",
        }
    }

    /// Quota changes on every call, so it skips the cache unless asked.
    pub fn caches_by_default(self) -> bool {
        !matches!(self, Self::QuotaInfo)
    }

    pub fn path(self, private_key: &str, args: &[String]) -> String {
        let mut path = format!("/backend/{}/{}/", self.name(), private_key);
        for arg in args {
            path.push_str(arg);
            path.push('/');
        }
        path
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How API-level error payloads are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Cache recoverable error payloads so they are not re-requested.
    pub cache_on_error: bool,
    /// Log error payloads at `error` level.
    pub log_api_errors: bool,
    /// Surface error payloads as `ParityVendError::Processing`.
    pub raise_exc_on_error: bool,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self {
            cache_on_error: true,
            log_api_errors: true,
            raise_exc_on_error: true,
        }
    }
}

/// A call ready to be looked up in the cache or sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub endpoint: Endpoint,
    pub key: CacheKey,
    pub use_cache: bool,
    pub request: HttpRequest,
}

/// Result of the banner endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    /// Rendered banner markup.
    Html(String),
    /// Structured payload, returned when no banner is configured.
    Response(Response),
}

impl Banner {
    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Html(html) => Some(html),
            Self::Response(_) => None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Html(_) => None,
            Self::Response(response) => Some(response),
        }
    }
}

/// Shared state and logic of both clients.
pub struct RequestCore {
    private_key: String,
    base_url: String,
    headers: Vec<(String, String)>,
    default_timeout: Option<Duration>,
    cache: Arc<dyn ResponseCache>,
    decoder: Arc<dyn JsonDecoder>,
    policy: ErrorPolicy,
}

impl RequestCore {
    /// Core with the default cache, decoder, headers and policy.
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            headers: vec![("User-Agent".to_string(), default_user_agent())],
            default_timeout: None,
            cache: Arc::new(TtlCache::default()),
            decoder: Arc::new(SerdeJsonDecoder),
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a header, replacing any existing one with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn JsonDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// First six characters of the key followed by `...`.
    pub fn redacted_key(&self) -> String {
        let prefix: String = self.private_key.chars().take(6).collect();
        format!("{}...", prefix)
    }

    fn redact(&self, url: &str) -> String {
        if self.private_key.is_empty() {
            return url.to_string();
        }
        url.replace(&self.private_key, &self.redacted_key())
    }

    pub fn prepare(&self, endpoint: Endpoint, args: Vec<String>, options: CallOptions) -> PreparedCall {
        let url = format!("{}{}", self.base_url, endpoint.path(&self.private_key, &args));
        PreparedCall {
            endpoint,
            use_cache: options.cache.unwrap_or(endpoint.caches_by_default()),
            key: CacheKey::new(endpoint.name(), args),
            request: HttpRequest {
                method: "GET",
                url,
                headers: self.headers.clone(),
                timeout: options.timeout.or(self.default_timeout),
            },
        }
    }

    /// Cached payload for the call, if caching is on and the key is live.
    pub fn lookup(&self, call: &PreparedCall) -> Option<Payload> {
        if !call.use_cache {
            return None;
        }

        let hit = self.cache.get(&call.key);
        if hit.is_some() {
            tracing::debug!("cache hit for {}", call.key);
        } else {
            tracing::debug!("cache miss for {}", call.key);
        }
        hit
    }

    /// Classify a transport outcome into a payload.
    ///
    /// Transport failures become `Connection`, non-200 statuses and
    /// undecodable JSON become `Api`. Non-JSON bodies are returned verbatim.
    pub fn interpret(
        &self,
        request: &HttpRequest,
        outcome: std::result::Result<HttpResponse, TransportError>,
    ) -> Result<Payload> {
        let response = outcome.map_err(|e| {
            tracing::debug!("request to {} failed: {}", self.redact(&request.url), e);
            ParityVendError::Connection(e.to_string())
        })?;

        if response.status != 200 {
            tracing::error!(
                "ParityVend API ({} {}) returned non-200 status code {}: {}",
                request.method,
                self.redact(&request.url),
                response.status,
                response.body
            );
            return Err(ParityVendError::Api(format!(
                "non-200 status code {}",
                response.status
            )));
        }

        if !response.is_json() {
            return Ok(Payload::Text(response.body));
        }

        let invalid = |reason: String| {
            tracing::error!(
                "ParityVend API ({} {}) returned invalid JSON payload: {}",
                request.method,
                self.redact(&request.url),
                response.body
            );
            ParityVendError::Api(format!("invalid JSON payload: {}", reason))
        };

        match self.decoder.decode(&response.body) {
            Ok(Value::Object(map)) => Ok(Payload::Json(map)),
            Ok(other) => Err(invalid(format!("expected an object, got {}", other))),
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Apply the caching policy to a fresh payload and surface it.
    pub fn settle(&self, call: &PreparedCall, payload: Payload) -> Result<Payload> {
        if payload.is_empty() {
            return Err(ParityVendError::Api("empty response".to_string()));
        }

        if let Payload::Json(map) = &payload {
            if payload.error_name() == Some(OVER_QUOTA) {
                tracing::warn!("ParityVend account is over quota ({})", call.endpoint);
                return Err(ParityVendError::QuotaExceeded);
            }

            if payload.is_error() {
                if self.policy.log_api_errors {
                    let body = Value::Object(map.clone());
                    tracing::error!("ParityVend API ({}) returned error: {}", call.endpoint, body);
                }

                let recoverable = payload
                    .error_name()
                    .is_some_and(|name| RECOVERABLE_ERRORS.contains(&name));
                if self.policy.cache_on_error && recoverable {
                    self.store(call, payload.clone());
                }
                return self.surface(payload);
            }
        }

        self.store(call, payload.clone());
        Ok(payload)
    }

    /// Apply the raise-on-error policy to a payload, fresh or cached.
    pub fn surface(&self, payload: Payload) -> Result<Payload> {
        match payload {
            Payload::Json(map) if self.policy.raise_exc_on_error && is_error(&map) => {
                Err(ParityVendError::processing(Response::from_map(map)))
            }
            other => Ok(other),
        }
    }

    fn store(&self, call: &PreparedCall, payload: Payload) {
        tracing::debug!("caching response for {}", call.key);
        self.cache.set(call.key.clone(), payload);
    }
}

impl fmt::Debug for RequestCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestCore")
            .field("private_key", &self.redacted_key())
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .finish()
    }
}

fn is_error(map: &Map<String, Value>) -> bool {
    map.get("status").and_then(Value::as_str) == Some("error")
}

fn json(payload: Payload) -> Result<Map<String, Value>> {
    match payload {
        Payload::Json(map) => Ok(map),
        Payload::Text(_) => Err(ParityVendError::Api(
            "expected a JSON response, got text".to_string(),
        )),
    }
}

/// Country lookup result.
pub fn into_country(payload: Payload) -> Result<Country> {
    let map = json(payload)?;
    if is_error(&map) {
        return Err(ParityVendError::processing(Response::from_map(map)));
    }

    match map.get("country") {
        Some(Value::String(code)) => Country::new(code),
        Some(Value::Object(country)) => match country.get("code").and_then(Value::as_str) {
            Some(code) => Country::new(code),
            None => Err(ParityVendError::MissingField("country.code".to_string())),
        },
        _ => Err(ParityVendError::MissingField("country".to_string())),
    }
}

/// Discount payload with its `country` object swapped for a registry Country.
pub fn into_discount_response(payload: Payload) -> Result<Response> {
    let map = json(payload)?;
    let country = match map.get("country") {
        Some(Value::Object(country)) => country
            .get("code")
            .and_then(Value::as_str)
            .map(Country::new)
            .transpose()?,
        Some(Value::String(code)) if !code.is_empty() => Some(Country::new(code)?),
        _ => None,
    };

    let mut response = Response::from_map(map);
    if let Some(country) = country {
        response.insert("country", country);
    }
    Ok(response)
}

/// Banner markup, or the structured payload when there is none.
pub fn into_banner(payload: Payload) -> Result<Banner> {
    match payload {
        Payload::Text(html) => Ok(Banner::Html(html)),
        Payload::Json(map) => Ok(Banner::Response(Response::from_map(map))),
    }
}

/// Discounts table payload with `discounts` built into a typed container.
pub fn into_discounts_response(payload: Payload) -> Result<Response> {
    let map = json(payload)?;
    let discounts = match map.get("discounts") {
        Some(Value::Object(raw)) => Some(Discounts::from_raw(raw)?),
        _ => None,
    };

    let mut response = Response::from_map(map);
    if let Some(discounts) = discounts {
        response.insert("discounts", discounts);
    }
    Ok(response)
}

pub fn into_response(payload: Payload) -> Result<Response> {
    json(payload).map(Response::from_map)
}
