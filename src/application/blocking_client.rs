//! Blocking ParityVend client
//!
//! Performs every call on the calling thread through a pooled transport
//! owned for the client's lifetime.

use super::builder::ClientBuilder;
use super::request_core::{
    into_banner, into_country, into_discount_response, into_discounts_response, into_response,
    Banner, Endpoint, RequestCore,
};
use crate::config::ClientConfig;
use crate::domain::entities::Country;
use crate::domain::errors::Result;
use crate::domain::ports::{BlockingTransport, ResponseCache};
use crate::domain::response::Response;
use crate::domain::value_objects::{
    auto_convert_ip, normalize_currency, CallOptions, IpInput, Payload, TextInput,
};
use std::fmt;
use std::sync::Arc;

/// Blocking client for the ParityVend API.
///
/// Safe to share between threads: the default cache and the reqwest
/// transport are both synchronized. A custom cache must be as well.
pub struct ParityVendClient {
    core: RequestCore,
    transport: Arc<dyn BlockingTransport>,
}

impl ParityVendClient {
    /// Client with default options. Must be called outside of an async runtime.
    pub fn new(private_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(private_key).build()
    }

    pub fn builder(private_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(private_key)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(core: RequestCore, transport: Arc<dyn BlockingTransport>) -> Self {
        Self { core, transport }
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        self.core.cache()
    }

    fn call(&self, endpoint: Endpoint, args: Vec<String>, options: CallOptions) -> Result<Payload> {
        let call = self.core.prepare(endpoint, args, options);
        if let Some(cached) = self.core.lookup(&call) {
            return self.core.surface(cached);
        }

        let outcome = self.transport.send(&call.request);
        let payload = self.core.interpret(&call.request, outcome)?;
        self.core.settle(&call, payload)
    }

    /// Country of an IP address.
    pub fn get_country_from_ip(&self, ip: impl Into<IpInput>, options: CallOptions) -> Result<Country> {
        let args = vec![auto_convert_ip(ip)?];
        into_country(self.call(Endpoint::CountryFromIp, args, options)?)
    }

    /// Discount, coupon and local currency for an IP address.
    pub fn get_discount_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_discount_response(self.call(Endpoint::DiscountFromIp, args, options)?)
    }

    /// Rendered banner HTML for an IP address.
    pub fn get_banner_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Banner> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_banner(self.call(Endpoint::BannerFromIp, args, options)?)
    }

    /// Discount payload with the banner embedded under `html`.
    pub fn get_discount_with_html_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_discount_response(self.call(Endpoint::DiscountWithHtmlFromIp, args, options)?)
    }

    /// Account quota usage. Not cached unless `options.cache` is set.
    pub fn get_quota_info(&self, options: CallOptions) -> Result<Response> {
        into_response(self.call(Endpoint::QuotaInfo, Vec::new(), options)?)
    }

    /// All discounts configured for the project.
    pub fn get_discounts_info(&self, options: CallOptions) -> Result<Response> {
        into_discounts_response(self.call(Endpoint::DiscountsInfo, Vec::new(), options)?)
    }

    /// Exchange rates against a base currency.
    pub fn get_exchange_rate_info(
        &self,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![normalize_currency(base_currency)?];
        into_response(self.call(Endpoint::ExchangeRateInfo, args, options)?)
    }
}

impl fmt::Debug for ParityVendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParityVendAPI('{}')", self.core.redacted_key())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::errors::ParityVendError;
    use crate::domain::ports::{HttpRequest, HttpResponse, TransportError};
    use crate::domain::value_objects::DEFAULT_BASE_CURRENCY;
    use parking_lot::Mutex;
    use std::net::Ipv6Addr;

    /// Replays one canned response and records every request.
    struct ScriptedTransport {
        response: std::result::Result<HttpResponse, fn() -> TransportError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn json(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse {
                    status: 200,
                    content_type: Some("application/json".into()),
                    body: body.into(),
                }),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(|| TransportError::Timeout),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().len()
        }

        fn last_url(&self) -> String {
            self.requests
                .lock()
                .last()
                .map(|r| r.url.clone())
                .unwrap_or_default()
        }
    }

    impl BlockingTransport for ScriptedTransport {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().push(request.clone());
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> ParityVendClient {
        ClientBuilder::new("abcdef123456")
            .base_url("http://api.test")
            .transport(transport)
            .build()
            .unwrap()
    }

    // ===== Endpoint Tests =====

    #[test]
    fn test_get_country_from_ip() {
        let transport = ScriptedTransport::json(r#"{"status": "ok", "country": "VE"}"#);
        let client = client(transport.clone());

        let country = client
            .get_country_from_ip("190.206.117.0", CallOptions::default())
            .unwrap();

        assert_eq!(country.code(), "VE");
        assert_eq!(country.name(), "Venezuela");
        assert_eq!(country.currency_code(), "VES");
        assert_eq!(
            transport.last_url(),
            "http://api.test/backend/get-country-from-ip/abcdef123456/190.206.117.0/"
        );
    }

    #[test]
    fn test_ipv6_is_sent_exploded() {
        let transport = ScriptedTransport::json(r#"{"status": "ok", "country": "ZA"}"#);
        let client = client(transport.clone());
        let ip: Ipv6Addr = "2c0f:f758::".parse().unwrap();

        client.get_country_from_ip(ip, CallOptions::default()).unwrap();
        assert!(transport
            .last_url()
            .ends_with("/2c0f:f758:0000:0000:0000:0000:0000:0000/"));
    }

    #[test]
    fn test_get_discount_from_ip_uppercases_currency() {
        let transport = ScriptedTransport::json(
            r#"{"status": "ok", "discount": 0.4, "discount_str": "40.00%",
                "country": {"code": "VE"}, "currency": {"code": "VES", "conversion_rate": 36.09}}"#,
        );
        let client = client(transport.clone());

        let response = client
            .get_discount_from_ip(b"190.206.117.0", "gbp", CallOptions::default())
            .unwrap();

        assert!(transport.last_url().ends_with("/190.206.117.0/GBP/"));
        assert_eq!(response["discount_str"].as_str(), Some("40.00%"));
        assert_eq!(response["country"].as_country().map(Country::code), Some("VE"));
        assert_eq!(
            response.attr("currency").unwrap().attr("code").unwrap().as_str(),
            Some("VES")
        );
    }

    #[test]
    fn test_get_exchange_rate_info() {
        let transport = ScriptedTransport::json(r#"{"status": "ok", "rates": {"EUR": 0.92}}"#);
        let client = client(transport.clone());

        let response = client
            .get_exchange_rate_info(DEFAULT_BASE_CURRENCY, CallOptions::default())
            .unwrap();
        assert!(transport
            .last_url()
            .ends_with("/backend/get-exchange-rate-info/abcdef123456/USD/"));
        assert_eq!(
            response.attr("rates").unwrap().attr("EUR").unwrap().as_f64(),
            Some(0.92)
        );
    }

    // ===== Caching Tests =====

    #[test]
    fn test_cached_calls_hit_transport_once() {
        let transport = ScriptedTransport::json(r#"{"status": "ok", "country": "US"}"#);
        let client = client(transport.clone());

        for _ in 0..3 {
            client.get_country_from_ip("8.8.8.8", CallOptions::default()).unwrap();
        }
        assert_eq!(transport.calls(), 1);

        client.get_country_from_ip("8.8.8.8", CallOptions::no_cache()).unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_quota_not_cached_by_default() {
        let transport = ScriptedTransport::json(r#"{"status": "ok", "quota_left": 10}"#);
        let client = client(transport.clone());

        client.get_quota_info(CallOptions::default()).unwrap();
        client.get_quota_info(CallOptions::default()).unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_cached_recoverable_error_raised_again() {
        let transport =
            ScriptedTransport::json(r#"{"status": "error", "error_name": "not_identified"}"#);
        let client = client(transport.clone());

        for _ in 0..2 {
            let err = client
                .get_discount_from_ip("10.0.0.1", "USD", CallOptions::default())
                .unwrap_err();
            assert_eq!(err.error_name(), Some("not_identified"));
        }
        assert_eq!(transport.calls(), 1);
    }

    // ===== Error Tests =====

    #[test]
    fn test_transport_failure_is_connection_error() {
        let client = client(ScriptedTransport::failing());
        let err = client.get_quota_info(CallOptions::default()).unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_over_quota() {
        let transport = ScriptedTransport::json(r#"{"status": "error", "error_name": "over_quota"}"#);
        let client = client(transport.clone());

        let err = client.get_discounts_info(CallOptions::default()).unwrap_err();
        assert!(err.is_quota_exceeded());
        client.get_discounts_info(CallOptions::default()).unwrap_err();
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_invalid_utf8_fails_before_network() {
        let transport = ScriptedTransport::json(r#"{"status": "ok"}"#);
        let client = client(transport.clone());

        let err = client
            .get_country_from_ip(vec![0xff, 0xfe], CallOptions::default())
            .unwrap_err();
        assert!(matches!(err, ParityVendError::Validation(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_error_payload_returned_when_raise_disabled() {
        let transport =
            ScriptedTransport::json(r#"{"status": "error", "error_name": "incorrect_request"}"#);
        let client = ClientBuilder::new("key")
            .transport(transport)
            .raise_exc_on_error(false)
            .build()
            .unwrap();

        let response = client
            .get_discount_from_ip("bad-ip", "USD", CallOptions::default())
            .unwrap();
        assert_eq!(response.error_name(), Some("incorrect_request"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = client(ScriptedTransport::json("{}"));
        assert_eq!(format!("{:?}", client), "ParityVendAPI('abcdef...')");
    }
}
