//! Async ParityVend client
//!
//! Same pipeline as the blocking client with the HTTP call as the only
//! await point. The session (a pooled HTTP client) is opened lazily or by
//! `init`, and released by `deinit`; a call after `deinit` opens a new one.

use super::builder::ClientBuilder;
use super::request_core::{
    into_banner, into_country, into_discount_response, into_discounts_response, into_response,
    Banner, Endpoint, RequestCore,
};
use crate::config::ClientConfig;
use crate::domain::entities::Country;
use crate::domain::errors::{ParityVendError, Result};
use crate::domain::ports::{AsyncTransport, ResponseCache, SessionConnector};
use crate::domain::response::Response;
use crate::domain::value_objects::{
    auto_convert_ip, normalize_currency, CallOptions, IpInput, Payload, TextInput,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Async client for the ParityVend API.
///
/// Concurrent calls for the same uncached key may each reach the API;
/// the last response written wins in the cache.
pub struct AsyncParityVendClient {
    core: RequestCore,
    connector: Arc<dyn SessionConnector>,
    session: Mutex<Option<Arc<dyn AsyncTransport>>>,
}

impl AsyncParityVendClient {
    pub fn new(private_key: impl Into<String>) -> Self {
        ClientBuilder::new(private_key).build_async()
    }

    pub fn builder(private_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(private_key)
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        ClientBuilder::from_config(config).build_async()
    }

    pub(crate) fn from_parts(core: RequestCore, connector: Arc<dyn SessionConnector>) -> Self {
        Self {
            core,
            connector,
            session: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        self.core.cache()
    }

    /// Open the session now instead of on first call.
    pub fn init(&self) -> Result<()> {
        self.session().map(|_| ())
    }

    /// Release the session. Returns false if none was open.
    pub fn deinit(&self) -> bool {
        let closed = self.session.lock().take().is_some();
        if closed {
            tracing::debug!("closed ParityVend session");
        }
        closed
    }

    pub fn is_initialized(&self) -> bool {
        self.session.lock().is_some()
    }

    fn session(&self) -> Result<Arc<dyn AsyncTransport>> {
        let mut slot = self.session.lock();
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = self
            .connector
            .connect()
            .map_err(|e| ParityVendError::Connection(e.to_string()))?;
        tracing::debug!("opened ParityVend session");
        *slot = Some(session.clone());
        Ok(session)
    }

    async fn call(&self, endpoint: Endpoint, args: Vec<String>, options: CallOptions) -> Result<Payload> {
        let call = self.core.prepare(endpoint, args, options);
        if let Some(cached) = self.core.lookup(&call) {
            return self.core.surface(cached);
        }

        let session = self.session()?;
        let outcome = session.send(&call.request).await;
        let payload = self.core.interpret(&call.request, outcome)?;
        self.core.settle(&call, payload)
    }

    pub async fn get_country_from_ip(
        &self,
        ip: impl Into<IpInput>,
        options: CallOptions,
    ) -> Result<Country> {
        let args = vec![auto_convert_ip(ip)?];
        into_country(self.call(Endpoint::CountryFromIp, args, options).await?)
    }

    pub async fn get_discount_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_discount_response(self.call(Endpoint::DiscountFromIp, args, options).await?)
    }

    pub async fn get_banner_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Banner> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_banner(self.call(Endpoint::BannerFromIp, args, options).await?)
    }

    pub async fn get_discount_with_html_from_ip(
        &self,
        ip: impl Into<IpInput>,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![auto_convert_ip(ip)?, normalize_currency(base_currency)?];
        into_discount_response(
            self.call(Endpoint::DiscountWithHtmlFromIp, args, options)
                .await?,
        )
    }

    pub async fn get_quota_info(&self, options: CallOptions) -> Result<Response> {
        into_response(self.call(Endpoint::QuotaInfo, Vec::new(), options).await?)
    }

    pub async fn get_discounts_info(&self, options: CallOptions) -> Result<Response> {
        into_discounts_response(self.call(Endpoint::DiscountsInfo, Vec::new(), options).await?)
    }

    pub async fn get_exchange_rate_info(
        &self,
        base_currency: impl Into<TextInput>,
        options: CallOptions,
    ) -> Result<Response> {
        let args = vec![normalize_currency(base_currency)?];
        into_response(self.call(Endpoint::ExchangeRateInfo, args, options).await?)
    }
}

impl fmt::Debug for AsyncParityVendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsyncParityVendAPI('{}')", self.core.redacted_key())
    }
}
