//! Reqwest HTTP Transports
//!
//! Async and blocking transports over pooled reqwest clients, plus the
//! connector the async client uses to open sessions lazily.

use crate::domain::ports::{
    AsyncTransport, BlockingTransport, HttpRequest, HttpResponse, SessionConnector,
    TransportError,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::sync::Arc;

fn method(name: &str) -> Result<Method, TransportError> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| TransportError::Other(format!("invalid method {}: {}", name, e)))
}

fn map_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

fn content_type(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Async transport over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(method(request.method)?, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let content_type = content_type(response.headers());
        let body = response.text().await.map_err(map_error)?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Blocking transport over a `reqwest::blocking::Client`.
///
/// Must be created and used outside of an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    pub fn build() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TransportError::Other(format!("client error: {}", e)))?;
        Ok(Self::new(client))
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(method(request.method)?, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(map_error)?;
        let status = response.status().as_u16();
        let content_type = content_type(response.headers());
        let body = response.text().map_err(map_error)?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Opens a fresh pooled `reqwest::Client` per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestConnector;

impl SessionConnector for ReqwestConnector {
    fn connect(&self) -> Result<Arc<dyn AsyncTransport>, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Other(format!("client error: {}", e)))?;
        Ok(Arc::new(ReqwestTransport::new(client)))
    }
}
