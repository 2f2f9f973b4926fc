//! HTTP Transport Ports
//!
//! Defines the request/response shapes exchanged with the HTTP layer and
//! the blocking and async interfaces the clients send them through.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// One outgoing HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

/// The parts of an HTTP response the request core inspects.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// True when the media type is `application/json`, ignoring parameters
    /// such as `charset`.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
    }
}

/// Failure below the HTTP status level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// HTTP client performing the call on the calling thread.
pub trait BlockingTransport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP client performing the call as an await point.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Opens async sessions (pooled HTTP clients) on demand.
///
/// The async client calls this lazily on first use and again after each
/// explicit teardown.
pub trait SessionConnector: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn AsyncTransport>, TransportError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn response(content_type: Option<&str>) -> HttpResponse {
        HttpResponse {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn test_is_json_matches_media_type() {
        assert!(response(Some("application/json")).is_json());
        assert!(response(Some("application/json; charset=utf-8")).is_json());
        assert!(response(Some("Application/JSON")).is_json());
    }

    #[test]
    fn test_is_json_rejects_other_types() {
        assert!(!response(Some("text/html; charset=utf-8")).is_json());
        assert!(!response(Some("application/jsonp")).is_json());
        assert!(!response(None).is_json());
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Connect("refused".into()).to_string(),
            "connect failed: refused"
        );
    }
}
