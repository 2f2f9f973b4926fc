//! Value Objects - Immutable domain primitives
//!
//! Argument normalization, cache keys and the raw payload shape shared by
//! the cache and the request core.

use crate::domain::errors::{ParityVendError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Base currency used when the caller does not pick one.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// An IP address as accepted by the lookup endpoints.
///
/// Text is passed through unchanged, bytes are decoded as UTF-8 and
/// structured addresses are rendered in their fully expanded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpInput {
    Text(String),
    Bytes(Vec<u8>),
    Addr(IpAddr),
}

impl IpInput {
    /// Canonical string form sent to the API.
    pub fn normalize(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Bytes(bytes) => decode_utf8(bytes, "ip"),
            Self::Addr(addr) => Ok(exploded(addr)),
        }
    }
}

impl From<&str> for IpInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for IpInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for IpInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<&[u8]> for IpInput {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for IpInput {
    fn from(value: &[u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for IpInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<IpAddr> for IpInput {
    fn from(value: IpAddr) -> Self {
        Self::Addr(value)
    }
}

impl From<Ipv4Addr> for IpInput {
    fn from(value: Ipv4Addr) -> Self {
        Self::Addr(IpAddr::V4(value))
    }
}

impl From<Ipv6Addr> for IpInput {
    fn from(value: Ipv6Addr) -> Self {
        Self::Addr(IpAddr::V6(value))
    }
}

/// A text argument (currency code) given as a string or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Text(String),
    Bytes(Vec<u8>),
}

impl TextInput {
    pub fn normalize(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Bytes(bytes) => decode_utf8(bytes, "text"),
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TextInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for TextInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<&[u8]> for TextInput {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for TextInput {
    fn from(value: &[u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for TextInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// Normalize an IP argument to the string sent to the API.
pub fn auto_convert_ip(ip: impl Into<IpInput>) -> Result<String> {
    ip.into().normalize()
}

/// Normalize a text argument to a string.
pub fn auto_convert_to_str(text: impl Into<TextInput>) -> Result<String> {
    text.into().normalize()
}

/// Normalize a currency code: decoded and uppercased.
pub fn normalize_currency(currency: impl Into<TextInput>) -> Result<String> {
    Ok(auto_convert_to_str(currency)?.to_uppercase())
}

fn decode_utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ParityVendError::Validation(format!("{} is not valid UTF-8: {}", what, e)))
}

/// IPv4 dotted quad, or all eight IPv6 groups zero-padded with no `::`.
fn exploded(addr: &IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => v6
            .segments()
            .iter()
            .map(|segment| format!("{:04x}", segment))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

/// Key identifying one cached API response: endpoint name plus the
/// normalized arguments of the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub endpoint: &'static str,
    pub args: Vec<String>,
}

impl CacheKey {
    pub fn new(endpoint: &'static str, args: Vec<String>) -> Self {
        Self { endpoint, args }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.endpoint)?;
        for arg in &self.args {
            write!(f, ", {}", arg)?;
        }
        write!(f, ")")
    }
}

/// Raw API result as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Decoded `application/json` body.
    Json(Map<String, Value>),
    /// Any other body (banner HTML), kept verbatim.
    Text(String),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Json(map) => map.is_empty(),
            Self::Text(text) => text.is_empty(),
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.json_str("status")
    }

    pub fn error_name(&self) -> Option<&str> {
        self.json_str("error_name")
    }

    pub fn is_error(&self) -> bool {
        self.status() == Some("error")
    }

    fn json_str(&self, key: &str) -> Option<&str> {
        match self {
            Self::Json(map) => map.get(key).and_then(Value::as_str),
            Self::Text(_) => None,
        }
    }
}

/// Per-call knobs shared by every endpoint.
///
/// `cache: None` picks the endpoint default (on for lookups, off for quota).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub cache: Option<bool>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn no_cache() -> Self {
        Self::default().cache(false)
    }
}
