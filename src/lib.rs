//! ParityVend API client
//!
//! Blocking and async clients for the ParityVend geolocation and regional
//! pricing API, with a pluggable response cache, JSON decoder and HTTP
//! transport.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{DashMapCache, SerdeJsonDecoder, TtlCache};
pub use application::{AsyncParityVendClient, Banner, ClientBuilder, ErrorPolicy, ParityVendClient};
pub use config::{env_get, load_config, ClientConfig};
pub use domain::countries::countries;
pub use domain::entities::{get_country_by_code, Country, Discount, Discounts, RawDiscount};
pub use domain::errors::{ParityVendError, Result};
pub use domain::ports::{AsyncTransport, BlockingTransport, JsonDecoder, ResponseCache, SessionConnector};
pub use domain::response::{Field, Response};
pub use domain::value_objects::{CacheKey, CallOptions, IpInput, Payload, TextInput, DEFAULT_BASE_CURRENCY};
