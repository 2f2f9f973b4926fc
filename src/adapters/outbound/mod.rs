mod dashmap_cache;
mod reqwest_transport;
mod serde_json_decoder;
mod ttl_cache;

pub use dashmap_cache::DashMapCache;
pub use reqwest_transport::{BlockingReqwestTransport, ReqwestConnector, ReqwestTransport};
pub use serde_json_decoder::SerdeJsonDecoder;
pub use ttl_cache::{TtlCache, DEFAULT_CACHE_MAXSIZE, DEFAULT_CACHE_TTL};
