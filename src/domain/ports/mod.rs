mod json_decoder;
mod response_cache;
mod transport;

pub use json_decoder::JsonDecoder;
pub use response_cache::ResponseCache;
pub use transport::{
    AsyncTransport, BlockingTransport, HttpRequest, HttpResponse, SessionConnector,
    TransportError,
};
