mod async_client;
mod blocking_client;
mod builder;
mod request_core;

pub use async_client::AsyncParityVendClient;
pub use blocking_client::ParityVendClient;
pub use builder::ClientBuilder;
pub use request_core::{
    default_user_agent, Banner, Endpoint, ErrorPolicy, PreparedCall, RequestCore,
    DEFAULT_API_URL, RECOVERABLE_ERRORS,
};
