//! Prints the account quota (async client).
//!
//! PARITYVEND_SECRET_KEY=... cargo run --example hello_world_async

use parityvend_api::{load_config, AsyncParityVendClient, CallOptions};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;

    let log_level = if cfg.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let parityvend = AsyncParityVendClient::from_config(&cfg);
    println!("{}", parityvend.get_quota_info(CallOptions::default()).await?);

    // Release pooled connections when done.
    parityvend.deinit();

    Ok(())
}
