//! Prints the account quota (blocking client).
//!
//! PARITYVEND_SECRET_KEY=... cargo run --example hello_world_sync

use parityvend_api::{load_config, CallOptions, ParityVendClient};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;

    let log_level = if cfg.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let parityvend = ParityVendClient::from_config(&cfg)?;
    println!("{}", parityvend.get_quota_info(CallOptions::default())?);

    Ok(())
}
