//! Fetches the discount configured for an IP address (async client).

use parityvend_api::{env_get, AsyncParityVendClient, CallOptions, DEFAULT_BASE_CURRENCY};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let parityvend = AsyncParityVendClient::new(env_get("PARITYVEND_SECRET_KEY", ""));
    parityvend.init()?;

    let discount = parityvend
        .get_discount_from_ip("190.206.117.0", DEFAULT_BASE_CURRENCY, CallOptions::default())
        .await?;
    println!("{}", discount);
    println!("Discount: {:?}", discount.attr("discount_str")?.as_str());
    println!("Coupon: {:?}", discount.attr("coupon_code")?.as_str());

    parityvend.deinit();
    Ok(())
}
