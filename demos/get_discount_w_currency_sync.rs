//! Fetches a discount with USD and GBP as base currency (blocking client).

use parityvend_api::{env_get, CallOptions, ParityVendClient, DEFAULT_BASE_CURRENCY};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let parityvend = ParityVendClient::new(env_get("PARITYVEND_SECRET_KEY", ""))?;
    let ip = "190.206.117.0";

    let discount_usd = parityvend.get_discount_from_ip(ip, DEFAULT_BASE_CURRENCY, CallOptions::default())?;
    println!("USD discount: {}", discount_usd);

    let discount_gbp = parityvend.get_discount_from_ip(ip, "GBP", CallOptions::default())?;
    println!("GBP discount: {}", discount_gbp);
    println!();

    for (base, discount) in [("USD", &discount_usd), ("GBP", &discount_gbp)] {
        let currency = discount.attr("currency")?;
        println!(
            "Conversion rate of 1 {} to {}: {}",
            base,
            currency.attr("code")?.as_str().unwrap_or("?"),
            currency.attr("conversion_rate")?.as_f64().unwrap_or_default()
        );
    }

    Ok(())
}
