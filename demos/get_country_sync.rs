//! Resolves the country of an IP address (blocking client).

use parityvend_api::{env_get, CallOptions, ParityVendClient};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let parityvend = ParityVendClient::new(env_get("PARITYVEND_SECRET_KEY", ""))?;

    // Venezuelan IP
    let country = parityvend.get_country_from_ip("190.206.117.0", CallOptions::default())?;
    println!("{}", country);
    println!("Code: {}", country.code());
    println!("Name: {}", country.name());
    println!("Currency code: {}", country.currency_code());
    println!("Currency localized: {}", country.currency_localized());
    println!("Currency symbol: {}", country.currency_symbol());

    // Resolves to XX (Unknown) on plans with VPN detection.
    let other = parityvend.get_country_from_ip("8.8.8.8", CallOptions::default())?;
    println!("\"8.8.8.8\" is: {}", other);

    Ok(())
}
