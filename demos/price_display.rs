//! Price display example.
//!
//! Renders a small booking cart in the viewer's currency using a custom
//! configuration.

use booking_fx::config::FxConfig;
use booking_fx::core::currency::CurrencyCode;
use booking_fx::display::price::PriceDisplay;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("╔══════════════════════════════════════════╗");
    println!("║    booking-fx: Price Display Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let config = FxConfig::from_json_str(
        r#"{
            "spread": "0.015",
            "matching": "case_insensitive"
        }"#,
    )?;
    let prices = PriceDisplay::new(config.build_converter()?, config.build_formatter());

    let cart = [
        ("Hotel, 3 nights", dec!(567.00), "EUR"),
        ("Flight LIS-NRT", dec!(1249.90), "USD"),
        ("Stadium ticket", dec!(8800), "JPY"),
        ("Museum pass", dec!(45), "GBP"),
    ];

    for viewer in ["USD", "JPY", "eur"] {
        let viewer = CurrencyCode::new(viewer);
        println!("━━━ Viewing in {} ━━━\n", viewer.normalized());
        for (item, amount, currency) in &cart {
            let shown = prices.display_price(*amount, &CurrencyCode::new(*currency), &viewer);
            println!("  {:<18} {:>16}", item, shown);
        }
        println!();
    }
    Ok(())
}
