//! Basic conversion example.
//!
//! Converts a hotel rate into several currencies and shows what happens
//! when a code has no rate.

use booking_fx::conversion::converter::{Conversion, Converter};
use booking_fx::core::currency::{CodeMatching, CurrencyCode};
use rust_decimal_macros::dec;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════╗");
    println!("║    booking-fx: Basic Conversion Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let converter = Converter::default();
    let usd = CurrencyCode::new("USD");
    let nightly_rate = dec!(189.00);

    println!("━━━ Hotel nightly rate: {} {} ━━━\n", nightly_rate, usd);
    for target in ["EUR", "GBP", "JPY", "INR", "BRL", "XYZ"] {
        let target = CurrencyCode::new(target);
        match converter.try_convert(nightly_rate, &usd, &target) {
            Conversion::Converted { amount, rate } => {
                println!("  {:<4} {:>12}   (cross-rate {})", target, amount, rate)
            }
            Conversion::SameCurrency { amount } => println!("  {:<4} {:>12}   (same)", target, amount),
            Conversion::PassedThrough { amount, reason } => {
                println!("  {:<4} {:>12}   (unconverted: {})", target, amount, reason)
            }
        }
    }
    println!();

    println!("━━━ Code matching ━━━\n");
    let mixed = CurrencyCode::new("Usd");
    let literal = converter.convert(dec!(100), &mixed, &usd);
    let folded = Converter::default()
        .with_matching(CodeMatching::CaseInsensitive)
        .convert(dec!(100), &mixed, &usd);
    println!("  100 Usd -> USD (literal):          {}", literal);
    println!("  100 Usd -> USD (case_insensitive): {}", folded);
}
