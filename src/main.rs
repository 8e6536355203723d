//! booking-fx CLI
//!
//! Convert and format prices from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Convert 100 USD to EUR with the default 2% spread
//! booking-fx convert --amount 100 --from USD --to EUR
//!
//! # Format an amount for display
//! booking-fx format --amount 1234.5 --currency JPY
//!
//! # Convert and format in one step, as JSON
//! booking-fx quote --amount 250 --from USD --to JPY --format json
//!
//! # List the active rate table from a config file
//! booking-fx rates --config rates.json
//! ```

use booking_fx::config::{FxConfig, CONFIG_ENV_VAR};
use booking_fx::conversion::converter::{Conversion, Converter};
use booking_fx::core::currency::CurrencyCode;
use booking_fx::core::rates::RateTable;
use booking_fx::display::formatter::Formatter;
use booking_fx::display::price::PriceDisplay;
use rust_decimal::Decimal;
use std::env;
use std::process;

fn print_usage() {
    eprintln!(
        r#"booking-fx — currency conversion and price formatting

USAGE:
    booking-fx <COMMAND> [OPTIONS]

COMMANDS:
    convert     Convert an amount between two currencies
    format      Format an amount for display
    quote       Convert an amount and format it in the target currency
    rates       List the active exchange rate table
    help        Show this message

OPTIONS (convert, quote):
    --amount <AMOUNT>   Amount to convert
    --from <CODE>       Source currency
    --to <CODE>         Target currency
    --spread <SPREAD>   Spread fraction (default from config)

OPTIONS (format):
    --amount <AMOUNT>   Amount to format
    --currency <CODE>   Display currency

OPTIONS (all):
    --config <FILE>     JSON config file (default: ${}, else built-in tables)
    --format <FORMAT>   Output format: text (default) or json

EXAMPLES:
    booking-fx convert --amount 100 --from USD --to EUR
    booking-fx convert --amount 100 --from USD --to EUR --spread 0
    booking-fx format --amount 1234.5 --currency JPY
    booking-fx quote --amount 250 --from USD --to JPY --format json
    booking-fx rates --format json"#,
        CONFIG_ENV_VAR
    );
}

/// Options shared by every command.
#[derive(Debug, Default)]
struct Options {
    amount: Option<Decimal>,
    from: Option<CurrencyCode>,
    to: Option<CurrencyCode>,
    currency: Option<CurrencyCode>,
    spread: Option<Decimal>,
    config: Option<String>,
    format: String,
}

fn require_value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_decimal(value: &str, flag: &str) -> Result<Decimal, String> {
    value
        .parse()
        .map_err(|e| format!("Invalid {} '{}': {}", flag, value, e))
}

const CONVERT_FLAGS: &[&str] = &["--amount", "--from", "--to", "--spread", "--config", "--format"];
const FORMAT_FLAGS: &[&str] = &["--amount", "--currency", "--config", "--format"];
const RATES_FLAGS: &[&str] = &["--config", "--format"];

fn parse_options(args: &[String], allowed: &[&str]) -> Options {
    try_parse_options(args, allowed).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    })
}

/// Parse `args`, rejecting any flag not in `allowed`.
fn try_parse_options(args: &[String], allowed: &[&str]) -> Result<Options, String> {
    let mut opts = Options {
        format: "text".to_string(),
        ..Default::default()
    };
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag.starts_with("--") && !allowed.contains(&flag) {
            return Err(format!("Option {} is not valid for this command", flag));
        }
        match flag {
            "--amount" => {
                i += 1;
                opts.amount = Some(parse_decimal(&require_value(args, i, flag)?, flag)?);
            }
            "--from" => {
                i += 1;
                opts.from = Some(CurrencyCode::new(require_value(args, i, flag)?));
            }
            "--to" => {
                i += 1;
                opts.to = Some(CurrencyCode::new(require_value(args, i, flag)?));
            }
            "--currency" => {
                i += 1;
                opts.currency = Some(CurrencyCode::new(require_value(args, i, flag)?));
            }
            "--spread" => {
                i += 1;
                opts.spread = Some(parse_decimal(&require_value(args, i, flag)?, flag)?);
            }
            "--config" => {
                i += 1;
                opts.config = Some(require_value(args, i, flag)?);
            }
            "--format" => {
                i += 1;
                opts.format = require_value(args, i, flag)?;
                if opts.format != "text" && opts.format != "json" {
                    return Err(format!(
                        "Unknown format '{}': expected text or json",
                        opts.format
                    ));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }
    Ok(opts)
}

fn require<T>(value: Option<T>, flag: &str) -> T {
    value.unwrap_or_else(|| {
        eprintln!("{} is required", flag);
        process::exit(1);
    })
}

fn load_config(opts: &Options) -> FxConfig {
    let path = opts.config.clone().or_else(|| env::var(CONFIG_ENV_VAR).ok());
    match path {
        Some(path) => FxConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }),
        None => FxConfig::default(),
    }
}

/// Converter from `config`, with `--spread` overriding the configured spread.
fn build_converter(config: &FxConfig, spread: Option<Decimal>) -> Converter<RateTable> {
    let converter = config.build_converter().unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        process::exit(1);
    });
    match spread {
        Some(spread) => converter.with_spread(spread).unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        }),
        None => converter,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

/// JSON output schema for a conversion.
#[derive(serde::Serialize)]
struct ConvertOutput {
    amount: String,
    from: String,
    to: String,
    spread: String,
    result: Conversion,
}

fn cmd_convert(args: &[String]) {
    let opts = parse_options(args, CONVERT_FLAGS);
    let config = load_config(&opts);
    let converter = build_converter(&config, opts.spread);

    let amount = require(opts.amount, "--amount");
    let from = require(opts.from, "--from");
    let to = require(opts.to, "--to");
    let spread = converter.spread();

    let result = converter.try_convert(amount, &from, &to);

    if opts.format == "json" {
        let output = ConvertOutput {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            spread: spread.to_string(),
            result,
        };
        println!("{}", to_json(&output));
        return;
    }

    println!("{}", describe_conversion(amount, &from, &to, spread, &result));
}

/// One-line text summary of a conversion, amounts shown to the cent.
fn describe_conversion(
    amount: Decimal,
    from: &CurrencyCode,
    to: &CurrencyCode,
    spread: Decimal,
    result: &Conversion,
) -> String {
    match result {
        Conversion::Converted { amount: out, rate } => format!(
            "{:.2} {} = {:.2} {} (rate {}, spread {})",
            amount,
            from,
            out,
            to,
            rate.normalize(),
            spread.normalize()
        ),
        Conversion::SameCurrency { amount: out } => format!("{:.2} {} (same currency)", out, to),
        Conversion::PassedThrough { amount: out, reason } => {
            format!("{:.2} {} (not converted: {})", out, from, reason)
        }
    }
}

fn cmd_format(args: &[String]) {
    let opts = parse_options(args, FORMAT_FLAGS);
    let config = load_config(&opts);
    let formatter: Formatter = config.build_formatter();

    let amount = require(opts.amount, "--amount");
    let currency = require(opts.currency, "--currency");
    let display = formatter.format(amount, &currency);

    if opts.format == "json" {
        #[derive(serde::Serialize)]
        struct FormatOutput {
            amount: String,
            currency: String,
            display: String,
        }
        let output = FormatOutput {
            amount: amount.to_string(),
            currency: currency.to_string(),
            display,
        };
        println!("{}", to_json(&output));
    } else {
        println!("{}", display);
    }
}

fn cmd_quote(args: &[String]) {
    let opts = parse_options(args, CONVERT_FLAGS);
    let config = load_config(&opts);
    let prices = PriceDisplay::new(
        build_converter(&config, opts.spread),
        config.build_formatter(),
    );

    let amount = require(opts.amount, "--amount");
    let from = require(opts.from, "--from");
    let to = require(opts.to, "--to");
    let quote = prices.quote(amount, &from, &to);

    if opts.format == "json" {
        println!("{}", to_json(&quote));
    } else {
        println!("{}", quote.display);
    }
}

fn cmd_rates(args: &[String]) {
    let opts = parse_options(args, RATES_FLAGS);
    let config = load_config(&opts);
    let table = config.rate_table().unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        process::exit(1);
    });

    if opts.format == "json" {
        println!("{}", to_json(&table));
        return;
    }

    println!("Base currency: {}", table.base_currency());
    if let Some(as_of) = table.as_of() {
        println!("As of:         {}", as_of.to_rfc3339());
    }
    println!();
    for (code, rate) in table.entries() {
        println!("  {:<5} {}", code, rate);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "convert" => cmd_convert(rest),
        "format" => cmd_format(rest),
        "quote" => cmd_quote(rest),
        "rates" => cmd_rates(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_fx::conversion::converter::PassThroughReason;
    use rust_decimal_macros::dec;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_convert_flags_parse() {
        let opts = try_parse_options(
            &args(&["--amount", "100", "--from", "USD", "--to", "EUR", "--spread", "0"]),
            CONVERT_FLAGS,
        )
        .unwrap();
        assert_eq!(opts.amount, Some(dec!(100)));
        assert_eq!(opts.spread, Some(Decimal::ZERO));
        assert_eq!(opts.format, "text");
    }

    #[test]
    fn test_flags_outside_command_rejected() {
        let err = try_parse_options(
            &args(&["--amount", "5", "--currency", "USD", "--from", "EUR"]),
            FORMAT_FLAGS,
        )
        .unwrap_err();
        assert!(err.contains("--from"), "{}", err);

        let err = try_parse_options(&args(&["--spread", "0"]), RATES_FLAGS).unwrap_err();
        assert!(err.contains("--spread"), "{}", err);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(try_parse_options(&args(&["--amount", "abc"]), CONVERT_FLAGS).is_err());
        assert!(try_parse_options(&args(&["--amount"]), CONVERT_FLAGS).is_err());
        assert!(try_parse_options(&args(&["--format", "xml"]), RATES_FLAGS).is_err());
        assert!(try_parse_options(&args(&["stray"]), RATES_FLAGS).is_err());
    }

    #[test]
    fn test_quote_honours_spread_override() {
        let converter = build_converter(&FxConfig::default(), Some(Decimal::ZERO));
        let prices = PriceDisplay::new(converter, Formatter::default());
        let quote = prices.quote(dec!(100), &CurrencyCode::new("USD"), &CurrencyCode::new("EUR"));
        assert_eq!(quote.display, "€85.00");
    }

    #[test]
    fn test_describe_conversion_normalizes_scales() {
        let converter = build_converter(&FxConfig::default(), Some(Decimal::ZERO));
        let usd = CurrencyCode::new("USD");
        let eur = CurrencyCode::new("EUR");
        let result = converter.try_convert(dec!(100), &usd, &eur);
        assert_eq!(
            describe_conversion(dec!(100), &usd, &eur, converter.spread(), &result),
            "100.00 USD = 85.00 EUR (rate 0.85, spread 0)"
        );

        let passed = Conversion::PassedThrough {
            amount: dec!(7.5),
            reason: PassThroughReason::UnknownCurrency(vec![CurrencyCode::new("ZZZ")]),
        };
        assert_eq!(
            describe_conversion(dec!(7.5), &usd, &CurrencyCode::new("ZZZ"), dec!(0.02), &passed),
            "7.50 USD (not converted: no rate for ZZZ)"
        );
    }
}
