//! Converter and formatter configuration.
//!
//! Every field is optional; anything left out falls back to the built-in
//! tables. Rates and the spread are written as strings so they parse
//! exactly:
//!
//! ```json
//! {
//!   "base_currency": "USD",
//!   "spread": "0.02",
//!   "matching": "literal",
//!   "rates": { "USD": "1.0", "EUR": "0.85" },
//!   "symbols": { "USD": "$", "EUR": "€" },
//!   "zero_decimal": ["JPY"]
//! }
//! ```

use crate::conversion::converter::{Converter, DEFAULT_SPREAD};
use crate::core::currency::{CodeMatching, CurrencyCode};
use crate::core::error::FxError;
use crate::core::rates::{RateTable, DEFAULT_RATES};
use crate::display::formatter::Formatter;
use crate::display::symbols::{SymbolTable, DEFAULT_SYMBOLS, DEFAULT_ZERO_DECIMAL};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Environment variable consulted by the CLI for a config file path.
pub const CONFIG_ENV_VAR: &str = "BOOKING_FX_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: CurrencyCode,
    #[serde(default = "default_spread")]
    pub spread: Decimal,
    #[serde(default)]
    pub matching: CodeMatching,
    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, Decimal>,
    #[serde(default = "default_symbols")]
    pub symbols: BTreeMap<String, String>,
    #[serde(default = "default_zero_decimal")]
    pub zero_decimal: Vec<String>,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

fn default_base_currency() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn default_spread() -> Decimal {
    DEFAULT_SPREAD
}

fn default_rates() -> BTreeMap<String, Decimal> {
    DEFAULT_RATES
        .iter()
        .map(|(code, rate)| ((*code).to_string(), *rate))
        .collect()
}

fn default_symbols() -> BTreeMap<String, String> {
    DEFAULT_SYMBOLS
        .iter()
        .map(|(code, symbol)| ((*code).to_string(), (*symbol).to_string()))
        .collect()
}

fn default_zero_decimal() -> Vec<String> {
    DEFAULT_ZERO_DECIMAL.iter().map(|c| (*c).to_string()).collect()
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            spread: default_spread(),
            matching: CodeMatching::default(),
            rates: default_rates(),
            symbols: default_symbols(),
            zero_decimal: default_zero_decimal(),
            as_of: None,
        }
    }
}

impl FxConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FxError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FxError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        log::info!(
            "loaded FX config from {} ({} rates, base {})",
            path.display(),
            config.rates.len(),
            config.base_currency
        );
        Ok(config)
    }

    /// Build the rate table, rejecting non-positive rates and a base
    /// currency that has no rate.
    pub fn rate_table(&self) -> Result<RateTable, FxError> {
        let table = RateTable::from_rates(
            self.base_currency.clone(),
            self.rates
                .iter()
                .map(|(code, rate)| (CurrencyCode::new(code.as_str()), *rate)),
        )?;
        if !self
            .rates
            .keys()
            .any(|k| k.eq_ignore_ascii_case(self.base_currency.as_str()))
        {
            return Err(FxError::UnknownCurrency(self.base_currency.clone()));
        }
        Ok(match self.as_of {
            Some(as_of) => table.with_as_of(as_of),
            None => table,
        })
    }

    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::empty();
        for (code, symbol) in &self.symbols {
            table = table.with_symbol(&CurrencyCode::new(code.as_str()), symbol.as_str());
        }
        for code in &self.zero_decimal {
            table = table.with_zero_decimal(&CurrencyCode::new(code.as_str()));
        }
        table
    }

    pub fn build_converter(&self) -> Result<Converter<RateTable>, FxError> {
        Ok(Converter::new(self.rate_table()?)
            .with_spread(self.spread)?
            .with_matching(self.matching))
    }

    pub fn build_formatter(&self) -> Formatter {
        Formatter::new(self.symbol_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = FxConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FxConfig::default());
        assert_eq!(config.spread, dec!(0.02));
        assert_eq!(config.matching, CodeMatching::Literal);
    }

    #[test]
    fn test_custom_config_builds_converter() {
        let config = FxConfig::from_json_str(
            r#"{
                "base_currency": "EUR",
                "spread": "0",
                "matching": "case_insensitive",
                "rates": { "EUR": "1", "USD": "1.10" }
            }"#,
        )
        .unwrap();
        let converter = config.build_converter().unwrap();
        assert_eq!(converter.matching(), CodeMatching::CaseInsensitive);
        let usd = converter.convert(
            dec!(100),
            &CurrencyCode::new("EUR"),
            &CurrencyCode::new("USD"),
        );
        assert_eq!(usd, dec!(110));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let config =
            FxConfig::from_json_str(r#"{ "rates": { "USD": "1", "EUR": "-0.85" } }"#).unwrap();
        assert!(matches!(
            config.build_converter(),
            Err(FxError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_missing_base_rate_rejected() {
        let config = FxConfig::from_json_str(r#"{ "rates": { "EUR": "0.85" } }"#).unwrap();
        assert!(matches!(
            config.rate_table(),
            Err(FxError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_bad_spread_rejected() {
        let config = FxConfig::from_json_str(r#"{ "spread": "-1.5" }"#).unwrap();
        assert!(matches!(
            config.build_converter(),
            Err(FxError::InvalidSpread(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FxConfig::from_json_str("{ not json"),
            Err(FxError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = FxConfig::load("/nonexistent/booking-fx.json").unwrap_err();
        assert!(matches!(err, FxError::ConfigIo { .. }));
    }

    #[test]
    fn test_symbol_table_from_config() {
        let config = FxConfig::from_json_str(
            r#"{ "symbols": { "usd": "US$" }, "zero_decimal": ["huf"] }"#,
        )
        .unwrap();
        let formatter = config.build_formatter();
        assert_eq!(formatter.format(dec!(5), &CurrencyCode::new("USD")), "US$5.00");
        assert_eq!(formatter.format(dec!(5), &CurrencyCode::new("EUR")), "EUR5.00");
        assert_eq!(formatter.format(dec!(1500.4), &CurrencyCode::new("HUF")), "HUF1,500");
    }
}
