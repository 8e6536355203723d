use crate::core::currency::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors arising while building rate tables or loading configuration.
///
/// Conversion and formatting themselves never fail; these errors only
/// surface from constructors and the config loader.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("FX rate must be positive, got {rate} for {currency}")]
    InvalidRate { currency: CurrencyCode, rate: Decimal },
    #[error("invalid spread {0}: must be greater than -1")]
    InvalidSpread(Decimal),
    #[error("unknown currency {0}")]
    UnknownCurrency(CurrencyCode),
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
