use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in rates, expressed as units of each currency per one USD.
pub const DEFAULT_RATES: &[(&str, Decimal)] = &[
    ("USD", dec!(1.0)),
    ("EUR", dec!(0.85)),
    ("GBP", dec!(0.73)),
    ("JPY", dec!(110.0)),
    ("CAD", dec!(1.25)),
    ("AUD", dec!(1.35)),
    ("CHF", dec!(0.92)),
    ("CNY", dec!(6.45)),
    ("INR", dec!(74.5)),
    ("KRW", dec!(1180.0)),
    ("MXN", dec!(20.0)),
    ("BRL", dec!(5.25)),
    ("AED", dec!(3.67)),
    ("SGD", dec!(1.35)),
];

/// Anything that can quote a base-relative rate for a currency.
///
/// The converter only depends on this trait, so a live provider can stand in
/// for the static [`RateTable`] without touching the conversion rules.
/// Implementations receive the code as the caller wrote it and are expected
/// to fold case themselves.
pub trait RateSource {
    /// Units of `code` per one base unit, or `None` if unknown.
    fn rate(&self, code: &CurrencyCode) -> Option<Decimal>;
}

/// Immutable table of exchange rates relative to a single base currency.
///
/// Keys are stored upper-cased; every rate is strictly positive.
///
/// # Examples
///
/// ```
/// use booking_fx::core::currency::CurrencyCode;
/// use booking_fx::core::rates::{RateSource, RateTable};
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::new(CurrencyCode::new("USD"))
///     .with_rate(CurrencyCode::new("eur"), dec!(0.85))
///     .unwrap();
///
/// assert_eq!(table.rate(&CurrencyCode::new("EUR")), Some(dec!(0.85)));
/// assert_eq!(table.rate(&CurrencyCode::new("USD")), Some(dec!(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateTable")]
pub struct RateTable {
    base_currency: CurrencyCode,
    rates: BTreeMap<String, Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    as_of: Option<DateTime<Utc>>,
}

/// Wire form of [`RateTable`]; validated through [`RateTable::from_rates`].
#[derive(Deserialize)]
struct RawRateTable {
    base_currency: CurrencyCode,
    rates: BTreeMap<String, Decimal>,
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
}

impl TryFrom<RawRateTable> for RateTable {
    type Error = FxError;

    fn try_from(raw: RawRateTable) -> Result<Self, Self::Error> {
        let table = RateTable::from_rates(raw.base_currency, raw.rates)?;
        Ok(match raw.as_of {
            Some(as_of) => table.with_as_of(as_of),
            None => table,
        })
    }
}

impl RateTable {
    /// Create a table containing only the base currency at rate 1.
    pub fn new(base_currency: CurrencyCode) -> Self {
        let base_currency = base_currency.to_normalized();
        let mut rates = BTreeMap::new();
        rates.insert(base_currency.as_str().to_string(), Decimal::ONE);
        Self {
            base_currency,
            rates,
            as_of: None,
        }
    }

    /// Build a table from `(code, rate)` pairs.
    pub fn from_rates<I, C>(base_currency: CurrencyCode, rates: I) -> Result<Self, FxError>
    where
        I: IntoIterator<Item = (C, Decimal)>,
        C: Into<CurrencyCode>,
    {
        let mut table = Self::new(base_currency);
        for (code, rate) in rates {
            table.set_rate(code.into(), rate)?;
        }
        if table.rates.get(table.base_currency.as_str()) != Some(&Decimal::ONE) {
            log::warn!(
                "base currency {} does not have rate 1 in the supplied table",
                table.base_currency
            );
        }
        Ok(table)
    }

    /// Set the rate for `code`: 1 base unit = `rate` units of `code`.
    pub fn set_rate(&mut self, code: CurrencyCode, rate: Decimal) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency: code,
                rate,
            });
        }
        self.rates.insert(code.normalized(), rate);
        Ok(())
    }

    /// Builder form of [`RateTable::set_rate`].
    pub fn with_rate(mut self, code: CurrencyCode, rate: Decimal) -> Result<Self, FxError> {
        self.set_rate(code, rate)?;
        Ok(self)
    }

    /// Stamp the table with the time its rates were captured.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(&code.normalized())
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.as_of
    }

    /// All known codes in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.rates.keys().map(|k| CurrencyCode::new(k.as_str()))
    }

    /// All `(code, rate)` entries in alphabetical order.
    pub fn entries(&self) -> impl Iterator<Item = (CurrencyCode, Decimal)> + '_ {
        self.rates
            .iter()
            .map(|(k, v)| (CurrencyCode::new(k.as_str()), *v))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateSource for RateTable {
    fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(&code.normalized()).copied()
    }
}

impl<T: RateSource + ?Sized> RateSource for &T {
    fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        (**self).rate(code)
    }
}

impl<T: RateSource + ?Sized> RateSource for Box<T> {
    fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        (**self).rate(code)
    }
}

impl Default for RateTable {
    /// The built-in USD-based table.
    fn default() -> Self {
        let mut table = Self::new(CurrencyCode::new("USD"));
        for (code, rate) in DEFAULT_RATES {
            table.rates.insert((*code).to_string(), *rate);
        }
        table
    }
}
