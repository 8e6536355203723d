use crate::conversion::converter::{Conversion, Converter};
use crate::core::currency::CurrencyCode;
use crate::core::rates::{RateSource, RateTable};
use crate::display::formatter::Formatter;
use rust_decimal::Decimal;
use serde::Serialize;

/// A converted price together with its rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub currency: CurrencyCode,
    pub conversion: Conversion,
    pub display: String,
}

/// Converts a listed price into the viewer's currency and renders it.
///
/// When the conversion passes through (unknown code), the original amount
/// is rendered in the *source* currency so the displayed symbol matches the
/// figure shown.
#[derive(Debug, Clone)]
pub struct PriceDisplay<S = RateTable> {
    converter: Converter<S>,
    formatter: Formatter,
}

impl<S: RateSource> PriceDisplay<S> {
    pub fn new(converter: Converter<S>, formatter: Formatter) -> Self {
        Self {
            converter,
            formatter,
        }
    }

    pub fn quote(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> Quote {
        let conversion = self.converter.try_convert(amount, from, to);
        let currency = if conversion.is_passed_through() {
            from.clone()
        } else {
            to.clone()
        };
        let display = self.formatter.format(conversion.amount(), &currency);
        Quote {
            currency,
            conversion,
            display,
        }
    }

    pub fn display_price(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> String {
        self.quote(amount, from, to).display
    }
}

impl Default for PriceDisplay<RateTable> {
    fn default() -> Self {
        Self::new(Converter::default(), Formatter::default())
    }
}
