use crate::core::currency::{CodeMatching, CurrencyCode};
use crate::core::error::FxError;
use crate::core::rates::{RateSource, RateTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spread applied on top of the mid conversion unless configured otherwise.
pub const DEFAULT_SPREAD: Decimal = dec!(0.02);

/// Why an amount came back unconverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "codes", rename_all = "snake_case")]
pub enum PassThroughReason {
    /// One or both codes have no rate.
    UnknownCurrency(Vec<CurrencyCode>),
    /// The intermediate arithmetic left the representable range.
    Overflow,
}

impl fmt::Display for PassThroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassThroughReason::UnknownCurrency(codes) => {
                let names: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
                write!(f, "no rate for {}", names.join(", "))
            }
            PassThroughReason::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}

/// Outcome of a conversion attempt.
///
/// [`Conversion::amount`] is always the figure a caller of
/// [`Converter::convert`] would receive; the variant says whether a
/// conversion actually took place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Conversion {
    /// Rates were found and applied. `rate` is the cross-rate before spread.
    Converted { amount: Decimal, rate: Decimal },
    /// Source and target were the same currency; nothing was applied.
    SameCurrency { amount: Decimal },
    /// The input amount was returned unchanged.
    PassedThrough {
        amount: Decimal,
        reason: PassThroughReason,
    },
}

impl Conversion {
    pub fn amount(&self) -> Decimal {
        match self {
            Conversion::Converted { amount, .. }
            | Conversion::SameCurrency { amount }
            | Conversion::PassedThrough { amount, .. } => *amount,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Conversion::Converted { .. })
    }

    pub fn is_passed_through(&self) -> bool {
        matches!(self, Conversion::PassedThrough { .. })
    }
}

/// Converts amounts between currencies using a [`RateSource`].
///
/// Rates are base-relative: an amount is divided by the source rate to reach
/// the base unit, multiplied by the target rate, marked up by the spread and
/// rounded half-up to cents.
///
/// A missing rate never produces an error. The amount is returned unchanged
/// and a warning is logged; use [`Converter::try_convert`] to tell the two
/// outcomes apart.
///
/// # Examples
///
/// ```
/// use booking_fx::conversion::converter::Converter;
/// use booking_fx::core::currency::CurrencyCode;
/// use rust_decimal_macros::dec;
///
/// let converter = Converter::default();
/// let eur = converter.convert(dec!(100), &CurrencyCode::new("USD"), &CurrencyCode::new("EUR"));
/// assert_eq!(eur, dec!(86.70));
/// ```
#[derive(Debug, Clone)]
pub struct Converter<S = RateTable> {
    source: S,
    spread: Decimal,
    matching: CodeMatching,
}

impl<S: RateSource> Converter<S> {
    /// Converter over `source` with the default spread and literal matching.
    pub fn new(source: S) -> Self {
        Self {
            source,
            spread: DEFAULT_SPREAD,
            matching: CodeMatching::default(),
        }
    }

    /// Replace the default spread. Spreads at or below -100% are rejected.
    pub fn with_spread(mut self, spread: Decimal) -> Result<Self, FxError> {
        validate_spread(spread)?;
        self.spread = spread;
        Ok(self)
    }

    pub fn with_matching(mut self, matching: CodeMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn spread(&self) -> Decimal {
        self.spread
    }

    pub fn matching(&self) -> CodeMatching {
        self.matching
    }

    /// Convert with the configured spread, passing through on a miss.
    pub fn convert(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> Decimal {
        self.try_convert_with_spread(amount, from, to, self.spread)
            .amount()
    }

    /// Convert with an explicit spread, passing through on a miss.
    pub fn convert_with_spread(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
        spread: Decimal,
    ) -> Decimal {
        self.try_convert_with_spread(amount, from, to, spread)
            .amount()
    }

    /// Convert with the configured spread and report what happened.
    pub fn try_convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Conversion {
        self.try_convert_with_spread(amount, from, to, self.spread)
    }

    /// Convert with an explicit spread and report what happened.
    pub fn try_convert_with_spread(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
        spread: Decimal,
    ) -> Conversion {
        if from.matches(to, self.matching) {
            return Conversion::SameCurrency { amount };
        }

        let from_rate = self.source.rate(from);
        let to_rate = self.source.rate(to);
        let (from_rate, to_rate) = match (from_rate, to_rate) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                let mut missing = Vec::new();
                if from_rate.is_none() {
                    missing.push(from.clone());
                }
                if to_rate.is_none() {
                    missing.push(to.clone());
                }
                let reason = PassThroughReason::UnknownCurrency(missing);
                log::warn!(
                    "exchange rate not found for {} -> {} ({}); returning amount unconverted",
                    from,
                    to,
                    reason
                );
                return Conversion::PassedThrough { amount, reason };
            }
        };

        match apply_rates(amount, from_rate, to_rate, spread) {
            Some((converted, rate)) => {
                log::debug!(
                    "converted {} {} -> {} {} (spread {})",
                    amount,
                    from,
                    converted,
                    to,
                    spread
                );
                Conversion::Converted {
                    amount: converted,
                    rate,
                }
            }
            None => {
                log::warn!(
                    "overflow converting {} {} -> {}; returning amount unconverted",
                    amount,
                    from,
                    to
                );
                Conversion::PassedThrough {
                    amount,
                    reason: PassThroughReason::Overflow,
                }
            }
        }
    }
}

impl Default for Converter<RateTable> {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}

fn validate_spread(spread: Decimal) -> Result<(), FxError> {
    if spread <= Decimal::NEGATIVE_ONE {
        return Err(FxError::InvalidSpread(spread));
    }
    Ok(())
}

/// `amount / from_rate * to_rate * (1 + spread)`, rounded half-up to cents,
/// together with the cross-rate `to_rate / from_rate`.
fn apply_rates(
    amount: Decimal,
    from_rate: Decimal,
    to_rate: Decimal,
    spread: Decimal,
) -> Option<(Decimal, Decimal)> {
    let base = amount.checked_div(from_rate)?;
    let converted = base.checked_mul(to_rate)?;
    let marked_up = converted.checked_mul(Decimal::ONE.checked_add(spread)?)?;
    let rate = to_rate.checked_div(from_rate)?;
    Some((round_cents_half_up(marked_up)?, rate))
}

/// Rounds to two decimals with ties going toward positive infinity.
pub(crate) fn round_cents_half_up(value: Decimal) -> Option<Decimal> {
    round_half_up(value, 2)
}

/// `floor(value * 10^places + 0.5) / 10^places`.
pub(crate) fn round_half_up(value: Decimal, places: u32) -> Option<Decimal> {
    let scale = Decimal::from(10u64.checked_pow(places)?);
    let units = value.checked_mul(scale)?.checked_add(dec!(0.5))?.floor();
    units.checked_div(scale)
}

/// Convert with the built-in table and literal code matching.
///
/// # Examples
///
/// ```
/// use booking_fx::conversion::converter::convert;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(convert(dec!(100), "USD", "ZZZ", dec!(0.02)), dec!(100));
/// ```
pub fn convert(amount: Decimal, from: &str, to: &str, spread: Decimal) -> Decimal {
    default_converter().convert_with_spread(
        amount,
        &CurrencyCode::new(from),
        &CurrencyCode::new(to),
        spread,
    )
}

fn default_converter() -> &'static Converter<RateTable> {
    use std::sync::OnceLock;
    static CONVERTER: OnceLock<Converter<RateTable>> = OnceLock::new();
    CONVERTER.get_or_init(Converter::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    #[test]
    fn test_same_currency_returns_amount() {
        let c = Converter::default();
        assert_eq!(c.convert(dec!(100), &code("USD"), &code("USD")), dec!(100));
        assert_eq!(
            c.convert_with_spread(dec!(123.456), &code("usd"), &code("usd"), dec!(0.5)),
            dec!(123.456)
        );
    }

    #[test]
    fn test_usd_to_eur_with_spread() {
        let c = Converter::default();
        let result = c.try_convert(dec!(100), &code("USD"), &code("EUR"));
        assert_eq!(result.amount(), dec!(86.7));
        assert!(result.is_converted());
        match result {
            Conversion::Converted { rate, .. } => assert_eq!(rate, dec!(0.85)),
            other => panic!("expected conversion, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_currency_passes_through() {
        let c = Converter::default();
        let result = c.try_convert(dec!(100), &code("USD"), &code("ZZZ"));
        assert_eq!(result.amount(), dec!(100));
        assert_eq!(
            result,
            Conversion::PassedThrough {
                amount: dec!(100),
                reason: PassThroughReason::UnknownCurrency(vec![code("ZZZ")]),
            }
        );
    }

    #[test]
    fn test_both_unknown_reports_both() {
        let c = Converter::default();
        let result = c.try_convert(dec!(5), &code("AAA"), &code("BBB"));
        match result {
            Conversion::PassedThrough {
                reason: PassThroughReason::UnknownCurrency(codes),
                ..
            } => assert_eq!(codes, vec![code("AAA"), code("BBB")]),
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_case_literal_applies_spread() {
        // "Usd" and "USD" differ literally, so the rate path runs and the spread lands.
        let c = Converter::default();
        assert_eq!(c.convert(dec!(100), &code("Usd"), &code("USD")), dec!(102));
    }

    #[test]
    fn test_mixed_case_insensitive_is_noop() {
        let c = Converter::default().with_matching(CodeMatching::CaseInsensitive);
        let result = c.try_convert(dec!(100), &code("Usd"), &code("USD"));
        assert_eq!(result, Conversion::SameCurrency { amount: dec!(100) });
    }

    #[test]
    fn test_zero_spread_cross_rate() {
        let c = Converter::default();
        // 100 EUR -> 117.647... USD -> 12941.18 JPY
        let jpy = c.convert_with_spread(dec!(100), &code("EUR"), &code("JPY"), Decimal::ZERO);
        assert_eq!(jpy, dec!(12941.18));
    }

    #[test]
    fn test_round_half_up_on_cent_boundary() {
        assert_eq!(round_cents_half_up(dec!(1.005)), Some(dec!(1.01)));
        assert_eq!(round_cents_half_up(dec!(1.004)), Some(dec!(1.00)));
        assert_eq!(round_cents_half_up(dec!(-1.005)), Some(dec!(-1.00)));
        assert_eq!(round_half_up(dec!(-2.5), 0), Some(dec!(-2)));
        assert_eq!(round_half_up(dec!(2.5), 0), Some(dec!(3)));
        assert_eq!(round_half_up(Decimal::MAX, 2), None);
    }

    #[test]
    fn test_invalid_spread_rejected() {
        assert!(Converter::default().with_spread(dec!(-1)).is_err());
        let c = Converter::default().with_spread(dec!(0.05)).unwrap();
        assert_eq!(c.spread(), dec!(0.05));
        assert_eq!(c.convert(dec!(100), &code("USD"), &code("EUR")), dec!(89.25));
    }

    #[test]
    fn test_overflow_passes_through() {
        let c = Converter::default();
        let result = c.try_convert(Decimal::MAX, &code("USD"), &code("KRW"));
        assert_eq!(
            result,
            Conversion::PassedThrough {
                amount: Decimal::MAX,
                reason: PassThroughReason::Overflow,
            }
        );
    }

    #[test]
    fn test_free_function_uses_default_table() {
        assert_eq!(convert(dec!(100), "USD", "EUR", dec!(0.02)), dec!(86.7));
        assert_eq!(convert(dec!(100), "USD", "USD", dec!(0.02)), dec!(100));
        assert_eq!(convert(dec!(100), "USD", "ZZZ", dec!(0.02)), dec!(100));
    }

    #[test]
    fn test_negative_amount_converts() {
        let c = Converter::default();
        assert_eq!(c.convert(dec!(-100), &code("USD"), &code("EUR")), dec!(-86.7));
    }
}
