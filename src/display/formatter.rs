use crate::conversion::converter::round_half_up;
use crate::core::currency::CurrencyCode;
use crate::display::symbols::SymbolTable;
use rust_decimal::{Decimal, RoundingStrategy};

const GROUP_SEPARATOR: char = ',';
const DECIMAL_POINT: char = '.';

/// Renders amounts as `symbol + grouped number`.
///
/// Two fractional digits are always shown unless the currency is in the
/// zero-decimal set, in which case the amount is rounded to a whole unit.
/// Ties round toward positive infinity, the same rule the converter uses
/// for cents, so `-1234.5` JPY shows as `¥-1,234`. Separators are fixed
/// (`,` for thousands and `.` for the decimal point) and do not depend on
/// the process locale.
///
/// # Examples
///
/// ```
/// use booking_fx::display::formatter::Formatter;
/// use booking_fx::core::currency::CurrencyCode;
/// use rust_decimal_macros::dec;
///
/// let f = Formatter::default();
/// assert_eq!(f.format(dec!(1234.5), &CurrencyCode::new("USD")), "$1,234.50");
/// assert_eq!(f.format(dec!(1234.5), &CurrencyCode::new("JPY")), "¥1,235");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    symbols: SymbolTable,
}

impl Formatter {
    pub fn new(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn format(&self, amount: Decimal, currency: &CurrencyCode) -> String {
        let symbol = self.symbols.symbol(currency);
        let places = self.symbols.decimal_places(currency);
        format!("{}{}", symbol, group_digits(amount, places))
    }
}

/// Format with the built-in symbol table.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    Formatter::default().format(amount, &CurrencyCode::new(currency))
}

/// Round to `places` and insert thousands separators.
fn group_digits(amount: Decimal, places: u32) -> String {
    // Only amounts within a few digits of Decimal::MAX overflow the scaling.
    let mut rounded = round_half_up(amount, places).unwrap_or_else(|| {
        amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
    });
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    let negative = rounded.is_sign_negative();
    let digits = format!("{:.*}", places as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once(DECIMAL_POINT) {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(DECIMAL_POINT);
        out.push_str(frac);
    }
    out
}
