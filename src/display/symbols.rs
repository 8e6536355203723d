use crate::core::currency::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Built-in display symbols.
pub const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CAD", "C$"),
    ("AUD", "A$"),
    ("CHF", "CHF"),
    ("CNY", "¥"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("MXN", "MX$"),
    ("BRL", "R$"),
    ("AED", "AED"),
    ("SGD", "S$"),
];

/// Currencies displayed without fractional units.
pub const DEFAULT_ZERO_DECIMAL: &[&str] = &["JPY", "KRW"];

/// Display symbols and the zero-decimal set.
///
/// Keys are upper-cased on insert and on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: BTreeMap<String, String>,
    zero_decimal: BTreeSet<String>,
}

impl SymbolTable {
    /// A table with no symbols and no zero-decimal currencies.
    pub fn empty() -> Self {
        Self {
            symbols: BTreeMap::new(),
            zero_decimal: BTreeSet::new(),
        }
    }

    pub fn with_symbol(mut self, code: &CurrencyCode, symbol: impl Into<String>) -> Self {
        self.symbols.insert(code.normalized(), symbol.into());
        self
    }

    pub fn with_zero_decimal(mut self, code: &CurrencyCode) -> Self {
        self.zero_decimal.insert(code.normalized());
        self
    }

    /// Symbol for `code`, falling back to the upper-cased code.
    pub fn symbol(&self, code: &CurrencyCode) -> String {
        let key = code.normalized();
        match self.symbols.get(&key) {
            Some(symbol) => symbol.clone(),
            None => key,
        }
    }

    pub fn is_zero_decimal(&self, code: &CurrencyCode) -> bool {
        self.zero_decimal.contains(&code.normalized())
    }

    /// Number of fractional digits shown for `code`.
    pub fn decimal_places(&self, code: &CurrencyCode) -> u32 {
        if self.is_zero_decimal(code) {
            0
        } else {
            2
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (code, symbol) in DEFAULT_SYMBOLS {
            table.symbols.insert((*code).to_string(), (*symbol).to_string());
        }
        for code in DEFAULT_ZERO_DECIMAL {
            table.zero_decimal.insert((*code).to_string());
        }
        table
    }
}
