use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-letter currency code as supplied by the caller.
///
/// The code is stored verbatim. Table lookups always go through
/// [`CurrencyCode::normalized`], while the same-currency short-circuit in
/// the converter compares codes according to a [`CodeMatching`] policy.
///
/// # Examples
///
/// ```
/// use booking_fx::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("usd");
/// assert_eq!(usd.as_str(), "usd");
/// assert_eq!(usd.normalized(), "USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased form used as the key into rate and symbol tables.
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }

    /// Returns a copy of this code in its upper-cased form.
    pub fn to_normalized(&self) -> CurrencyCode {
        CurrencyCode(self.normalized())
    }

    /// Whether `self` and `other` denote the same currency under `matching`.
    pub fn matches(&self, other: &CurrencyCode, matching: CodeMatching) -> bool {
        match matching {
            CodeMatching::Literal => self.0 == other.0,
            CodeMatching::CaseInsensitive => self.normalized() == other.normalized(),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How the converter decides that source and target are the same currency.
///
/// `Literal` compares the raw codes, so `"Usd"` and `"USD"` are treated as
/// different currencies and the pair goes through the rate lookup (and picks
/// up the spread). `CaseInsensitive` compares the upper-cased forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeMatching {
    #[default]
    Literal,
    CaseInsensitive,
}

impl fmt::Display for CodeMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeMatching::Literal => write!(f, "literal"),
            CodeMatching::CaseInsensitive => write!(f, "case_insensitive"),
        }
    }
}
