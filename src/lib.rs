//! # booking-fx
//!
//! Currency conversion and price formatting for the booking administration
//! console.
//!
//! Prices for hotels, flights, tickets and sports events are stored in one
//! currency and shown in another. This crate converts amounts through a
//! table of base-relative rates with a configurable spread, and renders them
//! with the right symbol and number of decimals.
//!
//! ## Architecture
//!
//! - **core** — Currency codes, rate tables and the `RateSource` seam
//! - **conversion** — The converter and its typed outcome
//! - **display** — Symbols, number formatting, converted price quotes
//! - **config** — JSON configuration for all of the above

pub mod config;
pub mod conversion;
pub mod core;
pub mod display;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::FxConfig;
    pub use crate::conversion::converter::{convert, Conversion, Converter, PassThroughReason};
    pub use crate::core::currency::{CodeMatching, CurrencyCode};
    pub use crate::core::error::FxError;
    pub use crate::core::rates::{RateSource, RateTable};
    pub use crate::display::formatter::{format_amount, Formatter};
    pub use crate::display::price::{PriceDisplay, Quote};
    pub use crate::display::symbols::SymbolTable;
}
