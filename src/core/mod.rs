pub mod currency;
pub mod error;
pub mod rates;
