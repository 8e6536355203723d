pub mod formatter;
pub mod price;
pub mod symbols;
