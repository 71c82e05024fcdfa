//! Conversion features
//!
//! - `unit_converter`: static unit table and the conversion engine
//! - `currency`: exchange-rate gateways

pub mod currency;
pub mod unit_converter;
