//! Command modules
//!
//! The operations a front end drives. Each takes the shared `AppState`.
//!
//! - `convert`: unit and currency conversion, recorded in history
//! - `history`: list, clear and replay past conversions
//! - `preferences`: theme flag
//! - `catalog`: unit and currency listings for selectors
//! - `settings`: show and save the effective settings

pub mod catalog;
pub mod convert;
pub mod history;
pub mod preferences;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;
