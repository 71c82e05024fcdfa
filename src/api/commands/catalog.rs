//! Catalog command module
//!
//! Unit and currency listings for selectors.

use crate::core::features::currency::types::CURRENCIES;
use crate::core::features::unit_converter::get_all_units;
use crate::shared::error::AppResult;
use crate::shared::types::{Category, GetUnitsResponse};

/// All units, or only those of `category`
pub async fn list_units_command(category: Option<Category>) -> AppResult<GetUnitsResponse> {
    let mut response = get_all_units();
    if let Some(category) = category {
        response.units.retain(|unit| unit.category == category);
    }
    Ok(response)
}

pub async fn list_currencies_command() -> AppResult<Vec<&'static str>> {
    Ok(CURRENCIES.to_vec())
}
