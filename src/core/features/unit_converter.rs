//! Unit conversion engine
//!
//! Linear categories (length, weight, time) convert through a base unit:
//! `value * factor[from] / factor[to]`. Temperature is affine and goes through
//! Celsius with fixed formulas.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Category, DisplayValue, GetUnitsResponse, UnitDTO};

/// Fractional digits kept for display and history
pub const DISPLAY_DECIMALS: i32 = 5;

// ============================================================================
// Unit Table
// ============================================================================

/// A unit of a linear category and its multiplier to the category base unit
#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub name: &'static str,
    pub category: Category,
    pub base_factor: f64,
}

const fn unit(name: &'static str, category: Category, base_factor: f64) -> UnitDefinition {
    UnitDefinition { name, category, base_factor }
}

/// Linear units in selector order
static UNIT_TABLE: &[UnitDefinition] = &[
    // Length (base: meter)
    unit("meter", Category::Length, 1.0),
    unit("kilometer", Category::Length, 1000.0),
    unit("centimeter", Category::Length, 0.01),
    unit("millimeter", Category::Length, 0.001),
    unit("mile", Category::Length, 1609.344),
    unit("yard", Category::Length, 0.9144),
    unit("foot", Category::Length, 0.3048),
    unit("inch", Category::Length, 0.0254),
    // Weight (base: gram)
    unit("gram", Category::Weight, 1.0),
    unit("kilogram", Category::Weight, 1000.0),
    unit("milligram", Category::Weight, 0.001),
    unit("pound", Category::Weight, 453.59237),
    unit("ounce", Category::Weight, 28.349523125),
    // Time (base: second)
    unit("second", Category::Time, 1.0),
    unit("minute", Category::Time, 60.0),
    unit("hour", Category::Time, 3600.0),
    unit("day", Category::Time, 86400.0),
];

/// Name lookup over `UNIT_TABLE`, built once
static UNIT_REGISTRY: Lazy<HashMap<&'static str, &'static UnitDefinition>> = Lazy::new(|| {
    UNIT_TABLE.iter().map(|def| (def.name, def)).collect()
});

/// The fixed temperature scale set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            other => Err(AppError::Validation(format!("Unknown temperature unit: {}", other))),
        }
    }
}

/// Unit names of a category, in selector order
pub fn units_for(category: Category) -> Vec<&'static str> {
    match category {
        Category::Temperature => TemperatureUnit::ALL.iter().map(|u| u.as_str()).collect(),
        _ => UNIT_TABLE
            .iter()
            .filter(|def| def.category == category)
            .map(|def| def.name)
            .collect(),
    }
}

/// Category a unit belongs to. Unit names are unique across categories.
pub fn category_of(unit: &str) -> Option<Category> {
    if let Some(def) = UNIT_REGISTRY.get(unit) {
        return Some(def.category);
    }
    unit.parse::<TemperatureUnit>().ok().map(|_| Category::Temperature)
}

/// All units, grouped by category in table order
pub fn get_all_units() -> GetUnitsResponse {
    let units = Category::ALL
        .iter()
        .flat_map(|category| {
            units_for(*category).into_iter().map(move |name| UnitDTO {
                id: name.to_string(),
                label: capitalize(name),
                category: *category,
            })
        })
        .collect();

    GetUnitsResponse { units }
}

// ============================================================================
// Conversion
// ============================================================================

fn linear_factor(category: Category, unit: &str) -> AppResult<f64> {
    let def = UNIT_REGISTRY
        .get(unit)
        .ok_or_else(|| AppError::Validation(format!("Unknown {} unit: {}", category, unit)))?;

    if def.category != category {
        return Err(AppError::Validation(format!(
            "Unit {} is a {} unit, not {}",
            unit, def.category, category
        )));
    }

    Ok(def.base_factor)
}

/// `value * factor[from] / factor[to]` for length, weight and time
pub fn convert_linear(category: Category, value: f64, from: &str, to: &str) -> AppResult<f64> {
    if category == Category::Temperature {
        return Err(AppError::Validation(
            "Temperature has no linear scale; use convert_temperature".to_string(),
        ));
    }

    let from_factor = linear_factor(category, from)?;
    let to_factor = linear_factor(category, to)?;

    // Same unit, no conversion needed
    if from == to {
        return Ok(value);
    }

    Ok(value * from_factor / to_factor)
}

/// Convert through Celsius
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    let celsius = match from {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * (5.0 / 9.0),
        TemperatureUnit::Kelvin => value - 273.15,
    };

    match to {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => (celsius * 9.0 / 5.0) + 32.0,
        TemperatureUnit::Kelvin => celsius + 273.15,
    }
}

/// Dispatch on category with string unit names
pub fn convert_value(category: Category, value: f64, from: &str, to: &str) -> AppResult<f64> {
    match category {
        Category::Temperature => {
            let from_unit = from.parse::<TemperatureUnit>()?;
            let to_unit = to.parse::<TemperatureUnit>()?;
            Ok(convert_temperature(value, from_unit, to_unit))
        }
        _ => convert_linear(category, value, from, to),
    }
}

/// Round half up to `DISPLAY_DECIMALS` places; non-finite input becomes N/A.
pub fn round_display(value: f64) -> DisplayValue {
    if !value.is_finite() {
        return DisplayValue::NotAvailable;
    }

    let scale = 10f64.powi(DISPLAY_DECIMALS);
    let rounded = (value * scale + 0.5).floor() / scale;

    // value * scale overflows only for magnitudes far beyond 5-decimal precision
    if rounded.is_finite() {
        DisplayValue::Value(rounded)
    } else {
        DisplayValue::Value(value)
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
