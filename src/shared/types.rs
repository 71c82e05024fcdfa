use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::shared::error::AppError;

/// Marker shown in place of a non-finite result
pub const NOT_AVAILABLE: &str = "N/A";

/// Measurement categories offered by the unit converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Time,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Time => "time",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Category::Length),
            "weight" => Ok(Category::Weight),
            "temperature" => Ok(Category::Temperature),
            "time" => Ok(Category::Time),
            other => Err(AppError::Validation(format!("Unknown category: {}", other))),
        }
    }
}

/// A rounded result ready for display, or the "N/A" marker.
///
/// Serialized as a bare JSON number, or as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    Value(f64),
    NotAvailable,
}

/// Format a number the way the browser front end did: plain decimals,
/// switching to exponent form (`1e-7`, `1e+21`) outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    value.to_string()
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Value(v) => f.write_str(&format_number(*v)),
            DisplayValue::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for DisplayValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DisplayValue::Value(v) if v.is_finite() => serializer.serialize_f64(*v),
            _ => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumOrString {
            Num(f64),
            Str(String),
        }

        match NumOrString::deserialize(deserializer)? {
            NumOrString::Num(n) => Ok(DisplayValue::Value(n)),
            NumOrString::Str(s) if s == NOT_AVAILABLE => Ok(DisplayValue::NotAvailable),
            NumOrString::Str(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{}\", got \"{}\"",
                NOT_AVAILABLE, s
            ))),
        }
    }
}

// ---- Unit conversion ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertUnitsRequest {
    /// Inferred from `from` when absent
    pub category: Option<Category>,
    pub value: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertUnitsResponse {
    pub category: Category,
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: DisplayValue,
    /// e.g. "12 meter = 39.37008 foot"
    pub display: String,
}

// ---- Currency conversion ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertCurrencyRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertCurrencyResponse {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub converted: DisplayValue,
    /// e.g. "10 USD = 830.5 INR (rate: 83.05)"
    pub display: String,
}

// ---- Unit listing ----

#[derive(Debug, Clone, Serialize)]
pub struct UnitDTO {
    pub id: String,    // Unit name as accepted by the converter (e.g., "meter")
    pub label: String, // Capitalized for selectors (e.g., "Meter")
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUnitsResponse {
    pub units: Vec<UnitDTO>,
}

// ---- History ----

/// What kind of conversion produced a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    Unit {
        category: Category,
    },
    Currency {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rate: Option<f64>,
    },
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Unit { category } => fmt::Display::fmt(category, f),
            EntryKind::Currency { .. } => f.pad("currency"),
        }
    }
}

/// One completed conversion as recorded in the history log.
///
/// Field names on the wire are kept short (`val`, `result`, `time`) so blobs
/// written by earlier front ends still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub kind: EntryKind,
    pub from: String,
    pub to: String,
    #[serde(rename = "val")]
    pub input_value: f64,
    #[serde(rename = "result")]
    pub result_value: DisplayValue,
    pub title: String,
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn unit(
        category: Category,
        from: impl Into<String>,
        to: impl Into<String>,
        input_value: f64,
        result_value: DisplayValue,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        let title = format!("{} {} → {} {}", format_number(input_value), from, result_value, to);
        Self {
            kind: EntryKind::Unit { category },
            from,
            to,
            input_value,
            result_value,
            title,
            timestamp: Utc::now(),
        }
    }

    pub fn currency(
        from: impl Into<String>,
        to: impl Into<String>,
        input_value: f64,
        result_value: DisplayValue,
        rate: Option<f64>,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        let title = format!("{} {} → {} {}", format_number(input_value), from, result_value, to);
        Self {
            kind: EntryKind::Currency { rate },
            from,
            to,
            input_value,
            result_value,
            title,
            timestamp: Utc::now(),
        }
    }
}

/// Inputs needed to re-run a past conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayRequest {
    Unit {
        category: Category,
        from: String,
        to: String,
        value: f64,
    },
    Currency {
        from: String,
        to: String,
        amount: f64,
    },
}
