use std::collections::HashMap;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};

/// Currencies offered in selectors, in display order
pub const CURRENCIES: [&str; 20] = [
    "USD", "EUR", "INR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "SGD",
    "NZD", "KRW", "SEK", "NOK", "ZAR", "AED", "SAR", "HKD", "THB", "IDR",
];

/// Query sent to a rate gateway.
///
/// Codes are trimmed and upper-cased on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuery {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
}

impl RateQuery {
    pub fn new(amount: Decimal, from: &str, to: &str) -> Self {
        Self {
            amount,
            from: from.trim().to_ascii_uppercase(),
            to: to.trim().to_ascii_uppercase(),
        }
    }
}

/// Successful gateway payload.
///
/// On the wire: `{"success":true,"from":"USD","to":"INR","amount":10,"rate":83.05,"converted":830.5}`.
/// Decimal fields accept either JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    pub converted: Decimal,
}

/// Network payload from the exchangerate-api `latest/{base}` endpoint.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    pub result: String,
    #[serde(default, deserialize_with = "deserialize_rates")]
    pub conversion_rates: HashMap<String, Decimal>,
}

/// Rates for one base currency and when they were fetched
#[derive(Debug, Clone)]
pub struct CachedRates {
    pub fetched_at: Instant,
    pub rates: HashMap<String, Decimal>,
}

/// Interpret a gateway body. `status_ok` is whether the HTTP status was 2xx.
pub fn parse_gateway_body(status_ok: bool, body: Value) -> AppResult<GatewayResponse> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !status_ok || !success {
        let detail = body
            .get("error")
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(AppError::Gateway(detail));
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::Gateway(format!("Invalid response: {}", e)))
}

// ---- Serde helpers ----

fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
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
        NumOrString::Num(n) => Decimal::try_from(n).map_err(serde::de::Error::custom),
        NumOrString::Str(s) => Decimal::from_str_exact(&s).map_err(serde::de::Error::custom),
    }
}

fn deserialize_rates<'de, D>(deserializer: D) -> Result<HashMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(code, value)| {
            let dec = match value {
                Value::Number(num) => num
                    .as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .ok_or_else(|| serde::de::Error::custom("invalid numeric rate"))?,
                Value::String(s) => Decimal::from_str_exact(&s)
                    .map_err(|e| serde::de::Error::custom(format!("invalid rate string: {}", e)))?,
                _ => return Err(serde::de::Error::custom("unsupported rate type")),
            };
            Ok((code.to_uppercase(), dec))
        })
        .collect()
}
