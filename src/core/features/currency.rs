//! Currency conversion through an exchange-rate gateway
//!
//! `CurrencyGateway` is the seam: `ProxyGateway` asks a pass-through HTTP
//! endpoint, `service::DirectGateway` computes the same answer from a rate feed.

pub mod service;
pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::core::features::unit_converter::DISPLAY_DECIMALS;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::DisplayValue;

use self::types::{parse_gateway_body, GatewayResponse, RateQuery};

#[async_trait]
pub trait CurrencyGateway: Send + Sync {
    /// Convert `query.amount` from `query.from` to `query.to`
    async fn convert(&self, query: &RateQuery) -> AppResult<GatewayResponse>;
}

/// Client for `GET {base_url}/api/convert-currency?from=&to=&amount=`
pub struct ProxyGateway {
    http: Client,
    base_url: String,
}

impl ProxyGateway {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("unit-converter/currency")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/convert-currency", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CurrencyGateway for ProxyGateway {
    async fn convert(&self, query: &RateQuery) -> AppResult<GatewayResponse> {
        let amount = query.amount.to_string();
        let url = self.endpoint();
        eprintln!("[Currency] GET {} from={} to={} amount={}", url, query.from, query.to, amount);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("from", query.from.as_str()),
                ("to", query.to.as_str()),
                ("amount", amount.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status_ok = resp.status().is_success();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("Invalid response: {}", e)))?;

        parse_gateway_body(status_ok, body)
    }
}

/// Round a converted amount for display and history
pub fn round_converted(value: Decimal) -> DisplayValue {
    let rounded = value.round_dp_with_strategy(DISPLAY_DECIMALS as u32, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_f64() {
        Some(v) if v.is_finite() => DisplayValue::Value(v),
        _ => DisplayValue::NotAvailable,
    }
}
