use std::{
    collections::HashMap,
    sync::RwLock,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::shared::error::{AppError, AppResult};

use super::types::{CachedRates, GatewayResponse, RateQuery, RatesApiResponse};
use super::CurrencyGateway;

const RATES_ENDPOINT: &str = "https://v6.exchangerate-api.com/v6";

/// How long fetched rates for a base currency are reused
pub const RATES_TTL: Duration = Duration::from_secs(5 * 60);

/// Gateway that computes conversions from the exchangerate-api feed.
///
/// Rates are fetched per base currency and kept in memory for `RATES_TTL`.
pub struct DirectGateway {
    http: Client,
    api_key: String,
    endpoint: String,
    ttl: Duration,
    cache: RwLock<HashMap<String, CachedRates>>,
}

impl DirectGateway {
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("unit-converter/currency")
            .timeout(Duration::from_secs(8))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into().trim().to_string(),
            endpoint: RATES_ENDPOINT.to_string(),
            ttl: RATES_TTL,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Install rates for `base` as if they had just been fetched
    pub fn seed(&self, base: &str, rates: HashMap<String, Decimal>) {
        let entry = CachedRates {
            fetched_at: Instant::now(),
            rates,
        };
        match self.cache.write() {
            Ok(mut cache) => {
                cache.insert(base.to_ascii_uppercase(), entry);
            }
            Err(poisoned) => {
                eprintln!("[Currency] Rate cache poisoned, recovering...");
                poisoned.into_inner().insert(base.to_ascii_uppercase(), entry);
            }
        }
    }

    fn cached_rates(&self, base: &str) -> AppResult<Option<HashMap<String, Decimal>>> {
        let cache = self
            .cache
            .read()
            .map_err(|_| AppError::System("rate cache poisoned".into()))?;

        Ok(cache
            .get(base)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.rates.clone()))
    }

    async fn get_rates(&self, base: &str) -> AppResult<HashMap<String, Decimal>> {
        if let Some(rates) = self.cached_rates(base)? {
            return Ok(rates);
        }

        if self.api_key.is_empty() {
            return Err(AppError::Gateway(
                "No API key configured. Set EXRATE_API_KEY environment variable.".into(),
            ));
        }

        let rates = self.fetch_remote_rates(base).await?;
        self.seed(base, rates.clone());
        Ok(rates)
    }

    async fn fetch_remote_rates(&self, base: &str) -> AppResult<HashMap<String, Decimal>> {
        let url = format!("{}/{}/latest/{}", self.endpoint, self.api_key, base);
        eprintln!("[Currency] Fetching rates for base {}", base);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("fetch_failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "fetch_failed: {}",
                resp.status()
            )));
        }

        let json: RatesApiResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("Invalid response: {}", e)))?;

        if json.result.to_lowercase() != "success" {
            return Err(AppError::Gateway("API returned non-success".into()));
        }

        Ok(json.conversion_rates)
    }
}

#[async_trait]
impl CurrencyGateway for DirectGateway {
    async fn convert(&self, query: &RateQuery) -> AppResult<GatewayResponse> {
        let rates = self.get_rates(&query.from).await?;

        let rate = rates
            .get(&query.to)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("currency '{}' not found", query.to)))?;

        let converted = query
            .amount
            .checked_mul(rate)
            .ok_or_else(|| AppError::Calculation("Multiplication overflow".into()))?;

        Ok(GatewayResponse {
            amount: query.amount,
            from: query.from.clone(),
            to: query.to.clone(),
            rate,
            converted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn usd_rates() -> HashMap<String, Decimal> {
        HashMap::from([
            ("USD".to_string(), Decimal::ONE),
            ("INR".to_string(), Decimal::from_str("83.05").unwrap()),
            ("EUR".to_string(), Decimal::from_str("0.92").unwrap()),
        ])
    }

    #[tokio::test]
    async fn converts_from_seeded_rates() {
        let gateway = DirectGateway::new("").unwrap();
        gateway.seed("USD", usd_rates());

        let resp = gateway
            .convert(&RateQuery::new(Decimal::from(10), "usd", "inr"))
            .await
            .unwrap();

        assert_eq!(resp.from, "USD");
        assert_eq!(resp.to, "INR");
        assert_eq!(resp.rate, Decimal::from_str("83.05").unwrap());
        assert_eq!(resp.converted, Decimal::from_str("830.5").unwrap());
    }

    #[tokio::test]
    async fn unknown_target_is_rejected() {
        let gateway = DirectGateway::new("").unwrap();
        gateway.seed("USD", usd_rates());

        let err = gateway
            .convert(&RateQuery::new(Decimal::ONE, "USD", "XYZ"))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation("currency 'XYZ' not found".to_string()));
    }

    #[tokio::test]
    async fn missing_key_without_cache_is_a_gateway_error() {
        let gateway = DirectGateway::new("   ").unwrap();
        let err = gateway
            .convert(&RateQuery::new(Decimal::ONE, "USD", "INR"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Gateway(msg) if msg.contains("EXRATE_API_KEY")));
    }

    #[tokio::test]
    async fn expired_rates_are_not_reused() {
        let gateway = DirectGateway::new("").unwrap().with_ttl(Duration::ZERO);
        gateway.seed("USD", usd_rates());

        // Expired and no key to refetch with
        let err = gateway
            .convert(&RateQuery::new(Decimal::ONE, "USD", "INR"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Gateway(_)));
    }
}
