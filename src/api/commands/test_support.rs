//! Stub gateways and state for command tests

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::features::currency::types::{GatewayResponse, RateQuery};
use crate::core::features::currency::CurrencyGateway;
use crate::core::storage::InMemoryStore;
use crate::shared::error::{AppError, AppResult};
use crate::state::AppState;

/// Answers every query with a fixed rate and counts calls
pub(crate) struct FixedRateGateway {
    pub rate: Decimal,
    pub calls: AtomicUsize,
}

impl FixedRateGateway {
    pub fn new(rate: &str) -> Self {
        Self {
            rate: Decimal::from_str(rate).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CurrencyGateway for FixedRateGateway {
    async fn convert(&self, query: &RateQuery) -> AppResult<GatewayResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayResponse {
            amount: query.amount,
            from: query.from.clone(),
            to: query.to.clone(),
            rate: self.rate,
            converted: query.amount * self.rate,
        })
    }
}

/// Always fails the way a non-success response does
pub(crate) struct FailingGateway;

#[async_trait]
impl CurrencyGateway for FailingGateway {
    async fn convert(&self, _query: &RateQuery) -> AppResult<GatewayResponse> {
        Err(AppError::Gateway("\"fetch_failed\"".to_string()))
    }
}

pub(crate) fn state_with(gateway: Arc<dyn CurrencyGateway>) -> AppState {
    AppState::new(Arc::new(InMemoryStore::new()), gateway)
}
