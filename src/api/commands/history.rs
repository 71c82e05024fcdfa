//! History command module
//!
//! Lists, clears and replays recorded conversions. Replay re-runs the
//! conversion through the normal command path, which records a fresh entry.

use serde::Serialize;

use crate::core::history;
use crate::shared::error::AppResult;
use crate::shared::types::{
    ConvertCurrencyRequest, ConvertCurrencyResponse, ConvertUnitsRequest, ConvertUnitsResponse,
    HistoryEntry, ReplayRequest,
};
use crate::state::AppState;

use super::convert::{convert_currency_command, convert_units_command};

/// Result of re-running a past conversion
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayOutcome {
    Unit(ConvertUnitsResponse),
    Currency(ConvertCurrencyResponse),
}

impl ReplayOutcome {
    pub fn display(&self) -> &str {
        match self {
            ReplayOutcome::Unit(resp) => &resp.display,
            ReplayOutcome::Currency(resp) => &resp.display,
        }
    }
}

pub async fn get_history_command(state: &AppState) -> AppResult<Vec<HistoryEntry>> {
    Ok(state.history.load())
}

pub async fn clear_history_command(state: &AppState) -> AppResult<()> {
    state.history.clear();
    eprintln!("[HistoryLog] Cleared all conversions");
    Ok(())
}

/// Re-run the conversion at `index`; `None` when there is no such entry
pub async fn replay_command(state: &AppState, index: usize) -> AppResult<Option<ReplayOutcome>> {
    let entries = state.history.load();

    let Some(request) = history::replay(index, &entries) else {
        eprintln!("[HistoryLog] No entry at index {} ({} recorded)", index, entries.len());
        return Ok(None);
    };

    let outcome = match request {
        ReplayRequest::Unit { category, from, to, value } => {
            let request = ConvertUnitsRequest {
                category: Some(category),
                value,
                from,
                to,
            };
            ReplayOutcome::Unit(convert_units_command(state, request).await?)
        }
        ReplayRequest::Currency { from, to, amount } => {
            let request = ConvertCurrencyRequest { amount, from, to };
            ReplayOutcome::Currency(convert_currency_command(state, request).await?)
        }
    };

    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::commands::test_support::{state_with, FixedRateGateway};
    use crate::core::history::MAX_HISTORY_SIZE;
    use crate::shared::types::{Category, DisplayValue, EntryKind};
    use std::sync::Arc;

    fn unit_request(value: f64) -> ConvertUnitsRequest {
        ConvertUnitsRequest {
            category: Some(Category::Length),
            value,
            from: "meter".to_string(),
            to: "foot".to_string(),
        }
    }

    #[tokio::test]
    async fn replay_reruns_and_records_at_the_front() {
        let state = state_with(Arc::new(FixedRateGateway::new("83.05")));
        convert_units_command(&state, unit_request(12.0)).await.unwrap();
        convert_currency_command(
            &state,
            ConvertCurrencyRequest { amount: 10.0, from: "USD".to_string(), to: "INR".to_string() },
        )
        .await
        .unwrap();

        // Index 1 is the older unit conversion
        let outcome = replay_command(&state, 1).await.unwrap().unwrap();
        assert_eq!(outcome.display(), "12 meter = 39.37008 foot");

        let entries = get_history_command(&state).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Unit { category: Category::Length });
        assert_eq!(entries[0].input_value, 12.0);
        assert_eq!(entries[1].kind, EntryKind::Currency { rate: Some(83.05) });
        assert_eq!(entries[2].input_value, 12.0);
    }

    #[tokio::test]
    async fn currency_replay_matches_the_recorded_request() {
        let gateway = Arc::new(FixedRateGateway::new("83.05"));
        let state = state_with(gateway.clone());
        state.history.append(HistoryEntry::currency("USD", "INR", 10.0, DisplayValue::Value(830.5), Some(83.05)));

        let entries = state.history.load();
        assert_eq!(
            history::replay(0, &entries),
            Some(ReplayRequest::Currency { from: "USD".to_string(), to: "INR".to_string(), amount: 10.0 })
        );

        let outcome = replay_command(&state, 0).await.unwrap().unwrap();
        match outcome {
            ReplayOutcome::Currency(resp) => {
                assert_eq!(resp.amount, 10.0);
                assert_eq!(resp.converted, DisplayValue::Value(830.5));
            }
            other => panic!("expected a currency outcome, got {:?}", other),
        }
        assert_eq!(gateway.calls(), 1);
        assert_eq!(state.history.len(), 2);
    }

    #[tokio::test]
    async fn out_of_range_replay_is_a_no_op() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));
        convert_units_command(&state, unit_request(1.0)).await.unwrap();

        assert!(replay_command(&state, 5).await.unwrap().is_none());
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn replay_keeps_the_log_capped() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));
        for i in 0..MAX_HISTORY_SIZE {
            convert_units_command(&state, unit_request(i as f64)).await.unwrap();
        }

        let before = state.history.load();
        replay_command(&state, MAX_HISTORY_SIZE - 1).await.unwrap().unwrap();
        let after = state.history.load();

        assert_eq!(after.len(), MAX_HISTORY_SIZE);
        assert_eq!(after[0].input_value, before[MAX_HISTORY_SIZE - 1].input_value);
        // Everything else shifted back by one, the oldest fell off
        assert_eq!(&after[1..], &before[..MAX_HISTORY_SIZE - 1]);
    }

    #[tokio::test]
    async fn clear_empties_history() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));
        convert_units_command(&state, unit_request(1.0)).await.unwrap();

        clear_history_command(&state).await.unwrap();
        assert!(get_history_command(&state).await.unwrap().is_empty());
    }
}
