//! Conversion command module
//!
//! Validates input, runs the conversion and records successful results in
//! history. Nothing is recorded when validation or the gateway fails.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::core::features::currency::round_converted;
use crate::core::features::currency::types::RateQuery;
use crate::core::features::unit_converter::{self, category_of, round_display};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{
    format_number, ConvertCurrencyRequest, ConvertCurrencyResponse, ConvertUnitsRequest,
    ConvertUnitsResponse, HistoryEntry,
};
use crate::state::AppState;

/// Convert between two units of one category
pub async fn convert_units_command(
    state: &AppState,
    request: ConvertUnitsRequest,
) -> AppResult<ConvertUnitsResponse> {
    if !request.value.is_finite() {
        return Err(AppError::Validation("Enter a numeric value".to_string()));
    }

    let from = request.from.trim().to_string();
    let to = request.to.trim().to_string();

    let category = match request.category {
        Some(category) => category,
        None => category_of(&from)
            .ok_or_else(|| AppError::Validation(format!("Unknown unit: {}", from)))?,
    };

    let raw = unit_converter::convert_value(category, request.value, &from, &to)?;
    let result = round_display(raw);
    let display = format!("{} {} = {} {}", format_number(request.value), from, result, to);

    state
        .history
        .append(HistoryEntry::unit(category, from.clone(), to.clone(), request.value, result));

    Ok(ConvertUnitsResponse {
        category,
        value: request.value,
        from,
        to,
        result,
        display,
    })
}

/// Convert an amount between two currencies via the configured gateway
pub async fn convert_currency_command(
    state: &AppState,
    request: ConvertCurrencyRequest,
) -> AppResult<ConvertCurrencyResponse> {
    let from = request.from.trim().to_ascii_uppercase();
    let to = request.to.trim().to_ascii_uppercase();

    if from.is_empty() || to.is_empty() {
        return Err(AppError::Validation("Enter currency codes (e.g. USD, INR)".to_string()));
    }
    if !request.amount.is_finite() {
        return Err(AppError::Validation("Enter a numeric amount".to_string()));
    }
    if request.amount < 0.0 {
        return Err(AppError::Validation("Amount cannot be negative".to_string()));
    }

    let amount = Decimal::try_from(request.amount).map_err(|_| {
        AppError::Validation(format!("Amount too large (maximum {})", Decimal::MAX))
    })?;

    let reply = state.gateway.convert(&RateQuery::new(amount, &from, &to)).await?;

    let converted = round_converted(reply.converted);
    let display = format!(
        "{} {} = {} {} (rate: {})",
        reply.amount.normalize(),
        reply.from,
        converted,
        reply.to,
        reply.rate.normalize()
    );

    state.history.append(HistoryEntry::currency(
        from.clone(),
        to.clone(),
        request.amount,
        converted,
        reply.rate.to_f64(),
    ));

    Ok(ConvertCurrencyResponse {
        amount: request.amount,
        from,
        to,
        rate: reply.rate,
        converted,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::commands::test_support::{state_with, FailingGateway, FixedRateGateway};
    use crate::shared::types::{Category, DisplayValue, EntryKind};
    use std::sync::Arc;

    fn unit_request(category: Option<Category>, value: f64, from: &str, to: &str) -> ConvertUnitsRequest {
        ConvertUnitsRequest {
            category,
            value,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[tokio::test]
    async fn unit_conversion_is_recorded() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));

        let resp = convert_units_command(&state, unit_request(Some(Category::Length), 12.0, "meter", "foot"))
            .await
            .unwrap();

        assert_eq!(resp.result, DisplayValue::Value(39.37008));
        assert_eq!(resp.display, "12 meter = 39.37008 foot");

        let entries = state.history.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "12 meter → 39.37008 foot");
        assert_eq!(entries[0].kind, EntryKind::Unit { category: Category::Length });
    }

    #[tokio::test]
    async fn category_is_inferred_from_the_source_unit() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));

        let resp = convert_units_command(&state, unit_request(None, 100.0, "celsius", "fahrenheit"))
            .await
            .unwrap();

        assert_eq!(resp.category, Category::Temperature);
        assert_eq!(resp.result, DisplayValue::Value(212.0));
    }

    #[tokio::test]
    async fn invalid_unit_input_records_nothing() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));

        assert!(convert_units_command(&state, unit_request(None, f64::NAN, "meter", "foot")).await.is_err());
        assert!(convert_units_command(&state, unit_request(None, 1.0, "furlong", "foot")).await.is_err());
        assert!(convert_units_command(&state, unit_request(Some(Category::Length), 1.0, "meter", "gram"))
            .await
            .is_err());
        assert!(
            convert_units_command(&state, unit_request(Some(Category::Temperature), 1.0, "celsius", "rankine"))
                .await
                .is_err()
        );

        assert!(state.history.load().is_empty());
    }

    #[tokio::test]
    async fn currency_conversion_is_recorded_with_rate() {
        let gateway = Arc::new(FixedRateGateway::new("83.05"));
        let state = state_with(gateway.clone());

        let resp = convert_currency_command(
            &state,
            ConvertCurrencyRequest { amount: 10.0, from: "usd".to_string(), to: " inr".to_string() },
        )
        .await
        .unwrap();

        assert_eq!(resp.from, "USD");
        assert_eq!(resp.to, "INR");
        assert_eq!(resp.converted, DisplayValue::Value(830.5));
        assert_eq!(resp.display, "10 USD = 830.5 INR (rate: 83.05)");
        assert_eq!(gateway.calls(), 1);

        let entries = state.history.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Currency { rate: Some(83.05) });
        assert_eq!(entries[0].title, "10 USD → 830.5 INR");
        assert_eq!(entries[0].input_value, 10.0);
    }

    #[tokio::test]
    async fn invalid_currency_input_never_reaches_the_gateway() {
        let gateway = Arc::new(FixedRateGateway::new("1"));
        let state = state_with(gateway.clone());

        for (amount, from, to) in [
            (1.0, "", "INR"),
            (1.0, "USD", "  "),
            (f64::NAN, "USD", "INR"),
            (-5.0, "USD", "INR"),
        ] {
            let request = ConvertCurrencyRequest { amount, from: from.to_string(), to: to.to_string() };
            let err = convert_currency_command(&state, request).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        assert_eq!(gateway.calls(), 0);
        assert!(state.history.load().is_empty());
    }

    #[tokio::test]
    async fn amount_beyond_decimal_range_is_too_large() {
        let gateway = Arc::new(FixedRateGateway::new("83.05"));
        let state = state_with(gateway.clone());

        let err = convert_currency_command(
            &state,
            ConvertCurrencyRequest { amount: 1e29, from: "USD".to_string(), to: "INR".to_string() },
        )
        .await
        .unwrap_err();

        assert!(matches!(&err, AppError::Validation(msg) if msg.starts_with("Amount too large")));
        assert_eq!(gateway.calls(), 0);
        assert!(state.history.load().is_empty());

        let resp = convert_currency_command(
            &state,
            ConvertCurrencyRequest { amount: 0.1, from: "USD".to_string(), to: "INR".to_string() },
        )
        .await
        .unwrap();
        assert_eq!(resp.display, "0.1 USD = 8.305 INR (rate: 83.05)");
    }

    #[tokio::test]
    async fn tiny_values_display_in_exponent_form() {
        let state = state_with(Arc::new(FixedRateGateway::new("1")));

        let resp = convert_units_command(&state, unit_request(Some(Category::Length), 1e-7, "meter", "meter"))
            .await
            .unwrap();

        assert_eq!(resp.display, "1e-7 meter = 0 meter");
    }

    #[tokio::test]
    async fn gateway_failure_records_nothing() {
        let state = state_with(Arc::new(FailingGateway));

        let err = convert_currency_command(
            &state,
            ConvertCurrencyRequest { amount: 1.0, from: "USD".to_string(), to: "INR".to_string() },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Gateway(_)));
        assert!(state.history.load().is_empty());
    }
}
