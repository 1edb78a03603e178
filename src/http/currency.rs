use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::providers::ExchangeRateResponse;

#[derive(Debug, Deserialize)]
pub struct ExchangeRateQuery {
    pub source_currency: String,
    pub target_currency: String,
}

/// `GET /currency/exchange-rate`
pub async fn get_exchange_rate(
    State(state): State<AppState>,
    query: Result<Query<ExchangeRateQuery>, QueryRejection>,
) -> Result<Json<ExchangeRateResponse>, ApiError> {
    let Query(query) = query?;

    let rate = state
        .exchange_rates
        .fetch(&query.source_currency, &query.target_currency)
        .await?;

    tracing::info!(
        source = %rate.source_currency,
        target = %rate.target_currency,
        rate = rate.exchange_rate,
        "Exchange rate fetched"
    );
    Ok(Json(rate))
}
