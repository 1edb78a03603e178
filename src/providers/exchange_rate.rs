//! Exchange-rate provider client.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use url::Url;

use crate::observability::metrics;
use crate::providers::types::{ExchangeRateResponse, ProviderError, ProviderResult};
use crate::providers::{join_path, parse_base};

const PROVIDER: &str = "exchange-rate";

/// Subset of the provider's `/latest/{base}` payload.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
    #[serde(default)]
    conversion_margin: Option<f64>,
}

/// Client for an exchangerate-api compatible rates provider.
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ExchangeRateClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> ProviderResult<Self> {
        Ok(Self {
            http,
            base_url: parse_base(base_url)?,
        })
    }

    /// Fetch the current `source` → `target` rate.
    pub async fn fetch(&self, source: &str, target: &str) -> ProviderResult<ExchangeRateResponse> {
        let result = self.fetch_inner(source, target).await;
        match &result {
            Ok(_) => metrics::record_provider_call(PROVIDER, "ok"),
            Err(e) => metrics::record_provider_call(PROVIDER, e.kind()),
        }
        result
    }

    async fn fetch_inner(&self, source: &str, target: &str) -> ProviderResult<ExchangeRateResponse> {
        let url = join_path(&self.base_url, &["latest", source])?;
        tracing::debug!(%url, source, target, "Fetching exchange rates");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, source, "Exchange-rate provider returned an error status");
            return Err(ProviderError::Upstream {
                provider: PROVIDER,
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| ProviderError::Transport {
            provider: PROVIDER,
            source,
        })?;
        let payload: LatestRates =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let exchange_rate = payload
            .rates
            .get(target)
            .copied()
            .ok_or_else(|| ProviderError::CurrencyNotFound(target.to_string()))?;

        Ok(ExchangeRateResponse {
            source_currency: source.to_string(),
            target_currency: target.to_string(),
            exchange_rate,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            conversion_margin: payload.conversion_margin,
        })
    }
}
