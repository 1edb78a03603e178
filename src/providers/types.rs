//! Provider response shapes and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::AuditError;

/// Exchange rate between two currencies at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateResponse {
    pub source_currency: String,
    pub target_currency: String,
    pub exchange_rate: f64,
    /// RFC 3339 time the rate was fetched (not the provider's quote time).
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_margin: Option<f64>,
}

/// Geolocation data for an IP address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationResponse {
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub isp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Errors that can occur while calling a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Outbound HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    /// Configured base URL cannot carry path segments.
    #[error("invalid provider URL '{0}'")]
    InvalidUrl(String),

    /// Request could not be sent or the body could not be read.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}")]
    Upstream {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    /// Provider body did not have the expected shape.
    #[error("{provider} returned an unexpected payload: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// Target currency is absent from the provider's rate table.
    #[error("currency '{0}' not found in provider rate table")]
    CurrencyNotFound(String),

    /// Geolocation provider reported a failed lookup.
    #[error("geolocation lookup failed: {0}")]
    LookupFailed(String),

    /// Audit row could not be written.
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "client",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream",
            Self::Decode { .. } => "decode",
            Self::CurrencyNotFound(_) => "currency_not_found",
            Self::LookupFailed(_) => "lookup_failed",
            Self::Audit(_) => "audit",
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
