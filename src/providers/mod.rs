//! Outbound provider clients.
//!
//! # Data Flow
//! ```text
//! handler
//!     → exchange_rate.rs / geolocation.rs (build URL, single GET)
//!     → status check (non-2xx → ProviderError::Upstream)
//!     → decode JSON, pick fields
//!     → typed response
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client` per process (pooled connections)
//! - No retries, no caching, no timeouts beyond transport defaults

pub mod exchange_rate;
pub mod geolocation;
pub mod types;

use url::Url;

use crate::config::ProviderConfig;

pub use exchange_rate::ExchangeRateClient;
pub use geolocation::GeolocationClient;
pub use types::{ExchangeRateResponse, GeolocationResponse, ProviderError, ProviderResult};

/// Build the HTTP client shared by all providers.
pub fn build_http_client(config: &ProviderConfig) -> ProviderResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder.build().map_err(ProviderError::Client)
}

fn parse_base(base: &str) -> ProviderResult<Url> {
    let url = Url::parse(base).map_err(|_| ProviderError::InvalidUrl(base.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ProviderError::InvalidUrl(base.to_string()));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
fn join_path(base: &Url, segments: &[&str]) -> ProviderResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
