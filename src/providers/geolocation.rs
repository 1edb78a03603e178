//! IP geolocation provider client.
//!
//! Every lookup that gets past the upstream status check leaves exactly one
//! row in the audit log, written before the payload is mapped. Transport
//! errors and non-2xx answers return early and are not audited.

use serde::Deserialize;
use url::Url;

use crate::audit::{AuditLog, AuditRecord, RequestStatus};
use crate::observability::metrics;
use crate::providers::types::{GeolocationResponse, ProviderError, ProviderResult};
use crate::providers::{join_path, parse_base};

const PROVIDER: &str = "geolocation";

/// Endpoint name stamped on audit rows.
pub const AUDIT_ENDPOINT: &str = "get_ip_geolocation";

/// Fields picked from an ip-api style payload.
#[derive(Debug, Deserialize)]
struct IpApiPayload {
    country: String,
    #[serde(rename = "regionName")]
    region_name: String,
    city: String,
    lat: f64,
    lon: f64,
    isp: String,
    #[serde(default)]
    org: Option<String>,
}

impl From<IpApiPayload> for GeolocationResponse {
    fn from(p: IpApiPayload) -> Self {
        Self {
            country: p.country,
            region: p.region_name,
            city: p.city,
            latitude: p.lat,
            longitude: p.lon,
            isp: p.isp,
            organization: p.org,
        }
    }
}

/// Client for an ip-api compatible geolocation provider.
#[derive(Debug, Clone)]
pub struct GeolocationClient {
    http: reqwest::Client,
    base_url: Url,
    fields: u64,
    user_id: String,
}

impl GeolocationClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        fields: u64,
        user_id: impl Into<String>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            http,
            base_url: parse_base(base_url)?,
            fields,
            user_id: user_id.into(),
        })
    }

    /// Look up `ip`, recording the provider response in `audit`.
    pub async fn lookup(&self, ip: &str, audit: &AuditLog) -> ProviderResult<GeolocationResponse> {
        let result = self.lookup_inner(ip, audit).await;
        match &result {
            Ok(_) => metrics::record_provider_call(PROVIDER, "ok"),
            Err(e) => metrics::record_provider_call(PROVIDER, e.kind()),
        }
        result
    }

    async fn lookup_inner(&self, ip: &str, audit: &AuditLog) -> ProviderResult<GeolocationResponse> {
        let mut url = join_path(&self.base_url, &[ip])?;
        url.query_pairs_mut()
            .append_pair("fields", &self.fields.to_string());
        tracing::debug!(%url, ip, "Looking up IP geolocation");

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
            tracing::warn!(%status, ip, "Geolocation provider returned an error status");
            return Err(ProviderError::Upstream {
                provider: PROVIDER,
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| ProviderError::Transport {
            provider: PROVIDER,
            source,
        })?;
        let data: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        audit
            .record(&AuditRecord {
                user_id: self.user_id.clone(),
                endpoint: AUDIT_ENDPOINT.to_string(),
                status: RequestStatus::from_http_status(status),
                response: data.to_string(),
            })
            .await?;

        if data.get("status").and_then(|s| s.as_str()) == Some("fail") {
            let message = data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(ProviderError::LookupFailed(message.to_string()));
        }

        let payload: IpApiPayload =
            serde_json::from_value(data).map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(payload.into())
    }
}
