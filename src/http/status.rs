use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::audit::AuditEntry;
use crate::http::response::ApiError;
use crate::http::server::AppState;

const DEFAULT_AUDIT_LIMIT: u32 = 20;
const MAX_AUDIT_LIMIT: u32 = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<u32>,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /audit/recent`
pub async fn recent_audit(
    State(state): State<AppState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);

    let entries = state.audit.recent(limit).await?;
    Ok(Json(entries))
}
