use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::providers::GeolocationResponse;

/// `GET /ip-geolocation/{ip}`
pub async fn get_ip_geolocation(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<GeolocationResponse>, ApiError> {
    let Path(ip) = path?;

    let location = state.geolocation.lookup(&ip, &state.audit).await?;

    tracing::info!(ip = %ip, country = %location.country, "IP geolocation resolved");
    Ok(Json(location))
}
