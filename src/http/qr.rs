use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Json;

use crate::http::response::ApiError;
use crate::qr::{self, GenerateQrRequest, QrCodeResponse};

/// `POST /qr-code/generate`
///
/// Rendering failures come back as `success: false` with status 200; only
/// missing parameters or a crashed render task produce an error status.
pub async fn generate_qr_code(
    query: Result<Query<GenerateQrRequest>, QueryRejection>,
) -> Result<Json<QrCodeResponse>, ApiError> {
    let Query(request) = query?;

    tracing::debug!(
        size = %request.size,
        error_correction = ?request.error_correction,
        border = ?request.border,
        "Generating QR code"
    );

    // PNG encoding is CPU-bound.
    let response = tokio::task::spawn_blocking(move || qr::generate_qr_code(&request)).await?;
    Ok(Json(response))
}
