//! QR code generation subsystem.
//!
//! # Data Flow
//! ```text
//! GenerateQrRequest (content, size, error_correction, border)
//!     → params.rs (EC level lookup, box size, border)
//!     → render.rs (encode symbol, draw PNG, base64)
//!     → QrCodeResponse (success or folded failure)
//! ```
//!
//! # Design Decisions
//! - Failures never leave this module as errors; they become
//!   `success = false` responses carrying the reason.
//! - `encoding` is accepted for API compatibility and ignored.

pub mod params;
pub mod render;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use params::QrParams;

/// Errors raised while normalizing parameters or rendering.
#[derive(Debug, Error)]
pub enum QrError {
    /// Size descriptor is not of the form `WIDTHxHEIGHT`.
    #[error("invalid size '{0}': expected WIDTHxHEIGHT with positive integer dimensions")]
    InvalidSize(String),

    /// Border width is negative.
    #[error("invalid border {0}: must not be negative")]
    InvalidBorder(i64),

    /// Requested size yields a module smaller than one pixel.
    #[error("size too small: each dimension must be at least 10 pixels")]
    BoxTooSmall,

    /// Rendered image would exceed the allowed dimensions.
    #[error("requested image exceeds the maximum of {max}x{max} pixels")]
    ImageTooLarge { max: u32 },

    /// Content could not be encoded as a QR symbol.
    #[error("failed to encode content: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// PNG encoding failed.
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Inbound parameters of a QR generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQrRequest {
    /// Data to encode (URL, text, ...).
    pub content: String,
    /// Requested image size, e.g. `"250x250"`.
    pub size: String,
    /// Content encoding hint. Accepted but not used by the renderer.
    #[serde(default)]
    pub encoding: Option<String>,
    /// One of `L`, `M`, `Q`, `H`.
    #[serde(default)]
    pub error_correction: Option<String>,
    /// Quiet-zone width in modules.
    #[serde(default)]
    pub border: Option<i64>,
}

/// Result of a QR generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCodeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Base64-encoded PNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_image: Option<String>,
}

impl QrCodeResponse {
    pub fn success(image: String) -> Self {
        Self {
            success: true,
            message: None,
            qr_code_image: Some(image),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            qr_code_image: None,
        }
    }
}

/// Generate a QR code, folding every failure into the response.
pub fn generate_qr_code(request: &GenerateQrRequest) -> QrCodeResponse {
    let result = QrParams::normalize(
        &request.size,
        request.error_correction.as_deref(),
        request.border,
    )
    .and_then(|params| render::render_png_base64(&request.content, &params));

    match result {
        Ok(image) => QrCodeResponse::success(image),
        Err(e) => {
            tracing::warn!(size = %request.size, error = %e, "QR generation failed");
            QrCodeResponse::failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, size: &str) -> GenerateQrRequest {
        GenerateQrRequest {
            content: content.to_string(),
            size: size.to_string(),
            encoding: None,
            error_correction: None,
            border: None,
        }
    }

    #[test]
    fn test_generate_hello() {
        let res = generate_qr_code(&request("hello", "250x250"));
        assert!(res.success);
        assert!(res.message.is_none());
        assert!(!res.qr_code_image.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_size_is_folded() {
        let res = generate_qr_code(&request("hello", "abc"));
        assert!(!res.success);
        assert!(res.qr_code_image.is_none());
        assert!(res.message.unwrap().contains("invalid size 'abc'"));
    }

    #[test]
    fn test_tiny_size_is_folded() {
        let res = generate_qr_code(&request("hello", "5x5"));
        assert!(!res.success);
        assert!(res.message.unwrap().contains("too small"));
    }

    #[test]
    fn test_oversized_dimension_uses_smaller_side() {
        let res = generate_qr_code(&request("hello", "5000000000x250"));
        assert!(res.success, "unexpected failure: {:?}", res.message);
    }

    #[test]
    fn test_huge_size_is_folded() {
        let res = generate_qr_code(&request("hello", "5000000000x5000000000"));
        assert!(!res.success);
        assert!(res.message.unwrap().contains("exceeds the maximum"));
    }

    #[test]
    fn test_negative_border_is_folded() {
        let mut req = request("hello", "250x250");
        req.border = Some(-1);
        let res = generate_qr_code(&req);
        assert!(!res.success);
        assert!(res.message.unwrap().contains("invalid border -1"));
    }

    #[test]
    fn test_encoding_is_ignored() {
        let mut with_encoding = request("hello", "100x100");
        with_encoding.encoding = Some("binary".to_string());
        assert_eq!(
            generate_qr_code(&with_encoding),
            generate_qr_code(&request("hello", "100x100"))
        );
    }

    #[test]
    fn test_response_serialization_omits_absent_fields() {
        let json = serde_json::to_value(QrCodeResponse::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "boom"}));

        let json = serde_json::to_value(QrCodeResponse::success("aGk=".into())).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "qr_code_image": "aGk="}));
    }
}
