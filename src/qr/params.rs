//! Mapping of raw request fields onto QR rendering parameters.
//!
//! Everything here is pure: no rendering happens until the normalized
//! [`QrParams`] reach the renderer.

use qrcode::EcLevel;

use crate::qr::QrError;

/// Border width, in modules, used when the request supplies none (or zero).
pub const DEFAULT_BORDER: u32 = 4;

/// Pixels of requested image size per QR module.
const PIXELS_PER_BOX: u32 = 10;

/// Normalized rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrParams {
    pub ec_level: EcLevel,
    /// Pixel width of a single module.
    pub box_size: u32,
    /// Quiet-zone width in modules.
    pub border: u32,
}

impl QrParams {
    /// Derive rendering parameters from the raw request fields.
    pub fn normalize(
        size: &str,
        error_correction: Option<&str>,
        border: Option<i64>,
    ) -> Result<Self, QrError> {
        Ok(Self {
            ec_level: error_correction_level(error_correction),
            box_size: box_size(size)?,
            border: border_width(border)?,
        })
    }
}

/// Map an error-correction code onto a level. Unknown or missing codes fall
/// back to [`EcLevel::M`].
pub fn error_correction_level(code: Option<&str>) -> EcLevel {
    match code {
        Some("L") => EcLevel::L,
        Some("Q") => EcLevel::Q,
        Some("H") => EcLevel::H,
        _ => EcLevel::M,
    }
}

/// Derive the module size from a `WIDTHxHEIGHT` descriptor:
/// `min(width, height) / 10`.
///
/// Dimensions are not capped here; a box size too large to render saturates
/// and is rejected by the renderer.
pub fn box_size(size: &str) -> Result<u32, QrError> {
    let invalid = || QrError::InvalidSize(size.to_string());

    let (width, height) = size.split_once('x').ok_or_else(invalid)?;
    if height.contains('x') {
        return Err(invalid());
    }

    let width: u64 = width.trim().parse().map_err(|_| invalid())?;
    let height: u64 = height.trim().parse().map_err(|_| invalid())?;

    let boxes = width.min(height) / u64::from(PIXELS_PER_BOX);
    Ok(u32::try_from(boxes).unwrap_or(u32::MAX))
}

/// Zero counts as "not supplied". Negative widths are rejected.
pub fn border_width(border: Option<i64>) -> Result<u32, QrError> {
    match border {
        None | Some(0) => Ok(DEFAULT_BORDER),
        Some(n) if n < 0 => Err(QrError::InvalidBorder(n)),
        Some(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_size_uses_smaller_dimension() {
        assert_eq!(box_size("250x250").unwrap(), 25);
        assert_eq!(box_size("300x120").unwrap(), 12);
        assert_eq!(box_size("99x1000").unwrap(), 9);
        assert_eq!(box_size(" 200 x 400 ").unwrap(), 20);
    }

    #[test]
    fn test_box_size_rounds_down_to_zero() {
        assert_eq!(box_size("9x9").unwrap(), 0);
        assert_eq!(box_size("1x500").unwrap(), 0);
    }

    #[test]
    fn test_box_size_property() {
        for w in (1..2000).step_by(37) {
            for h in (1..2000).step_by(53) {
                let size = format!("{w}x{h}");
                assert_eq!(box_size(&size).unwrap(), w.min(h) / 10);
            }
        }
    }

    #[test]
    fn test_box_size_accepts_dimensions_beyond_u32() {
        assert_eq!(box_size("5000000000x250").unwrap(), 25);
        assert_eq!(box_size("250x5000000000").unwrap(), 25);
        assert_eq!(box_size("50000000000x50000000000").unwrap(), u32::MAX);
        assert!(box_size("99999999999999999999999x250").is_err());
    }

    #[test]
    fn test_malformed_sizes_are_rejected() {
        for size in ["abc", "250", "250x", "x250", "250x250x250", "-5x10", "2.5x10", ""] {
            let err = box_size(size).unwrap_err();
            assert!(
                matches!(err, QrError::InvalidSize(ref s) if s == size),
                "expected InvalidSize for {size:?}"
            );
        }
    }

    #[test]
    fn test_error_correction_lookup() {
        assert_eq!(error_correction_level(Some("L")), EcLevel::L);
        assert_eq!(error_correction_level(Some("M")), EcLevel::M);
        assert_eq!(error_correction_level(Some("Q")), EcLevel::Q);
        assert_eq!(error_correction_level(Some("H")), EcLevel::H);
    }

    #[test]
    fn test_error_correction_falls_back_to_medium() {
        assert_eq!(error_correction_level(None), EcLevel::M);
        assert_eq!(error_correction_level(Some("h")), EcLevel::M);
        assert_eq!(error_correction_level(Some("X")), EcLevel::M);
        assert_eq!(error_correction_level(Some("")), EcLevel::M);
    }

    #[test]
    fn test_border_defaults() {
        assert_eq!(border_width(None).unwrap(), DEFAULT_BORDER);
        assert_eq!(border_width(Some(0)).unwrap(), DEFAULT_BORDER);
        assert_eq!(border_width(Some(1)).unwrap(), 1);
        assert_eq!(border_width(Some(10)).unwrap(), 10);
        assert_eq!(border_width(Some(i64::MAX)).unwrap(), u32::MAX);
    }

    #[test]
    fn test_negative_border_is_rejected() {
        assert!(matches!(
            border_width(Some(-1)),
            Err(QrError::InvalidBorder(-1))
        ));
        assert!(QrParams::normalize("250x250", None, Some(-3)).is_err());
    }

    #[test]
    fn test_normalize() {
        let params = QrParams::normalize("250x250", Some("H"), None).unwrap();
        assert_eq!(
            params,
            QrParams {
                ec_level: EcLevel::H,
                box_size: 25,
                border: 4,
            }
        );

        assert!(QrParams::normalize("abc", Some("H"), Some(2)).is_err());
    }
}
