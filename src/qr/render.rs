//! QR symbol rendering to a base64-encoded PNG.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{imageops, ImageBuffer, ImageFormat, Luma};
use qrcode::QrCode;

use crate::qr::params::QrParams;
use crate::qr::QrError;

/// Largest accepted image side, border included.
pub const MAX_IMAGE_SIDE: u32 = 8192;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Encode `content` and return the PNG image as standard base64.
pub fn render_png_base64(content: &str, params: &QrParams) -> Result<String, QrError> {
    let png = render_png(content, params)?;
    Ok(general_purpose::STANDARD.encode(png))
}

/// Encode `content` into PNG bytes.
pub fn render_png(content: &str, params: &QrParams) -> Result<Vec<u8>, QrError> {
    if params.box_size == 0 {
        return Err(QrError::BoxTooSmall);
    }

    let code = QrCode::with_error_correction_level(content.as_bytes(), params.ec_level)?;

    let modules = code.width() as u32;
    let side = modules
        .checked_add(params.border.saturating_mul(2))
        .and_then(|m| m.checked_mul(params.box_size))
        .filter(|side| *side <= MAX_IMAGE_SIDE)
        .ok_or(QrError::ImageTooLarge {
            max: MAX_IMAGE_SIDE,
        })?;

    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(params.box_size, params.box_size)
        .dark_color(DARK)
        .light_color(LIGHT)
        .build();

    let offset = i64::from(params.border * params.box_size);
    let mut canvas = ImageBuffer::from_pixel(side, side, LIGHT);
    imageops::replace(&mut canvas, &symbol, offset, offset);

    let mut png = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
