//! QR code rendering

use crate::{PaymentError, Result};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Minimum side of the rendered QR code in pixels
pub const QR_MIN_SIZE: u32 = 300;

/// Render `data` as a grayscale PNG QR code
///
/// Uses error correction level M as required for EPC payment codes.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| PaymentError::Encode(e.to_string()))?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .build();

    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| PaymentError::Image(e.to_string()))?;

    Ok(bytes)
}
