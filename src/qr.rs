//! # QR Code Images
//!
//! Labels never embed QR images directly. The content renderer percent-encodes
//! the payload into a URL ([`encode_payload`]), and the server's QR route
//! decodes it again ([`decode_payload`]) and renders a PNG on demand
//! ([`render_png`]).
//!
//! Rendering parameters: error correction level L, smallest version that fits,
//! 4px modules, 4-module quiet zone, black on white.

use image::{GrayImage, ImageFormat, Luma};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

use crate::error::LabelError;

/// Bytes left unescaped in payloads: ASCII alphanumerics and `-_.~`.
const PAYLOAD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Pixel size of one QR module.
pub const MODULE_PX: u32 = 4;
/// Quiet zone width, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Percent-encode a payload so it fits in a single URL path segment.
pub fn encode_payload(value: &str) -> String {
    utf8_percent_encode(value, PAYLOAD).to_string()
}

/// Reverse [`encode_payload`]. Invalid UTF-8 is replaced, never rejected.
pub fn decode_payload(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Render `data` as a PNG QR code.
pub fn render_png(data: &str) -> Result<Vec<u8>, LabelError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| LabelError::ExternalService(format!("QR code generation failed: {}", e)))?;

    let modules = code.width() as u32;
    let side = (modules + 2 * QUIET_ZONE) * MODULE_PX;
    let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] != Color::Dark {
                continue;
            }
            let x0 = (qx + QUIET_ZONE) * MODULE_PX;
            let y0 = (qy + QUIET_ZONE) * MODULE_PX;
            for y in y0..y0 + MODULE_PX {
                for x in x0..x0 + MODULE_PX {
                    img.put_pixel(x, y, Luma([0u8]));
                }
            }
        }
    }

    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| LabelError::ExternalService(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode_payload("A-1_b.c~"), "A-1_b.c~");
        assert_eq!(encode_payload("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_payload("NO DATA"), "NO%20DATA");
        assert_eq!(encode_payload("ç"), "%C3%A7");
    }

    #[test]
    fn test_decode_reverses_encode() {
        for value in ["SKU-001", "a/b?c=d&e", "Ürün #5", "100%"] {
            assert_eq!(decode_payload(&encode_payload(value)), value);
        }
    }

    #[test]
    fn test_render_png_signature() {
        let png = render_png("https://example.com").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_png_dimensions() {
        let png = render_png("A").unwrap();
        let img = image::load_from_memory(&png).unwrap();
        // Version 1 is 21 modules wide
        assert_eq!(img.width(), (21 + 2 * QUIET_ZONE) * MODULE_PX);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn test_payload_too_large_fails() {
        let huge = "x".repeat(8000);
        assert!(matches!(
            render_png(&huge),
            Err(LabelError::ExternalService(_))
        ));
    }
}
