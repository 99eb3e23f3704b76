//! QR code images.

use axum::{
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use super::super::session::AuthSession;
use super::blocking;
use crate::qr;

pub const ROUTE_PREFIX: &str = "/qrcode/";

/// GET /qrcode/*payload - PNG QR code for the percent-encoded payload.
///
/// The raw path is decoded exactly once, so payloads containing `/` or `%`
/// survive the trip. Generation failures answer `204 No Content`.
pub async fn image(_auth: AuthSession, uri: Uri) -> Response {
    let raw = uri.path().strip_prefix(ROUTE_PREFIX).unwrap_or_default();
    let data = qr::decode_payload(raw);

    match blocking(move || qr::render_png(&data)).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "private, max-age=3600"),
            ],
            png,
        )
            .into_response(),
        Err(e) => {
            log::warn!("[qrcode] {}", e);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
