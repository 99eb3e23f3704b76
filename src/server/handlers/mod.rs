//! HTTP handlers for the server.

pub mod auth;
pub mod bpac;
pub mod designer;
pub mod preview;
pub mod qrcode;
pub mod table;
pub mod upload;

use axum::response::Redirect;
use uuid::Uuid;

use crate::error::LabelError;

use super::state::{AppState, FlashLevel};

/// Run file or CPU work on the blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, LabelError>
where
    F: FnOnce() -> Result<T, LabelError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| LabelError::Io(std::io::Error::other(format!("Task error: {}", e))))?
}

/// Queue a flash message and redirect (post/redirect/get).
pub(crate) async fn flash_redirect(
    state: &AppState,
    id: Uuid,
    level: FlashLevel,
    message: impl Into<String>,
    to: &str,
) -> Redirect {
    state.flash(id, level, message).await;
    Redirect::to(to)
}
