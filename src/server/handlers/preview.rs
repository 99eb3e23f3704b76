//! Print preview.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use super::super::pages;
use super::super::session::AuthSession;
use super::super::state::{AppState, FlashLevel};
use super::{blocking, flash_redirect};
use crate::dataset::store::StoredKind;
use crate::error::LabelError;
use crate::render::{self, QrRoute};

/// GET /print_preview - one label per selected row.
pub async fn preview(State(state): State<Arc<AppState>>, auth: AuthSession) -> Response {
    let Some(print_id) = auth.session.print_id else {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "No data to print. Select rows in the table first.",
            "/table",
        )
        .await
        .into_response();
    };

    let store = state.store.clone();
    let template = auth.session.template;
    let result = blocking(move || {
        let selection = store.load(StoredKind::Selection, print_id)?;
        render::render_batch(&template, selection.rows(), &QrRoute::default())
    })
    .await;

    match result {
        Ok(labels) => {
            log::info!("[preview] Rendered {} labels", labels.len());
            let flashes = state.take_flashes(auth.id).await;
            Html(pages::preview_page(&flashes, &labels)).into_response()
        }
        Err(e @ LabelError::Configuration(_)) => {
            flash_redirect(&state, auth.id, FlashLevel::Danger, e.to_string(), "/template_design")
                .await
                .into_response()
        }
        Err(e) => flash_redirect(&state, auth.id, FlashLevel::Danger, e.to_string(), "/table")
            .await
            .into_response(),
    }
}
