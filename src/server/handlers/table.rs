//! Table view and row selection.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::sync::Arc;

use super::super::pages;
use super::super::session::AuthSession;
use super::super::state::{AppState, FlashLevel};
use super::{blocking, flash_redirect};
use crate::dataset::store::StoredKind;
use crate::error::LabelError;

/// Rows ticked in the table (`selected_rows` repeated once per row).
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub selected_rows: Vec<usize>,
}

/// GET /table - show the dataset with a checkbox per row.
pub async fn view(State(state): State<Arc<AppState>>, auth: AuthSession) -> Response {
    let Some(dataset_id) = auth.session.dataset_id else {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "Please upload a file first.",
            "/",
        )
        .await
        .into_response();
    };

    let store = state.store.clone();
    let dataset = match blocking(move || store.load(StoredKind::Dataset, dataset_id)).await {
        Ok(dataset) => dataset,
        Err(e) => {
            return flash_redirect(&state, auth.id, FlashLevel::Danger, e.to_string(), "/")
                .await
                .into_response();
        }
    };

    let flashes = state.take_flashes(auth.id).await;
    let template_set = !auth.session.template.is_empty();
    Html(pages::table_page(&flashes, &dataset, template_set)).into_response()
}

/// POST /table - store the selected rows for printing.
pub async fn select(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<SelectionForm>,
) -> Redirect {
    let Some(dataset_id) = auth.session.dataset_id else {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "Please upload a file first.",
            "/",
        )
        .await;
    };

    if auth.session.template.is_empty() {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "Please set up the label template before printing.",
            "/template_design",
        )
        .await;
    }

    let store = state.store.clone();
    let rows = form.selected_rows;
    let result = blocking(move || {
        let dataset = store.load(StoredKind::Dataset, dataset_id)?;
        let selection = dataset.select(&rows)?;
        let id = store.save(StoredKind::Selection, &selection)?;
        Ok((id, selection.len()))
    })
    .await;

    let (print_id, count) = match result {
        Ok(saved) => saved,
        Err(e @ LabelError::Validation(_)) => {
            return flash_redirect(
                &state,
                auth.id,
                FlashLevel::Warning,
                e.to_string(),
                "/table",
            )
            .await;
        }
        Err(e) => {
            return flash_redirect(&state, auth.id, FlashLevel::Danger, e.to_string(), "/").await;
        }
    };

    let previous = state
        .with_session(auth.id, |s| s.print_id.replace(print_id))
        .await
        .flatten();
    if let Some(previous) = previous
        && let Err(e) = state.store.remove(StoredKind::Selection, previous)
    {
        log::warn!("[preview] Failed to remove old selection {}: {}", previous, e);
    }

    log::info!("[preview] Stored selection {} ({} rows)", print_id, count);
    flash_redirect(
        &state,
        auth.id,
        FlashLevel::Info,
        format!("{} rows ready to print. Redirecting to the preview page.", count),
        "/print_preview",
    )
    .await
}
