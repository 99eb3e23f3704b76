//! Data feed for the label-printer page: the selected rows as JSON records.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::super::session::AuthSession;
use super::super::state::{AppState, FlashLevel};
use super::{blocking, flash_redirect};
use crate::dataset::store::StoredKind;

/// GET /bpac_label - `{"columns": [...], "rows": [{column: value}, ...]}`.
pub async fn label_data(State(state): State<Arc<AppState>>, auth: AuthSession) -> Response {
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
    match blocking(move || store.load(StoredKind::Selection, print_id)).await {
        Ok(selection) => Json(json!({
            "columns": selection.columns(),
            "rows": selection.records(),
        }))
        .into_response(),
        Err(e) => flash_redirect(&state, auth.id, FlashLevel::Danger, e.to_string(), "/table")
            .await
            .into_response(),
    }
}
