//! Dataset upload.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use std::sync::Arc;

use super::super::pages;
use super::super::session::AuthSession;
use super::super::state::{AppState, FlashLevel};
use super::auth::discard_files;
use super::{blocking, flash_redirect};
use crate::dataset::{ingest, store::StoredKind};

/// GET / - upload form.
pub async fn form(State(state): State<Arc<AppState>>, auth: AuthSession) -> Html<String> {
    let flashes = state.take_flashes(auth.id).await;
    Html(pages::upload_page(&flashes, &auth.session.columns))
}

/// POST / - read an uploaded CSV/XLSX file and make it the session's dataset.
///
/// The previous dataset, template and print selection are replaced wholesale.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    mut multipart: Multipart,
) -> Result<Redirect, (StatusCode, String)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e)))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let Some((filename, bytes)) = upload else {
        return Ok(flash_redirect(
            &state,
            auth.id,
            FlashLevel::Danger,
            "File not found.",
            "/",
        )
        .await);
    };
    if filename.is_empty() {
        return Ok(flash_redirect(
            &state,
            auth.id,
            FlashLevel::Danger,
            "No file selected.",
            "/",
        )
        .await);
    }

    let worker_state = state.clone();
    let worker_name = filename.clone();
    let result = blocking(move || {
        let dataset = ingest::read_dataset(&worker_name, &bytes)?;
        let id = worker_state.store.save(StoredKind::Dataset, &dataset)?;
        Ok((id, dataset.columns().to_vec(), dataset.len()))
    })
    .await;

    let (dataset_id, columns, row_count) = match result {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("[upload] Rejected {:?}: {}", filename, e);
            return Ok(flash_redirect(
                &state,
                auth.id,
                FlashLevel::Danger,
                e.to_string(),
                "/",
            )
            .await);
        }
    };

    log::info!(
        "[upload] Stored {:?} as {} ({} rows, {} columns)",
        filename,
        dataset_id,
        row_count,
        columns.len()
    );

    let column_count = columns.len();
    let previous = state
        .with_session(auth.id, |s| {
            let previous = s.clone();
            s.dataset_id = Some(dataset_id);
            s.columns = columns;
            s.template.clear();
            s.print_id = None;
            previous
        })
        .await;
    if let Some(previous) = previous {
        discard_files(&state, &previous).await;
    }

    Ok(flash_redirect(
        &state,
        auth.id,
        FlashLevel::Success,
        format!(
            "File \"{}\" uploaded successfully ({} columns found).",
            filename, column_count
        ),
        "/table",
    )
    .await)
}
