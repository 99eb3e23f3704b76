//! Template designer: add, reorder, delete, clear, export and import cells.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::sync::Arc;

use super::super::pages;
use super::super::session::AuthSession;
use super::super::state::{AppState, FlashLevel};
use super::flash_redirect;
use crate::error::LabelError;
use crate::template::{CellRequest, Direction, Template};

/// Download name for exported templates.
pub const EXPORT_FILENAME: &str = "label_template.json";

const DESIGNER: &str = "/template_design";

/// Designer form: an action plus whichever fields that action needs.
#[derive(Debug, Deserialize)]
pub struct DesignerForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub row_index: Option<String>,
    #[serde(flatten)]
    pub cell: CellRequest,
}

impl DesignerForm {
    fn index(&self) -> Option<usize> {
        self.row_index.as_deref()?.trim().parse().ok()
    }
}

/// GET /template_design - the designer page.
pub async fn view(State(state): State<Arc<AppState>>, auth: AuthSession) -> Response {
    if auth.session.dataset_id.is_none() {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "Please upload a file first.",
            "/",
        )
        .await
        .into_response();
    }

    let flashes = state.take_flashes(auth.id).await;
    Html(pages::designer_page(
        &flashes,
        &auth.session.columns,
        &auth.session.template,
    ))
    .into_response()
}

/// POST /template_design - apply one designer action.
pub async fn action(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<DesignerForm>,
) -> Response {
    if auth.session.dataset_id.is_none() {
        return flash_redirect(
            &state,
            auth.id,
            FlashLevel::Warning,
            "Please upload a file first.",
            "/",
        )
        .await
        .into_response();
    }

    let id = auth.id;
    match form.action.as_str() {
        "add_cell" => {
            let result = match form.cell.build() {
                Ok(cell) => state
                    .with_session(id, |s| s.template.append(cell, &s.columns))
                    .await
                    .unwrap_or(Ok(())),
                Err(e) => Err(e),
            };
            let (level, message) = match result {
                Ok(()) => (FlashLevel::Success, "New cell added to the template.".to_string()),
                Err(e) => (FlashLevel::Danger, format!("Error: {}", e)),
            };
            flash_redirect(&state, id, level, message, DESIGNER)
                .await
                .into_response()
        }

        "clear_template" => {
            state.with_session(id, |s| s.template.clear()).await;
            flash_redirect(&state, id, FlashLevel::Info, "Template cleared.", DESIGNER)
                .await
                .into_response()
        }

        "save_and_return" => {
            let (level, message) = if auth.session.template.is_empty() {
                (FlashLevel::Warning, "Returned to the data table without a template.")
            } else {
                (
                    FlashLevel::Success,
                    "Template saved. You can now select the rows to print.",
                )
            };
            flash_redirect(&state, id, level, message, "/table")
                .await
                .into_response()
        }

        "export_template" => export(&state, &auth).await,

        "move_up" | "move_down" => {
            let direction = if form.action == "move_up" {
                Direction::Up
            } else {
                Direction::Down
            };
            let Some(index) = form.index() else {
                return invalid_index(&state, id).await.into_response();
            };
            state
                .with_session(id, |s| s.template.move_cell(index, direction))
                .await;
            flash_redirect(&state, id, FlashLevel::Info, "Cell order updated.", DESIGNER)
                .await
                .into_response()
        }

        "delete_row" => {
            let Some(index) = form.index() else {
                return invalid_index(&state, id).await.into_response();
            };
            let removed = state
                .with_session(id, |s| s.template.delete(index))
                .await;
            match removed {
                Some(Ok(_)) => {
                    flash_redirect(
                        &state,
                        id,
                        FlashLevel::Danger,
                        "Cell removed from the template.",
                        DESIGNER,
                    )
                    .await
                    .into_response()
                }
                Some(Err(e)) => {
                    log::debug!("[designer] Ignoring delete: {}", e);
                    Redirect::to(DESIGNER).into_response()
                }
                None => Redirect::to(DESIGNER).into_response(),
            }
        }

        other => {
            log::debug!("[designer] Unknown action {:?}", other);
            flash_redirect(&state, id, FlashLevel::Warning, "Unknown action.", DESIGNER)
                .await
                .into_response()
        }
    }
}

async fn invalid_index(state: &AppState, id: uuid::Uuid) -> Redirect {
    flash_redirect(state, id, FlashLevel::Danger, "Invalid cell index.", DESIGNER).await
}

/// Download the template with the dataset's columns as JSON.
async fn export(state: &AppState, auth: &AuthSession) -> Response {
    let document = auth
        .session
        .template
        .export(&auth.session.columns)
        .and_then(|doc| doc.to_json_pretty());

    match document {
        Ok(json) => {
            log::info!(
                "[designer] Exported template ({} cells)",
                auth.session.template.len()
            );
            (
                [
                    (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
                    ),
                ],
                json,
            )
            .into_response()
        }
        Err(e) => flash_redirect(state, auth.id, FlashLevel::Warning, e.to_string(), DESIGNER)
            .await
            .into_response(),
    }
}

/// POST /template_design/import - replace the template with an uploaded document.
///
/// The document's cells are taken as-is; their column references are not
/// checked against the current dataset.
pub async fn import(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    mut multipart: Multipart,
) -> Redirect {
    let id = auth.id;
    let template = match read_template_upload(&mut multipart).await {
        Ok(template) => template,
        Err(e) => {
            return flash_redirect(
                &state,
                id,
                FlashLevel::Danger,
                e.to_string(),
                DESIGNER,
            )
            .await;
        }
    };

    let cells = template.len();
    state.with_session(id, |s| s.template = template).await;
    log::info!("[designer] Imported template ({} cells)", cells);
    flash_redirect(
        &state,
        id,
        FlashLevel::Success,
        "Template imported successfully.",
        DESIGNER,
    )
    .await
}

async fn read_template_upload(multipart: &mut Multipart) -> Result<Template, LabelError> {
    let invalid = || LabelError::validation("Please choose a valid JSON template file.");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LabelError::validation(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("template_file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_ascii_lowercase();
        if !filename.ends_with(".json") {
            return Err(invalid());
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| LabelError::validation(format!("Failed to read file: {}", e)))?;
        let text = std::str::from_utf8(&bytes).map_err(|_| invalid())?;
        return Template::import_json(text);
    }

    Err(invalid())
}
