//! Login and logout.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::super::pages;
use super::super::session::{session_cookie, session_id};
use super::super::state::{AppState, Flash, FlashLevel, Session};
use super::blocking;
use crate::dataset::store::StoredKind;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login - show the login form (or skip it when already logged in).
pub async fn login_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(id) = session_id(&jar) else {
        return Html(pages::login_page(&[])).into_response();
    };

    let logged_in = state.with_session(id, |s| s.logged_in).await;
    if logged_in == Some(true) {
        return Redirect::to("/").into_response();
    }

    let flashes = state.take_flashes(id).await;
    Html(pages::login_page(&flashes)).into_response()
}

/// POST /login - check credentials and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.check_credentials(&form.username, &form.password) {
        log::warn!("[session] Failed login for user {:?}", form.username);
        let flash = Flash {
            level: FlashLevel::Danger,
            message: "Invalid username or password.".to_string(),
        };
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(&[flash])),
        )
            .into_response();
    }

    if let Some(old) = session_id(&jar) {
        state.remove_session(old).await;
    }

    let id = state.create_session().await;
    state
        .flash(id, FlashLevel::Success, "You have logged in successfully!")
        .await;
    log::info!("[session] User {:?} logged in", form.username);

    (jar.add(session_cookie(id)), Redirect::to("/")).into_response()
}

/// GET /logout - drop the session's data and return to the login form.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Redirect {
    let Some(id) = session_id(&jar) else {
        return Redirect::to("/login");
    };

    let previous = state
        .with_session(id, |s| {
            let previous = std::mem::take(s);
            s.flash(FlashLevel::Info, "You have been logged out.");
            previous
        })
        .await;

    if let Some(previous) = previous {
        discard_files(&state, &previous).await;
        log::info!("[session] Logged out");
    }

    Redirect::to("/login")
}

/// Delete the stored dataset and selection a session points at.
pub(crate) async fn discard_files(state: &AppState, session: &Session) {
    let files: Vec<_> = [
        (StoredKind::Dataset, session.dataset_id),
        (StoredKind::Selection, session.print_id),
    ]
    .into_iter()
    .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    .collect();
    if files.is_empty() {
        return;
    }

    let store = state.store.clone();
    let result = blocking(move || {
        for (kind, id) in files {
            if let Err(e) = store.remove(kind, id) {
                log::warn!("[session] Failed to remove stored file {}: {}", id, e);
            }
        }
        Ok(())
    })
    .await;
    if let Err(e) = result {
        log::warn!("[session] File cleanup failed: {}", e);
    }
}
