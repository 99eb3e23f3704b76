//! Session cookie and the logged-in session extractor.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use uuid::Uuid;

use super::state::{AppState, Session};

pub const SESSION_COOKIE: &str = "session";

/// Build the session cookie for `id`.
pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Session id from the request cookies, if present and well-formed.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// A logged-in session: its id and a snapshot taken when the request arrived.
///
/// Requests without a valid, logged-in session are redirected to `/login`.
/// Handlers write changes back through [`AppState::with_session`].
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: Uuid,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let id = session_id(&jar).ok_or_else(|| Redirect::to("/login"))?;

        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.logged_in)
            .ok_or_else(|| Redirect::to("/login"))?;
        session.touch();

        Ok(AuthSession {
            id,
            session: session.clone(),
        })
    }
}
