//! # HTTP Server for Label Design and Printing
//!
//! Web interface for uploading a table, picking rows, designing a label
//! template and previewing the printable labels.
//!
//! ## Usage
//!
//! ```bash
//! labelgrid serve --listen 0.0.0.0:8080 --data-dir uploads --static-dir static
//! ```
//!
//! Then open http://localhost:8080 in a browser and log in.
//!
//! ## Routes
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET/POST /login`, `GET /logout` | Session login |
//! | `GET/POST /` | Upload a CSV/XLSX file |
//! | `GET/POST /table` | Show rows, select rows to print |
//! | `GET/POST /template_design` | Template designer actions |
//! | `POST /template_design/import` | Import a template document |
//! | `GET /print_preview` | Rendered labels |
//! | `GET /bpac_label` | Selected rows as JSON |
//! | `GET /qrcode/*payload` | QR code PNG |
//! | `/static/*` | Files from the static directory |

mod handlers;
mod pages;
mod session;
mod state;

pub use pages::print_document;
pub use session::{AuthSession, SESSION_COOKIE};
pub use state::{AppState, Flash, FlashLevel, SESSION_EXPIRATION_SECS, ServerConfig, Session};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::services::ServeDir;

use crate::error::LabelError;

/// Upload size limit for datasets and template documents (50MB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/",
            get(handlers::upload::form)
                .post(handlers::upload::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/table",
            get(handlers::table::view).post(handlers::table::select),
        )
        .route(
            "/template_design",
            get(handlers::designer::view).post(handlers::designer::action),
        )
        .route(
            "/template_design/import",
            post(handlers::designer::import).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/print_preview", get(handlers::preview::preview))
        .route("/bpac_label", get(handlers::bpac::label_data))
        .route("/qrcode/*payload", get(handlers::qrcode::image))
        .nest_service("/static", static_files)
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labelgrid::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), labelgrid::LabelError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8080".to_string(),
///     ..ServerConfig::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    // Spawn background session cleanup task
    tokio::spawn(cleanup_sessions(app_state.clone()));

    let app = router(app_state);

    log::info!("[server] labelgrid HTTP server starting");
    log::info!("[server] Listening on: {}", config.listen_addr);
    log::info!("[server] Data directory: {}", config.data_dir.display());
    log::info!("[server] Static directory: {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LabelError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LabelError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to evict idle sessions and their stored files.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));

    loop {
        interval.tick().await;
        let expired = state.take_expired(Instant::now()).await;

        if expired.is_empty() {
            continue;
        }

        for session in &expired {
            handlers::auth::discard_files(&state, session).await;
        }
        log::info!(
            "[session] Cleaned up {} expired sessions ({} remaining)",
            expired.len(),
            state.sessions.read().await.len()
        );
    }
}
