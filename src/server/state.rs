//! Server state, configuration and per-user sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dataset::store::DatasetStore;
use crate::error::LabelError;
use crate::template::Template;

/// Session expiration time (1 hour of inactivity).
pub const SESSION_EXPIRATION_SECS: u64 = 3600;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory holding uploaded datasets and print selections
    pub data_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    pub username: String,
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Flash message category, used as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Per-user state, keyed by the session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub logged_in: bool,
    /// Stored dataset of the last upload
    pub dataset_id: Option<Uuid>,
    /// Column names of that dataset
    pub columns: Vec<String>,
    pub template: Template,
    /// Stored print selection
    pub print_id: Option<Uuid>,
    pub flashes: Vec<Flash>,
    pub last_accessed: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            logged_in: false,
            dataset_id: None,
            columns: Vec::new(),
            template: Template::new(),
            print_id: None,
            flashes: Vec::new(),
            last_accessed: Instant::now(),
        }
    }

    /// Update last accessed time.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: DatasetStore,
    pub sessions: RwLock<HashMap<Uuid, Session>>,
}

impl AppState {
    /// Build the state, creating the data directory if needed.
    pub fn new(config: ServerConfig) -> Result<Self, LabelError> {
        let store = DatasetStore::open(&config.data_dir)?;
        Ok(Self {
            config,
            store,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// True if the credentials match the configured login.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        username == self.config.username && password == self.config.password
    }

    /// Start a logged-in session and return its id.
    pub async fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            logged_in: true,
            ..Session::new()
        };
        self.sessions.write().await.insert(id, session);
        id
    }

    pub async fn remove_session(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    /// Run `f` against a session under the write lock.
    ///
    /// Returns `None` if the session has expired in the meantime.
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(|session| {
            session.touch();
            f(session)
        })
    }

    pub async fn flash(&self, id: Uuid, level: FlashLevel, message: impl Into<String>) {
        let message = message.into();
        self.with_session(id, |s| s.flash(level, message)).await;
    }

    /// Remove and return every session idle for at least
    /// [`SESSION_EXPIRATION_SECS`] as of `now`.
    pub async fn take_expired(&self, now: Instant) -> Vec<Session> {
        let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);
        let mut sessions = self.sessions.write().await;
        let ids: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, s)| now.saturating_duration_since(s.last_accessed) >= expiration)
            .map(|(id, _)| *id)
            .collect();
        ids.iter().filter_map(|id| sessions.remove(id)).collect()
    }

    /// Drain pending flash messages.
    pub async fn take_flashes(&self, id: Uuid) -> Vec<Flash> {
        self.with_session(id, |s| std::mem::take(&mut s.flashes))
            .await
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_dir: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        (dir, AppState::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (_dir, state) = state();
        let id = state.create_session().await;
        assert!(state.with_session(id, |s| s.logged_in).await.unwrap());

        state.flash(id, FlashLevel::Success, "hello").await;
        let flashes = state.take_flashes(id).await;
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].message, "hello");
        assert!(state.take_flashes(id).await.is_empty());

        state.remove_session(id).await;
        assert!(state.with_session(id, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_take_expired() {
        let (_dir, state) = state();
        let idle = state.create_session().await;
        let active = state.create_session().await;

        let later = Instant::now() + Duration::from_secs(SESSION_EXPIRATION_SECS + 1);
        state
            .with_session(active, |s| s.last_accessed = later)
            .await
            .unwrap();
        state
            .with_session(idle, |s| s.dataset_id = Some(Uuid::nil()))
            .await
            .unwrap();

        assert!(state.take_expired(Instant::now()).await.is_empty());

        let expired = state.take_expired(later).await;
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].dataset_id, Some(Uuid::nil()));
        assert!(state.with_session(idle, |_| ()).await.is_none());
        assert!(state.with_session(active, |_| ()).await.is_some());
    }

    #[test]
    fn test_credentials() {
        let (_dir, state) = state();
        assert!(state.check_credentials("admin", "admin"));
        assert!(!state.check_credentials("admin", "wrong"));
    }
}
