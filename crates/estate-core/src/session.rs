// ── Session controller ──
//
// Consumes `SessionEvent`s from the HTTP client and performs the hard
// logout: clear every stored key and cookie, then send the admin to the
// login page. The HTTP layer only reports; this is the one place that
// acts.

use std::sync::{Arc, Mutex, PoisonError};

use estate_api::{ApiClient, SessionCookies, SessionEvent, SessionStore};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Where a hard logout sends the admin.
pub const LOGIN_PATH: &str = "/admin/login";

/// Current location and redirects, supplied by the host application.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    fn redirect(&self, path: &str);
}

/// Navigator that only records where it was sent.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every redirect so far, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn redirect(&self, path: &str) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_owned();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Session cleared and redirected to login.
    LoggedOut,
    /// Nothing beyond logging.
    Ignored,
}

pub struct SessionController {
    store: Arc<dyn SessionStore>,
    cookies: Arc<SessionCookies>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionController {
    pub fn new(client: &ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store: Arc::clone(client.store()),
            cookies: Arc::clone(client.cookies()),
            navigator,
            login_path: LOGIN_PATH.to_owned(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn handle(&self, event: &SessionEvent) -> SessionAction {
        match event {
            SessionEvent::Unauthorized { path } => {
                debug!(%path, "soft 401; session kept");
                SessionAction::Ignored
            }
            SessionEvent::Expired { path } => {
                if self.navigator.current_path() == self.login_path {
                    debug!(%path, "401 while on the login page");
                    return SessionAction::Ignored;
                }
                info!(%path, "session expired; logging out");
                self.cookies.clear();
                if let Err(e) = self.store.clear() {
                    error!(error = %e, "failed to clear session store");
                }
                self.navigator.redirect(&self.login_path);
                SessionAction::LoggedOut
            }
        }
    }

    /// Handle events until `cancel` fires or the client is dropped.
    pub fn spawn(
        self,
        mut rx: broadcast::Receiver<SessionEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(event) => {
                            self.handle(&event);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "session events dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}
