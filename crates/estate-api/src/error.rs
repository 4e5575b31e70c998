use thiserror::Error;

/// Top-level error type for the `estate-api` crate.
///
/// Mirrors the response interceptor's taxonomy: transport failures,
/// the two flavors of 401, 403, 5xx, any other non-2xx, and bodies that
/// could not be decoded. `estate-core` maps these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// 401 on a path outside the background-safe policy. The session is
    /// considered dead; a `SessionEvent::Expired` has been published.
    #[error("Session expired on {path} -- re-authentication required")]
    SessionExpired { path: String, message: String },

    /// 401 on a background-safe path. The session is left intact.
    #[error("Unauthorized request to {path}: {message}")]
    Unauthorized { path: String, message: String },

    /// 403: the session is valid but lacks permission.
    #[error("Forbidden: {message}")]
    Forbidden { path: String, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// No response received (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Custom CA certificate could not be loaded.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Status ──────────────────────────────────────────────────────
    /// 5xx from the backend, with its message when it sent one.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A multipart part could not be built (bad MIME type, unreadable file).
    #[error("Upload error: {0}")]
    Upload(String),

    // ── Local state ─────────────────────────────────────────────────
    /// The session store could not persist or clear its contents.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl Error {
    /// HTTP status code carried by this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } | Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this error forces a hard logout.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Returns `true` if no HTTP response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(e) if e.status().is_none())
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this workspace retries automatically; callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Server { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The message the backend put in its error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::SessionExpired { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Forbidden { message, .. }
            | Self::Server { message, .. }
            | Self::Http { message, .. }
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}
