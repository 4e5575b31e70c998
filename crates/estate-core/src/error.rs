// ── Core error types ──
//
// User-facing errors from estate-core. Every variant displays a message fit
// for an admin to read (Vietnamese): the backend's own message when it sent
// one, otherwise the fallback of the operation that failed. Raw transport
// errors never leave this crate.

use thiserror::Error;
use tracing::{error, warn};

use crate::form::FieldErrors;

const GENERIC: &str = "Đã có lỗi xảy ra, vui lòng thử lại";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend verdicts ─────────────────────────────────────────────
    /// The backend answered `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    /// Hard 401. The session controller handles logout.
    #[error("{message}")]
    SessionExpired { message: String },

    /// Soft 401 on a background-safe endpoint.
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    // ── Transport ────────────────────────────────────────────────────
    /// No response from the backend.
    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    /// Any other failed request (4xx, bad URL, unbuildable upload).
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// The response decoded but did not have the expected shape.
    #[error("{message}")]
    Malformed { message: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("{message}")]
    Storage { message: String },

    /// Client-side rules failed; nothing was sent.
    #[error("{0}")]
    Validation(FieldErrors),
}

impl CoreError {
    /// Translate a transport-layer error, preferring the backend's message
    /// over `fallback`. Logs the underlying cause.
    pub fn translate(err: estate_api::Error, fallback: &str) -> Self {
        let message = err
            .backend_message()
            .map_or_else(|| fallback.to_owned(), str::to_owned);

        match err {
            estate_api::Error::SessionExpired { .. } => Self::SessionExpired { message },
            estate_api::Error::Unauthorized { path, .. } => {
                warn!(%path, "request unauthorized");
                Self::Unauthorized { message }
            }
            estate_api::Error::Forbidden { .. } => Self::Forbidden { message },
            estate_api::Error::Transport(ref e) if e.status().is_none() => {
                error!(error = %e, "request failed");
                Self::Network { message }
            }
            estate_api::Error::Transport(ref e) => {
                error!(error = %e, "request failed");
                Self::Request {
                    status: e.status().map(|s| s.as_u16()),
                    message,
                }
            }
            estate_api::Error::Server { status, .. } => Self::Server { status, message },
            estate_api::Error::Http { status, .. } => Self::Request {
                status: Some(status),
                message,
            },
            estate_api::Error::Deserialization { message: cause, .. } => {
                error!(%cause, "unexpected response body");
                Self::Malformed { message }
            }
            estate_api::Error::InvalidUrl(e) => {
                error!(error = %e, "invalid request URL");
                Self::Request {
                    status: None,
                    message,
                }
            }
            estate_api::Error::Tls(cause) | estate_api::Error::Upload(cause) => {
                error!(%cause, "request could not be built");
                Self::Request {
                    status: None,
                    message,
                }
            }
            estate_api::Error::Storage(cause) => {
                error!(%cause, "session storage failed");
                Self::Storage { message }
            }
        }
    }

    /// `success: false` with the backend message, or `fallback`.
    pub fn rejected(message: Option<String>, fallback: &str) -> Self {
        Self::Rejected {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_owned()),
        }
    }

    /// HTTP status, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } | Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Server { status, .. } => Some(*status),
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Field errors of a client-side validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<estate_api::Error> for CoreError {
    fn from(err: estate_api::Error) -> Self {
        Self::translate(err, GENERIC)
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = CoreError::translate(
            estate_api::Error::Http {
                status: 409,
                message: "Slug đã tồn tại".into(),
                body: String::new(),
            },
            "Không thể tạo dự án",
        );
        assert_eq!(err.to_string(), "Slug đã tồn tại");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn fallback_used_when_backend_is_silent() {
        let err = CoreError::translate(
            estate_api::Error::Server {
                status: 500,
                message: String::new(),
            },
            "Không thể tải danh sách dự án",
        );
        assert_eq!(err.to_string(), "Không thể tải danh sách dự án");
    }

    #[test]
    fn session_expiry_carries_backend_message() {
        let err = CoreError::translate(
            estate_api::Error::SessionExpired {
                path: "/admin/projects".into(),
                message: "jwt expired".into(),
            },
            "Không thể tải danh sách dự án",
        );
        assert!(err.is_session_expired());
        assert_eq!(err.to_string(), "jwt expired");

        let err = CoreError::translate(
            estate_api::Error::SessionExpired {
                path: "/admin/projects".into(),
                message: String::new(),
            },
            "Không thể tải danh sách dự án",
        );
        assert!(err.is_session_expired());
        assert_eq!(err.to_string(), "Không thể tải danh sách dự án");
    }

    #[test]
    fn empty_rejection_message_falls_back() {
        let err = CoreError::rejected(Some(String::new()), "Không thể xóa");
        assert_eq!(err.to_string(), "Không thể xóa");
    }
}
