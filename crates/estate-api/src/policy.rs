// Background-safe endpoint policy
//
// Decides whether a 401 on a given request path forces a hard logout.
// Dashboard overview widgets poll in the background and must render an
// error state in place instead of kicking the admin back to login.

use serde::{Deserialize, Serialize};

/// Default prefix whose 401s are tolerated.
pub const DASHBOARD_PREFIX: &str = "/admin/dashboard/";

/// Endpoints that check credentials. A 401 there is a wrong password,
/// not a dead session.
pub const CREDENTIAL_PATHS: &[&str] = &["/admin/auth/login"];

/// Whether `path` (query string ignored) is a credential check.
pub fn is_credential_check(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    CREDENTIAL_PATHS.contains(&path)
}

/// Named set of path prefixes whose 401 responses leave the session intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundSafePolicy {
    prefixes: Vec<String>,
}

impl Default for BackgroundSafePolicy {
    fn default() -> Self {
        Self {
            prefixes: vec![DASHBOARD_PREFIX.to_owned()],
        }
    }
}

impl BackgroundSafePolicy {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy under which every 401 forces logout.
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Add another prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether a 401 on `path` (query string ignored) should be tolerated.
    pub fn is_background_safe(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}
