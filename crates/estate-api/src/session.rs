// ── Session storage capability ──
//
// The bearer token lives in a pluggable store so the client core never
// touches platform globals. Two scopes mirror what a browser offers:
// `Local` survives restarts, `Session` lives as long as the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Which half of the store a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Persistent across restarts.
    Local,
    /// Dropped when the process exits.
    Session,
}

/// Key/value store for client-side session state.
///
/// Implementations must be internally synchronized; every request reads
/// the token through `&self`.
pub trait SessionStore: Send + Sync {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String>;

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error>;

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error>;

    /// Drop every key in every scope.
    fn clear(&self) -> Result<(), Error>;

    /// The stored bearer token, if any.
    fn access_token(&self) -> Option<SecretString> {
        self.get(StorageScope::Local, ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    fn set_access_token(&self, token: &str) -> Result<(), Error> {
        self.set(StorageScope::Local, ACCESS_TOKEN_KEY, token)
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-lifetime store. Both scopes are volatile.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<(StorageScope, String), String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a bearer token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .insert((StorageScope::Local, ACCESS_TOKEN_KEY.to_owned()), token.to_owned());
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        self.entries
            .get(&(scope, key.to_owned()))
            .map(|v| v.value().clone())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .insert((scope, key.to_owned()), value.to_owned());
        Ok(())
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        self.entries.remove(&(scope, key.to_owned()));
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.entries.clear();
        Ok(())
    }
}

// ── File-backed store ───────────────────────────────────────────────

/// Store whose `Local` scope is persisted as a JSON object on disk.
///
/// The whole file is rewritten on every mutation; the data set is a
/// handful of keys.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    local: DashMap<String, String>,
    session: DashMap<String, String>,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let local = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(raw) if !raw.trim().is_empty() => {
                let map: BTreeMap<String, String> =
                    serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
                        message: format!("corrupt session file {}: {e}", path.display()),
                        body: raw.clone(),
                    })?;
                for (k, v) in map {
                    local.insert(k, v);
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Storage(format!("{}: {e}", path.display()))),
        }

        debug!(path = %path.display(), keys = local.len(), "opened session store");

        Ok(Self {
            path,
            local,
            session: DashMap::new(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn scope(&self, scope: StorageScope) -> &DashMap<String, String> {
        match scope {
            StorageScope::Local => &self.local,
            StorageScope::Session => &self.session,
        }
    }

    fn persist(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot: BTreeMap<String, String> = self
            .local
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let body = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| Error::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, body)
            .map_err(|e| Error::Storage(format!("{}: {e}", self.path.display())))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        self.scope(scope).get(key).map(|v| v.value().clone())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        self.scope(scope).insert(key.to_owned(), value.to_owned());
        match scope {
            StorageScope::Local => self.persist(),
            StorageScope::Session => Ok(()),
        }
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        let removed = self.scope(scope).remove(key).is_some();
        if removed && scope == StorageScope::Local {
            self.persist()?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.session.clear();
        self.local.clear();
        self.persist()
    }
}

// ── Cookies ─────────────────────────────────────────────────────────

/// Cookie provider shared by both HTTP clients.
///
/// `reqwest`'s `Jar` has no way to forget cookies, so the live jar sits
/// behind an `ArcSwap` and `clear()` swaps in an empty one.
#[derive(Debug, Default)]
pub struct SessionCookies {
    jar: ArcSwap<Jar>,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a cookie (`"name=value; Path=/"`) for `url`.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        self.jar.load().add_cookie_str(cookie, url);
    }

    /// `Cookie` header value that would be sent to `url`.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        self.cookies(url)
            .and_then(|v| v.to_str().ok().map(String::from))
    }

    /// Forget every cookie.
    pub fn clear(&self) {
        self.jar.store(Arc::new(Jar::default()));
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.load().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.load().cookies(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_scopes_are_independent() {
        let store = MemorySessionStore::new();
        store.set(StorageScope::Local, "k", "local").unwrap();
        store.set(StorageScope::Session, "k", "session").unwrap();

        assert_eq!(store.get(StorageScope::Local, "k").as_deref(), Some("local"));
        assert_eq!(store.get(StorageScope::Session, "k").as_deref(), Some("session"));

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn empty_token_is_treated_as_absent() {
        let store = MemorySessionStore::with_token("");
        assert!(store.access_token().is_none());
    }

    #[test]
    fn file_store_persists_local_scope_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileSessionStore::open(&path).unwrap();
            store.set_access_token("tok-123").unwrap();
            store.set(StorageScope::Session, "draft", "x").unwrap();
        }

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(StorageScope::Local, ACCESS_TOKEN_KEY).as_deref(),
            Some("tok-123")
        );
        assert!(reopened.get(StorageScope::Session, "draft").is_none());

        reopened.clear().unwrap();
        let reopened = FileSessionStore::open(&path).unwrap();
        assert!(reopened.access_token().is_none());
    }

    #[test]
    fn cookies_can_be_cleared() {
        let url = Url::parse("http://localhost:5000/api").unwrap();
        let cookies = SessionCookies::new();
        cookies.add_cookie_str("sid=abc; Path=/", &url);
        assert_eq!(cookies.header_for(&url).as_deref(), Some("sid=abc"));

        cookies.clear();
        assert!(cookies.header_for(&url).is_none());
    }
}
