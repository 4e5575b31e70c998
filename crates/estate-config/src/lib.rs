//! Configuration for the estate admin client.
//!
//! Layers, lowest to highest: built-in defaults, the TOML file at
//! [`config_path`], then `ESTATE_*` environment variables
//! (`ESTATE_API_URL`, `ESTATE_TIMEOUT`, ...). The result translates into an
//! [`estate_api::ClientConfig`] and a file-backed session store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use estate_api::{BackgroundSafePolicy, ClientConfig, FileSessionStore, TlsMode};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const ENV_PREFIX: &str = "ESTATE_";
const SESSION_FILE: &str = "session.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session store unavailable: {0}")]
    Session(#[from] estate_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Flat on purpose: every key maps 1:1 onto an `ESTATE_<KEY>` variable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Backend root, e.g. `http://localhost:5000/api`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Seconds before a JSON request gives up.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds before a multipart upload gives up.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout: u64,

    /// Extra CA certificate (PEM) to trust.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Path prefixes whose 401s never force a logout.
    #[serde(default = "default_background_safe")]
    pub background_safe: Vec<String>,

    /// Where the session store lives; defaults under the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            upload_timeout: default_upload_timeout(),
            ca_cert: None,
            background_safe: default_background_safe(),
            session_file: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_upload_timeout() -> u64 {
    60
}
fn default_background_safe() -> Vec<String> {
    vec!["/admin/dashboard/".into()]
}

impl Config {
    /// Parse and check `api_url`: absolute, http(s), no query or fragment.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::Validation {
            field: "api_url".into(),
            reason,
        };

        let url = Url::parse(&self.api_url)
            .map_err(|e| invalid(format!("'{}' is not a URL: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment".into()));
        }
        Ok(url)
    }

    /// Translate into the HTTP client's configuration.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new(self.api_url()?);
        config.timeout = positive_secs("timeout", self.timeout)?;
        config.upload_timeout = positive_secs("upload_timeout", self.upload_timeout)?;
        if let Some(ref ca) = self.ca_cert {
            config.tls = TlsMode::CustomCa(ca.clone());
        }
        config.background_safe = BackgroundSafePolicy::new(&self.background_safe);
        Ok(config)
    }

    /// The configured session file, or `session.json` in the data directory.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| data_dir().join(SESSION_FILE))
    }

    /// Open the file-backed session store at [`Config::session_path`].
    pub fn open_session_store(&self) -> Result<FileSessionStore, ConfigError> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(FileSessionStore::open(path)?)
    }
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("vn", "estate", "estate-admin")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn data_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("estate-admin");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load from the canonical config file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment(path).extract()?;
    debug!(path = %path.display(), api_url = %config.api_url, "configuration loaded");
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    fn load(path: &str) -> figment::error::Result<Config> {
        load_config_from(Path::new(path)).map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = load("missing.toml")?;
            assert_eq!(config, Config::default());
            assert_eq!(config.api_url, DEFAULT_API_URL);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                api_url = "https://file.example.vn/api"
                timeout = 10
                "#,
            )?;
            let from_file = load("config.toml")?;
            assert_eq!(from_file.api_url, "https://file.example.vn/api");
            assert_eq!(from_file.timeout, 10);
            assert_eq!(from_file.upload_timeout, 60);

            jail.set_env("ESTATE_API_URL", "https://env.example.vn/api");
            let from_env = load("config.toml")?;
            assert_eq!(from_env.api_url, "https://env.example.vn/api");
            assert_eq!(from_env.timeout, 10);
            Ok(())
        });
    }

    #[test]
    fn client_config_carries_timeouts_and_policy() {
        let config = Config {
            timeout: 5,
            upload_timeout: 120,
            background_safe: vec!["/admin/dashboard/".into(), "/admin/stats/".into()],
            ca_cert: Some(PathBuf::from("/etc/estate/ca.pem")),
            ..Config::default()
        };
        let client = config.to_client_config().unwrap();

        assert_eq!(client.base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.upload_timeout, Duration::from_secs(120));
        assert!(client.background_safe.is_background_safe("/admin/stats/daily"));
        assert!(!client.background_safe.is_background_safe("/admin/projects"));
        assert!(matches!(client.tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeouts() {
        for url in ["localhost:5000/api", "ftp://host/api", "http://host/api?x=1", "not a url"] {
            let config = Config {
                api_url: url.into(),
                ..Config::default()
            };
            let err = config.to_client_config().unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"),
                "{url}: {err}"
            );
        }

        let config = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.to_client_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: "https://admin.example.vn/api".into(),
            session_file: Some(dir.path().join("session.json")),
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("api_url = \"https://admin.example.vn/api\""));

        let loaded: Config = Figment::from(Toml::file(&path)).extract().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn session_store_opens_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            session_file: Some(dir.path().join("state").join("session.json")),
            ..Config::default()
        };
        assert_eq!(config.session_path(), dir.path().join("state").join("session.json"));
        config.open_session_store().unwrap();
        assert!(dir.path().join("state").is_dir());
    }
}
