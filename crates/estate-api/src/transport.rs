// Shared transport configuration for building reqwest::Client instances.
//
// The standard JSON client and the upload client differ only in timeout,
// so both are produced from one `TransportConfig` and share the cookie jar.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::policy::BackgroundSafePolicy;
use crate::session::SessionCookies;

/// Timeout for ordinary JSON requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for multipart uploads.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("estate-admin/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled webpki roots.
    #[default]
    System,
    /// Additionally trust a CA certificate from the given PEM file.
    CustomCa(PathBuf),
}

/// Transport knobs for one `reqwest::Client`.
#[derive(Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookies: Option<Arc<SessionCookies>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            cookies: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// JSON content type is set per request (`.json(..)`), multipart sets its
    /// own boundary header, so no default `Content-Type` is installed here.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if let TlsMode::CustomCa(path) = &self.tls {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some(ref cookies) = self.cookies {
            builder = builder.cookie_provider(Arc::clone(cookies));
        }

        Ok(builder.build()?)
    }

    /// Same config with a different timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Everything `ApiClient` needs to talk to one backend.
///
/// Built by `estate-config` (or by hand in tests); never reads disk itself.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:5000/api`. Resource paths
    /// (`/admin/projects`) are appended verbatim.
    pub base_url: Url,
    /// Timeout for JSON requests.
    pub timeout: Duration,
    /// Timeout for multipart uploads.
    pub upload_timeout: Duration,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Paths whose 401s must not force a logout.
    pub background_safe: BackgroundSafePolicy,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
            tls: TlsMode::System,
            background_safe: BackgroundSafePolicy::default(),
        }
    }
}
