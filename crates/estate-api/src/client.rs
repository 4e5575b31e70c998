// Admin API HTTP client
//
// One `ApiClient` per backend. It owns two `reqwest::Client`s (JSON and
// multipart upload) that share a cookie jar, attaches the bearer token from
// the injected `SessionStore` to every request, and classifies non-2xx
// responses into `Error` variants. It never clears the session or navigates;
// a 401 is reported through `SessionEvent`s and whoever subscribes decides.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use url::Url;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::policy::{BackgroundSafePolicy, is_credential_check};
use crate::session::{SessionCookies, SessionStore};
use crate::transport::{ClientConfig, TransportConfig};

const EVENT_CAPACITY: usize = 16;

/// Body substituted for an empty 2xx response.
const EMPTY_ENVELOPE: &str = r#"{"success":true}"#;

/// Authorization outcome of a request, published for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 401 outside the background-safe policy: the session is dead.
    Expired { path: String },
    /// 401 on a background-safe path: the caller shows an error in place.
    Unauthorized { path: String },
}

/// Error body shape; handlers use either key.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP client for the admin REST API.
///
/// Verbs return the raw `Envelope<T>`; unwrapping `success`/`data` is the
/// service layer's job.
pub struct ApiClient {
    http: reqwest::Client,
    upload_http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    cookies: Arc<SessionCookies>,
    policy: BackgroundSafePolicy,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Build both HTTP clients from `config`.
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let cookies = Arc::new(SessionCookies::new());
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
            cookies: Some(Arc::clone(&cookies)),
        };
        let http = transport.build_client()?;
        let upload_http = transport.with_timeout(config.upload_timeout).build_client()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            upload_http,
            base_url: config.base_url.clone(),
            store,
            cookies,
            policy: config.background_safe.clone(),
            events,
        })
    }

    /// The backend root all paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The injected session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The cookie jar shared by both HTTP clients.
    pub fn cookies(&self) -> &Arc<SessionCookies> {
        &self.cookies
    }

    pub fn policy(&self) -> &BackgroundSafePolicy {
        &self.policy
    }

    /// Receive every `SessionEvent` published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `path` (e.g. `/admin/projects`) to the base URL verbatim.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        self.get_raw(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>, Error> {
        self.get_raw(path, params).await
    }

    /// GET decoding the body as-is, for endpoints whose shape is not a
    /// plain envelope (list responses).
    pub async fn get_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let mut builder = self.http.get(url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let resp = self.send(builder, path).await?;
        decode(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        self.with_body(Method::POST, path, body).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        self.with_body(Method::PUT, path, body).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        self.with_body(Method::PATCH, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.send(self.http.delete(url), path).await?;
        decode(resp).await
    }

    /// Send a multipart form over the upload client (longer timeout).
    pub async fn upload<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("{method} {url} (multipart)");

        let resp = self
            .send(self.upload_http.request(method, url).multipart(form), path)
            .await?;
        decode(resp).await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let resp = self
            .send(self.http.request(method, url).json(body), path)
            .await?;
        decode(resp).await
    }

    // ── Interceptors ─────────────────────────────────────────────────

    /// Attach the bearer token (if any), send, and classify the status.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<reqwest::Response, Error> {
        let builder = match self.store.access_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!(path, error = %e, "no response from backend");
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(self.parse_error(path, status, resp).await)
        }
    }

    async fn parse_error(&self, path: &str, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED if is_credential_check(path) => {
                debug!(path, "credentials rejected");
                Error::Unauthorized {
                    path: path.to_owned(),
                    message,
                }
            }
            StatusCode::UNAUTHORIZED if self.policy.is_background_safe(path) => {
                warn!(path, "unauthorized on background-safe endpoint; session kept");
                self.publish(SessionEvent::Unauthorized {
                    path: path.to_owned(),
                });
                Error::Unauthorized {
                    path: path.to_owned(),
                    message,
                }
            }
            StatusCode::UNAUTHORIZED => {
                warn!(path, "unauthorized; session expired");
                self.publish(SessionEvent::Expired {
                    path: path.to_owned(),
                });
                Error::SessionExpired {
                    path: path.to_owned(),
                    message,
                }
            }
            StatusCode::FORBIDDEN => {
                warn!(path, %message, "forbidden");
                Error::Forbidden {
                    path: path.to_owned(),
                    message,
                }
            }
            s if s.is_server_error() => {
                error!(path, status = s.as_u16(), %message, "server error");
                Error::Server {
                    status: s.as_u16(),
                    message,
                }
            }
            s => Error::Http {
                status: s.as_u16(),
                message,
                body: raw,
            },
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine: nobody is driving a session controller.
        let _ = self.events.send(event);
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    let text = if body.trim().is_empty() {
        EMPTY_ENVELOPE
    } else {
        body.as_str()
    };
    serde_json::from_str(text).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}
