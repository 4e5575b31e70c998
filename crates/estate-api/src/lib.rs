// estate-api: Async HTTP client core for the real-estate admin REST API

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod policy;
pub mod session;
pub mod transport;
pub mod upload;

pub use client::{ApiClient, SessionEvent};
pub use envelope::{Envelope, ListError, ListResponse, Listing, Pagination};
pub use error::Error;
pub use policy::BackgroundSafePolicy;
pub use session::{
    ACCESS_TOKEN_KEY, FileSessionStore, MemorySessionStore, SessionCookies, SessionStore,
    StorageScope,
};
pub use transport::{ClientConfig, TlsMode, TransportConfig};
pub use upload::UploadFile;

pub use reqwest::Method;
pub use reqwest::multipart::Form;
