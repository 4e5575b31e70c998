// ── Resource services ──
//
// One service per backend resource. Every call goes through `ApiClient`,
// then the envelope is unwrapped here: `success` with `data` yields the
// payload, anything else becomes a `CoreError` carrying the backend message
// or the operation's Vietnamese fallback.

mod auth;
mod company;
mod content;
mod contact;
mod dashboard;
mod project;
mod settings;
mod upload;

use async_trait::async_trait;
use estate_api::models::{
    ApiKey, BackupRecord, Career, Contact, EmailTemplate, NewsArticle, Product, Project, SocialLink,
};
use estate_api::{Envelope, ListError, ListResponse, Listing};

use crate::error::CoreError;
use crate::filter::{ListFilter, ListQuery};

pub use auth::AuthService;
pub use company::CompanyService;
pub use contact::ContactService;
pub use content::{
    CareerService, Careers, News, NewsService, ProductService, Products, Resource, ResourceService,
};
pub use dashboard::DashboardService;
pub use project::{ProjectService, ProjectSubmission};
pub use settings::{
    ApiKeys, EmailTemplates, SettingsCollection, SettingsResource, SettingsService, SocialLinks,
};
pub use upload::UploadService;

/// Entities the hooks can find again by id.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(Project, NewsArticle, Product, Career, Contact, ApiKey, EmailTemplate, SocialLink, BackupRecord);

/// A listable, mutable resource. One `CollectionHook` implementation
/// serves every implementor.
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    type Item: Identified + Clone + Send + Sync + 'static;
    /// Create payload.
    type Draft: Send + 'static;
    /// Update payload.
    type Patch: Send + 'static;
    type Filter: ListFilter;

    async fn list(&self, query: &ListQuery<Self::Filter>) -> Result<Listing<Self::Item>, CoreError>;

    async fn create(&self, draft: Self::Draft) -> Result<Self::Item, CoreError>;

    async fn update(&self, id: &str, patch: Self::Patch) -> Result<Self::Item, CoreError>;

    async fn delete(&self, id: &str) -> Result<(), CoreError>;
}

// ── Envelope unwrapping ──────────────────────────────────────────────

/// Payload of a call, or the translated failure.
pub(crate) fn payload<T>(
    result: Result<Envelope<T>, estate_api::Error>,
    fallback: &str,
) -> Result<T, CoreError> {
    let envelope = result.map_err(|e| CoreError::translate(e, fallback))?;
    if !envelope.success {
        return Err(CoreError::rejected(envelope.message, fallback));
    }
    envelope.data.ok_or_else(|| CoreError::Malformed {
        message: envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_owned()),
    })
}

/// Success of a call whose payload is irrelevant; the backend's message on
/// success is passed through.
pub(crate) fn ack<T>(
    result: Result<Envelope<T>, estate_api::Error>,
    fallback: &str,
) -> Result<Option<String>, CoreError> {
    result
        .map_err(|e| CoreError::translate(e, fallback))?
        .into_ack()
        .map_err(|message| CoreError::rejected(message, fallback))
}

/// Normalized listing of a list call.
pub(crate) fn listing<T>(
    result: Result<ListResponse<T>, estate_api::Error>,
    page: u32,
    limit: u32,
    fallback: &str,
) -> Result<Listing<T>, CoreError> {
    result
        .map_err(|e| CoreError::translate(e, fallback))?
        .normalize(page, limit)
        .map_err(|e| match e {
            ListError::Rejected(message) => CoreError::rejected(message, fallback),
            ListError::MissingData(message) => CoreError::Malformed {
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| fallback.to_owned()),
            },
        })
}

/// Fetch and normalize `path` with `query`.
pub(crate) async fn fetch_list<T, F>(
    client: &estate_api::ApiClient,
    path: &str,
    query: &ListQuery<F>,
    fallback: &str,
) -> Result<Listing<T>, CoreError>
where
    T: serde::de::DeserializeOwned,
    F: ListFilter,
{
    let result = client.get_raw::<ListResponse<T>>(path, &query.params()).await;
    listing(result, query.page, query.limit, fallback)
}
