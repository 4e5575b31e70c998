// Settings service: `/admin/settings/...`
//
// Categories are whole documents (`get`/`update`). API keys, email
// templates and social links are independent CRUD sub-resources; backups
// have their own create/restore/delete actions.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use estate_api::models::{
    ApiKey, ApiKeyDraft, BackupRecord, EmailTemplate, EmailTemplateDraft, SettingsCategory,
    SocialLink, SocialLinkDraft,
};
use estate_api::{ApiClient, ListResponse, Listing};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use super::{Collection, Identified, ack, listing, payload};
use crate::error::CoreError;
use crate::filter::{ListQuery, NoFilter};

const PATH: &str = "/admin/settings";
const BACKUPS: &str = "/admin/settings/backups";

/// A CRUD sub-resource under `/admin/settings/{SEGMENT}`.
pub trait SettingsResource: Send + Sync + 'static {
    const SEGMENT: &'static str;
    /// Vietnamese noun used in fallback messages.
    const NOUN: &'static str;
    type Item: Identified + DeserializeOwned + Clone + Send + Sync + 'static;
    type Draft: Serialize + Send + Sync + 'static;
}

pub struct ApiKeys;
pub struct EmailTemplates;
pub struct SocialLinks;

impl SettingsResource for ApiKeys {
    const SEGMENT: &'static str = "api-keys";
    const NOUN: &'static str = "khóa API";
    type Item = ApiKey;
    type Draft = ApiKeyDraft;
}

impl SettingsResource for EmailTemplates {
    const SEGMENT: &'static str = "email-templates";
    const NOUN: &'static str = "mẫu email";
    type Item = EmailTemplate;
    type Draft = EmailTemplateDraft;
}

impl SettingsResource for SocialLinks {
    const SEGMENT: &'static str = "social-links";
    const NOUN: &'static str = "liên kết mạng xã hội";
    type Item = SocialLink;
    type Draft = SocialLinkDraft;
}

#[derive(Clone)]
pub struct SettingsService {
    client: Arc<ApiClient>,
}

impl SettingsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // ── Categories ───────────────────────────────────────────────────

    pub async fn get<S: SettingsCategory>(&self) -> Result<S, CoreError> {
        let result = self.client.get(&format!("{PATH}/{}", S::SEGMENT)).await;
        payload(result, &format!("Không thể tải {}", S::LABEL))
    }

    /// Persist the whole document; returns what the backend stored.
    pub async fn update<S: SettingsCategory>(&self, settings: &S) -> Result<S, CoreError> {
        let result = self
            .client
            .put(&format!("{PATH}/{}", S::SEGMENT), settings)
            .await;
        payload(result, &format!("Không thể lưu {}", S::LABEL))
    }

    /// Ask the backend to send a test message with the stored SMTP config.
    pub async fn send_test_email(&self, to: &str) -> Result<Option<String>, CoreError> {
        let result = self
            .client
            .post::<Value, _>(&format!("{PATH}/email/test"), &json!({ "to": to }))
            .await;
        ack(result, "Không thể gửi email thử nghiệm")
    }

    // ── Sub-resources ────────────────────────────────────────────────

    pub async fn list_items<R: SettingsResource>(&self) -> Result<Vec<R::Item>, CoreError> {
        let result = self
            .client
            .get_raw::<ListResponse<R::Item>>(&format!("{PATH}/{}", R::SEGMENT), &[])
            .await;
        let fallback = format!("Không thể tải danh sách {}", R::NOUN);
        listing(result, 1, 0, &fallback).map(|l| l.items)
    }

    pub async fn create_item<R: SettingsResource>(&self, draft: &R::Draft) -> Result<R::Item, CoreError> {
        let result = self
            .client
            .post(&format!("{PATH}/{}", R::SEGMENT), draft)
            .await;
        payload(result, &format!("Không thể tạo {}", R::NOUN))
    }

    pub async fn update_item<R: SettingsResource>(
        &self,
        id: &str,
        draft: &R::Draft,
    ) -> Result<R::Item, CoreError> {
        let result = self
            .client
            .put(&format!("{PATH}/{}/{id}", R::SEGMENT), draft)
            .await;
        payload(result, &format!("Không thể cập nhật {}", R::NOUN))
    }

    pub async fn delete_item<R: SettingsResource>(&self, id: &str) -> Result<(), CoreError> {
        let result = self
            .client
            .delete::<Value>(&format!("{PATH}/{}/{id}", R::SEGMENT))
            .await;
        ack(result, &format!("Không thể xóa {}", R::NOUN)).map(|_| ())
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, CoreError> {
        self.list_items::<ApiKeys>().await
    }

    /// The returned key is the only time the full secret is visible.
    pub async fn create_api_key(&self, draft: &ApiKeyDraft) -> Result<ApiKey, CoreError> {
        self.create_item::<ApiKeys>(draft).await
    }

    pub async fn update_api_key(&self, id: &str, draft: &ApiKeyDraft) -> Result<ApiKey, CoreError> {
        self.update_item::<ApiKeys>(id, draft).await
    }

    pub async fn delete_api_key(&self, id: &str) -> Result<(), CoreError> {
        self.delete_item::<ApiKeys>(id).await
    }

    pub async fn list_email_templates(&self) -> Result<Vec<EmailTemplate>, CoreError> {
        self.list_items::<EmailTemplates>().await
    }

    pub async fn create_email_template(
        &self,
        draft: &EmailTemplateDraft,
    ) -> Result<EmailTemplate, CoreError> {
        self.create_item::<EmailTemplates>(draft).await
    }

    pub async fn update_email_template(
        &self,
        id: &str,
        draft: &EmailTemplateDraft,
    ) -> Result<EmailTemplate, CoreError> {
        self.update_item::<EmailTemplates>(id, draft).await
    }

    pub async fn delete_email_template(&self, id: &str) -> Result<(), CoreError> {
        self.delete_item::<EmailTemplates>(id).await
    }

    pub async fn list_social_links(&self) -> Result<Vec<SocialLink>, CoreError> {
        self.list_items::<SocialLinks>().await
    }

    pub async fn create_social_link(&self, draft: &SocialLinkDraft) -> Result<SocialLink, CoreError> {
        self.create_item::<SocialLinks>(draft).await
    }

    pub async fn update_social_link(
        &self,
        id: &str,
        draft: &SocialLinkDraft,
    ) -> Result<SocialLink, CoreError> {
        self.update_item::<SocialLinks>(id, draft).await
    }

    pub async fn delete_social_link(&self, id: &str) -> Result<(), CoreError> {
        self.delete_item::<SocialLinks>(id).await
    }

    // ── Backups ──────────────────────────────────────────────────────

    pub async fn list_backups(&self) -> Result<Vec<BackupRecord>, CoreError> {
        let result = self
            .client
            .get_raw::<ListResponse<BackupRecord>>(BACKUPS, &[])
            .await;
        listing(result, 1, 0, "Không thể tải danh sách bản sao lưu").map(|l| l.items)
    }

    /// Start a manual backup.
    pub async fn create_backup(&self) -> Result<BackupRecord, CoreError> {
        let result = self.client.post(BACKUPS, &json!({})).await;
        payload(result, "Không thể tạo bản sao lưu")
    }

    /// Restore the database from backup `id`. Destructive on the backend.
    pub async fn restore_backup(&self, id: &str) -> Result<Option<String>, CoreError> {
        info!(backup = id, "restoring backup");
        let result = self
            .client
            .post::<Value, _>(&format!("{BACKUPS}/{id}/restore"), &json!({}))
            .await;
        ack(result, "Không thể khôi phục bản sao lưu")
    }

    pub async fn delete_backup(&self, id: &str) -> Result<(), CoreError> {
        let result = self
            .client
            .delete::<Value>(&format!("{BACKUPS}/{id}"))
            .await;
        ack(result, "Không thể xóa bản sao lưu").map(|_| ())
    }
}

/// `Collection` view over one settings sub-resource.
pub struct SettingsCollection<R> {
    service: SettingsService,
    _resource: PhantomData<fn() -> R>,
}

impl<R: SettingsResource> SettingsCollection<R> {
    pub fn new(service: SettingsService) -> Self {
        Self {
            service,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for SettingsCollection<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: SettingsResource> Collection for SettingsCollection<R> {
    type Item = R::Item;
    type Draft = R::Draft;
    type Patch = R::Draft;
    type Filter = NoFilter;

    async fn list(&self, query: &ListQuery<NoFilter>) -> Result<Listing<R::Item>, CoreError> {
        let items = self.service.list_items::<R>().await?;
        Ok(Listing {
            total: u64::try_from(items.len()).unwrap_or(u64::MAX),
            page: query.page,
            limit: query.limit,
            items,
        })
    }

    async fn create(&self, draft: R::Draft) -> Result<R::Item, CoreError> {
        self.service.create_item::<R>(&draft).await
    }

    async fn update(&self, id: &str, draft: R::Draft) -> Result<R::Item, CoreError> {
        self.service.update_item::<R>(id, &draft).await
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.service.delete_item::<R>(id).await
    }
}
