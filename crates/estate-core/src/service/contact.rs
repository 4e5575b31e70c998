// Contact service: `/admin/contacts` for triage, `/client/contacts` for the
// public form

use std::sync::Arc;

use async_trait::async_trait;
use estate_api::models::{Contact, ContactSubmission, ContactUpdate};
use estate_api::{ApiClient, Listing};
use serde_json::Value;

use super::{Collection, ack, fetch_list, payload};
use crate::error::CoreError;
use crate::filter::{ContactFilter, ListQuery};

const ADMIN_PATH: &str = "/admin/contacts";
const PUBLIC_PATH: &str = "/client/contacts";

#[derive(Clone)]
pub struct ContactService {
    client: Arc<ApiClient>,
}

impl ContactService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery<ContactFilter>) -> Result<Listing<Contact>, CoreError> {
        fetch_list(&self.client, ADMIN_PATH, query, "Không thể tải danh sách liên hệ").await
    }

    pub async fn get(&self, id: &str) -> Result<Contact, CoreError> {
        let result = self.client.get(&format!("{ADMIN_PATH}/{id}")).await;
        payload(result, "Không thể tải liên hệ")
    }

    /// Change triage status and/or internal note.
    pub async fn update(&self, id: &str, update: &ContactUpdate) -> Result<Contact, CoreError> {
        let result = self.client.put(&format!("{ADMIN_PATH}/{id}"), update).await;
        payload(result, "Không thể cập nhật liên hệ")
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let result = self
            .client
            .delete::<Value>(&format!("{ADMIN_PATH}/{id}"))
            .await;
        ack(result, "Không thể xóa liên hệ").map(|_| ())
    }

    /// Post the public contact form. Works without a session.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<Contact, CoreError> {
        let result = self.client.post(PUBLIC_PATH, submission).await;
        payload(result, "Không thể gửi liên hệ, vui lòng thử lại")
    }
}

#[async_trait]
impl Collection for ContactService {
    type Item = Contact;
    /// Contacts are only ever created through the public form.
    type Draft = ContactSubmission;
    type Patch = ContactUpdate;
    type Filter = ContactFilter;

    async fn list(&self, query: &ListQuery<ContactFilter>) -> Result<Listing<Contact>, CoreError> {
        ContactService::list(self, query).await
    }

    async fn create(&self, submission: ContactSubmission) -> Result<Contact, CoreError> {
        self.submit(&submission).await
    }

    async fn update(&self, id: &str, update: ContactUpdate) -> Result<Contact, CoreError> {
        ContactService::update(self, id, &update).await
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        ContactService::delete(self, id).await
    }
}
