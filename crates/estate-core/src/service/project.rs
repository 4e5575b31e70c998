// Project service: `/admin/projects`

use std::sync::Arc;

use async_trait::async_trait;
use estate_api::models::{Project, ProjectDraft};
use estate_api::upload::form_with_images;
use estate_api::{ApiClient, Listing, Method, UploadFile};
use serde_json::Value;
use tracing::debug;

use super::{Collection, ack, fetch_list, payload};
use crate::error::CoreError;
use crate::filter::{ListQuery, ProjectFilter};
use crate::form;
use crate::slug::slugify;

const PATH: &str = "/admin/projects";

/// A project draft plus new image files to upload with it.
#[derive(Debug, Clone, Default)]
pub struct ProjectSubmission {
    pub draft: ProjectDraft,
    pub images: Vec<UploadFile>,
}

impl From<ProjectDraft> for ProjectSubmission {
    fn from(draft: ProjectDraft) -> Self {
        Self {
            draft,
            images: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct ProjectService {
    client: Arc<ApiClient>,
}

impl ProjectService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_projects(
        &self,
        query: &ListQuery<ProjectFilter>,
    ) -> Result<Listing<Project>, CoreError> {
        fetch_list(&self.client, PATH, query, "Không thể tải danh sách dự án").await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, CoreError> {
        let result = self.client.get(&format!("{PATH}/{id}")).await;
        payload(result, "Không thể tải thông tin dự án")
    }

    /// Validate, fill in the slug, and create. With images the request is
    /// multipart; without, plain JSON.
    pub async fn create_project(
        &self,
        mut draft: ProjectDraft,
        images: Vec<UploadFile>,
    ) -> Result<Project, CoreError> {
        form::validate(&draft)?;
        if draft.slug.is_empty() {
            draft.slug = slugify(&draft.name);
        }
        debug!(slug = %draft.slug, images = images.len(), "creating project");

        let result = if images.is_empty() {
            self.client.post(PATH, &draft).await
        } else {
            match form_with_images(&draft, images) {
                Ok(form) => self.client.upload(Method::POST, PATH, form).await,
                Err(e) => Err(e),
            }
        };
        payload(result, "Không thể tạo dự án")
    }

    /// Validate and update. The slug is sent as-is, never regenerated.
    pub async fn update_project(
        &self,
        id: &str,
        draft: ProjectDraft,
        images: Vec<UploadFile>,
    ) -> Result<Project, CoreError> {
        form::validate(&draft)?;
        let path = format!("{PATH}/{id}");

        let result = if images.is_empty() {
            self.client.put(&path, &draft).await
        } else {
            match form_with_images(&draft, images) {
                Ok(form) => self.client.upload(Method::PUT, &path, form).await,
                Err(e) => Err(e),
            }
        };
        payload(result, "Không thể cập nhật dự án")
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), CoreError> {
        let result = self.client.delete::<Value>(&format!("{PATH}/{id}")).await;
        ack(result, "Không thể xóa dự án").map(|_| ())
    }
}

#[async_trait]
impl Collection for ProjectService {
    type Item = Project;
    type Draft = ProjectSubmission;
    type Patch = ProjectSubmission;
    type Filter = ProjectFilter;

    async fn list(&self, query: &ListQuery<ProjectFilter>) -> Result<Listing<Project>, CoreError> {
        self.get_projects(query).await
    }

    async fn create(&self, submission: ProjectSubmission) -> Result<Project, CoreError> {
        self.create_project(submission.draft, submission.images).await
    }

    async fn update(&self, id: &str, submission: ProjectSubmission) -> Result<Project, CoreError> {
        self.update_project(id, submission.draft, submission.images)
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.delete_project(id).await
    }
}
