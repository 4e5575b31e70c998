// Company info service: `/admin/company-info/{section}`

use std::sync::Arc;

use estate_api::ApiClient;
use estate_api::models::{CompanyInfo, CompanySection};

use super::payload;
use crate::error::CoreError;

const PATH: &str = "/admin/company-info";

#[derive(Clone)]
pub struct CompanyService {
    client: Arc<ApiClient>,
}

impl CompanyService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_section(&self, section: CompanySection) -> Result<CompanyInfo, CoreError> {
        let result = self.client.get(&format!("{PATH}/{section}")).await;
        payload(result, "Không thể tải thông tin công ty")
    }

    pub async fn update_section(
        &self,
        section: CompanySection,
        info: &CompanyInfo,
    ) -> Result<CompanyInfo, CoreError> {
        let result = self.client.put(&format!("{PATH}/{section}"), info).await;
        payload(result, "Không thể lưu thông tin công ty")
    }
}
