// Dashboard service: `/admin/dashboard/overview`
//
// Background-safe: a 401 here surfaces as `CoreError::Unauthorized` and the
// session is left alone.

use std::sync::Arc;

use estate_api::ApiClient;
use estate_api::models::DashboardOverview;

use super::payload;
use crate::error::CoreError;

const OVERVIEW: &str = "/admin/dashboard/overview";

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn overview(&self) -> Result<DashboardOverview, CoreError> {
        let result = self.client.get(OVERVIEW).await;
        payload(result, "Không thể tải dữ liệu tổng quan")
    }
}
