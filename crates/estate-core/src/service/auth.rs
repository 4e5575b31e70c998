// Admin authentication: `/admin/auth/...`
//
// A successful login stores the bearer token under `accessToken`; every
// later request picks it up from the session store.

use std::sync::Arc;

use estate_api::ApiClient;
use estate_api::models::{AdminUser, LoginRequest, LoginResponse};
use secrecy::SecretString;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::payload;
use crate::error::CoreError;

const LOGIN: &str = "/admin/auth/login";
const ME: &str = "/admin/auth/me";
const LOGOUT: &str = "/admin/auth/logout";

#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist it.
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Option<AdminUser>, CoreError> {
        let request = LoginRequest {
            email: email.to_owned(),
            password,
        };
        let result = self.client.post(LOGIN, &request).await;
        let response: LoginResponse = payload(result, "Email hoặc mật khẩu không đúng")?;

        self.client
            .store()
            .set_access_token(&response.access_token)
            .map_err(|e| CoreError::translate(e, "Không thể lưu phiên đăng nhập"))?;
        info!(email, "logged in");
        Ok(response.user)
    }

    /// The admin the current token belongs to.
    pub async fn me(&self) -> Result<AdminUser, CoreError> {
        let result = self.client.get(ME).await;
        payload(result, "Không thể tải thông tin tài khoản")
    }

    /// Tell the backend, then drop local session state regardless of the
    /// answer.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.client.post::<Value, _>(LOGOUT, &json!({})).await {
            warn!(error = %e, "logout request failed; clearing local session anyway");
        }
        self.client.cookies().clear();
        self.client
            .store()
            .clear()
            .map_err(|e| CoreError::translate(e, "Không thể xóa phiên đăng nhập"))?;
        info!("logged out");
        Ok(())
    }
}
