// Admin authentication models

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Credentials posted to `/admin/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

fn expose<S: Serializer>(value: &SecretString, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(value.expose_secret())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// `data` of a successful login.
///
/// Older handlers name the token `token` instead of `accessToken`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn login_request_sends_password_in_clear() {
        let req = LoginRequest {
            email: "admin@example.com".into(),
            password: SecretString::from("s3cret"),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["password"], "s3cret");
        assert!(!format!("{req:?}").contains("s3cret"));
    }

    #[test]
    fn legacy_token_field_is_accepted() {
        let resp: LoginResponse = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(resp.access_token, "abc");
        assert!(resp.user.is_none());
    }
}
