// System settings models
//
// Each settings category is one mutable document, fetched once and written
// back wholesale. Fields this crate does not model are kept in `extra` so
// a round trip never drops what a newer backend added.
//
// Sub-resources (API keys, email templates, social links, backups) have
// their own CRUD endpoints under the same prefix.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::project::default_true;

/// A settings document addressable at `/admin/settings/{SEGMENT}`.
pub trait SettingsCategory:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    /// Path segment under `/admin/settings/`.
    const SEGMENT: &'static str;
    /// Human-readable name used in user-facing messages.
    const LABEL: &'static str;
}

fn expose_secret<S: Serializer>(value: &Option<SecretString>, ser: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(secret) => ser.serialize_some(secret.expose_secret()),
        None => ser.serialize_none(),
    }
}

fn secret_from_str<'de, D: Deserializer<'de>>(de: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(de)?.map(SecretString::from))
}

// ── General ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub site_name: String,
    pub site_description: String,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub timezone: String,
    pub language: String,
    pub maintenance_mode: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsCategory for GeneralSettings {
    const SEGMENT: &'static str = "general";
    const LABEL: &'static str = "cài đặt chung";
}

// ── API ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimit {
    pub enabled: bool,
    pub window_ms: u64,
    pub max_requests: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 15 * 60 * 1000,
            max_requests: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsSettings {
    pub enabled: bool,
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub credentials: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    pub api_version: String,
    pub enable_logging: bool,
    pub rate_limit: RateLimit,
    pub cors: CorsSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsCategory for ApiSettings {
    const SEGMENT: &'static str = "api";
    const LABEL: &'static str = "cài đặt API";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Masked by the backend except in the create response.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDraft {
    pub name: String,
    pub permissions: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

// ── Email ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (port 465) as opposed to STARTTLS.
    pub secure: bool,
    pub username: String,
    #[serde(
        serialize_with = "expose_secret",
        deserialize_with = "secret_from_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            secure: false,
            username: String::new(),
            password: None,
        }
    }
}

impl PartialEq for SmtpSettings {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.secure == other.secure
            && self.username == other.username
            && self.password.as_ref().map(ExposeSecret::expose_secret)
                == other.password.as_ref().map(ExposeSecret::expose_secret)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub smtp: SmtpSettings,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: Option<String>,
    pub enable_notifications: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsCategory for EmailSettings {
    const SEGMENT: &'static str = "email";
    const LABEL: &'static str = "cài đặt email";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    /// HTML body with `{{variable}}` placeholders.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateDraft {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub variables: Vec<String>,
    pub is_active: bool,
}

// ── Social ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialSettings {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
    pub zalo: Option<String>,
    pub share_buttons_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsCategory for SocialSettings {
    const SEGMENT: &'static str = "social";
    const LABEL: &'static str = "cài đặt mạng xã hội";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[serde(alias = "_id")]
    pub id: String,
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkDraft {
    pub platform: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: u32,
    pub is_active: bool,
}

// ── Backup ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackupFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupSettings {
    pub auto_backup: bool,
    pub frequency: BackupFrequency,
    /// Local time of day, `HH:MM`.
    pub backup_time: String,
    pub retention_days: u32,
    pub include_uploads: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            auto_backup: false,
            frequency: BackupFrequency::Daily,
            backup_time: "02:00".into(),
            retention_days: 30,
            include_uploads: true,
            extra: Map::new(),
        }
    }
}

impl SettingsCategory for BackupSettings {
    const SEGMENT: &'static str = "backup";
    const LABEL: &'static str = "cài đặt sao lưu";
}

/// One stored backup archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    /// Bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: String,
    /// `manual` or `auto`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
