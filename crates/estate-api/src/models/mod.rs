// Wire models for the admin REST API

pub mod auth;
pub mod contact;
pub mod content;
pub mod dashboard;
pub mod project;
pub mod settings;

pub use auth::{AdminUser, LoginRequest, LoginResponse};
pub use contact::{Contact, ContactStatus, ContactSubmission, ContactUpdate};
pub use content::{
    Career, CareerDraft, CompanyInfo, CompanySection, EmploymentType, NewsArticle, NewsDraft,
    Product, ProductDraft, PublishStatus,
};
pub use dashboard::{Activity, ContactStats, ContentStats, DashboardOverview, ProjectStats};
pub use project::{
    AreaRange, Coordinates, PriceRange, Project, ProjectDraft, ProjectStatus, ProjectType, SeoMeta,
};
pub use settings::{
    ApiKey, ApiKeyDraft, ApiSettings, BackupFrequency, BackupRecord, BackupSettings, CorsSettings,
    EmailSettings, EmailTemplate, EmailTemplateDraft, GeneralSettings, RateLimit, SettingsCategory,
    SmtpSettings, SocialLink, SocialLinkDraft, SocialSettings,
};
