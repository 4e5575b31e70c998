// Editorial content: news articles, products, job postings, company info
//
// These resources share the project conventions (camelCase keys, `_id`
// accepted for `id`, lenient defaults on list projections) but carry no
// client-side rules beyond what the backend enforces.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use super::project::default_true;

// ── News ─────────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsDraft {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub status: PublishStatus,
    pub is_featured: bool,
}

impl From<&NewsArticle> for NewsDraft {
    fn from(a: &NewsArticle) -> Self {
        Self {
            title: a.title.clone(),
            slug: a.slug.clone(),
            excerpt: a.excerpt.clone(),
            content: a.content.clone(),
            category: a.category.clone(),
            thumbnail: a.thumbnail.clone(),
            tags: a.tags.clone(),
            status: a.status,
            is_featured: a.is_featured,
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form key/value specification sheet.
    #[serde(default)]
    pub specifications: Map<String, Value>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub images: Vec<String>,
    pub specifications: Map<String, Value>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            slug: p.slug.clone(),
            description: p.description.clone(),
            category: p.category.clone(),
            price: p.price,
            images: p.images.clone(),
            specifications: p.specifications.clone(),
            is_featured: p.is_featured,
            is_active: p.is_active,
        }
    }
}

// ── Careers ──────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub employment_type: EmploymentType,
    /// Display string, e.g. "15 - 25 triệu".
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerDraft {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
}

impl From<&Career> for CareerDraft {
    fn from(c: &Career) -> Self {
        Self {
            title: c.title.clone(),
            slug: c.slug.clone(),
            department: c.department.clone(),
            location: c.location.clone(),
            employment_type: c.employment_type,
            salary: c.salary.clone(),
            description: c.description.clone(),
            requirements: c.requirements.clone(),
            benefits: c.benefits.clone(),
            deadline: c.deadline,
            is_active: c.is_active,
        }
    }
}

// ── Company info ─────────────────────────────────────────────────────

/// Sections of the public "about the company" pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CompanySection {
    General,
    History,
    Leadership,
    Achievements,
    Partners,
    Contact,
}

/// One company-info section. The shape differs per section, so everything
/// beyond the common header is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
