// Project (property listing) models
//
// Field names follow the backend's camelCase JSON. Identifiers arrive as
// Mongo-style `_id`; some handlers also echo `id`, so both are accepted.
// Most fields carry `#[serde(default)]` because list endpoints return
// trimmed projections of the full document.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

// ── Enumerations ─────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Apartment,
    Villa,
    Office,
    Commercial,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Construction,
    Completed,
    SoldOut,
}

// ── Value objects ────────────────────────────────────────────────────

/// Asking price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "VND".into()
}

/// Floor area range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default = "default_area_unit")]
    pub unit: String,
}

impl Default for AreaRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            unit: default_area_unit(),
        }
    }
}

fn default_area_unit() -> String {
    "m2".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

// ── Project ──────────────────────────────────────────────────────────

/// A project as returned by `/admin/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Rich-text body (HTML).
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub price: PriceRange,
    #[serde(default)]
    pub area: AreaRange,
    /// Ordered; the first image is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub total_units: u32,
    /// Should never exceed `total_units`; the backend owns that rule.
    #[serde(default)]
    pub sold_units: u32,
    /// Computed by the backend, in percent.
    #[serde(default)]
    pub sales_rate: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo: Option<SeoMeta>,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_true() -> bool {
    true
}

impl Project {
    /// Units still on the market.
    pub fn available_units(&self) -> u32 {
        self.total_units.saturating_sub(self.sold_units)
    }
}

// ── Create / update payload ──────────────────────────────────────────

/// Create/update payload for a project.
///
/// Validation rules run client-side before any request; see
/// `estate_core::form`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_completion_date"))]
pub struct ProjectDraft {
    #[validate(length(min = 1, message = "Vui lòng nhập tên dự án"))]
    pub name: String,
    /// Generated from `name` on create when left empty; never regenerated
    /// on update.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[validate(length(min = 1, message = "Vui lòng nhập vị trí dự án"))]
    pub location: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    #[validate(custom(function = "validate_price_range"))]
    pub price: PriceRange,
    #[validate(custom(function = "validate_area_range"))]
    pub area: AreaRange,
    /// Already-uploaded image URLs to keep, in display order.
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub total_units: u32,
    pub sold_units: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub is_featured: bool,
    pub is_active: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
}

impl From<&Project> for ProjectDraft {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            slug: p.slug.clone(),
            description: p.description.clone(),
            content: p.content.clone(),
            location: p.location.clone(),
            project_type: p.project_type,
            status: p.status,
            price: p.price.clone(),
            area: p.area.clone(),
            images: p.images.clone(),
            features: p.features.clone(),
            amenities: p.amenities.clone(),
            total_units: p.total_units,
            sold_units: p.sold_units,
            coordinates: p.coordinates,
            is_featured: p.is_featured,
            is_active: p.is_active,
            tags: p.tags.clone(),
            seo: p.seo.clone(),
            completion_date: p.completion_date,
        }
    }
}

// ── Client-side rules ────────────────────────────────────────────────

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Maximum price must be strictly greater than the minimum.
fn validate_price_range(price: &PriceRange) -> Result<(), ValidationError> {
    if price.min < 0.0 {
        return Err(rule("price_negative", "Giá không được âm"));
    }
    if price.max <= price.min {
        return Err(rule("price_range", "Giá tối đa phải lớn hơn giá tối thiểu"));
    }
    Ok(())
}

/// Maximum area must be strictly greater than the minimum.
fn validate_area_range(area: &AreaRange) -> Result<(), ValidationError> {
    if area.min < 0.0 {
        return Err(rule("area_negative", "Diện tích không được âm"));
    }
    if area.max <= area.min {
        return Err(rule(
            "area_range",
            "Diện tích tối đa phải lớn hơn diện tích tối thiểu",
        ));
    }
    Ok(())
}

/// Until a project is completed its completion date lies in the future.
fn validate_completion_date(draft: &ProjectDraft) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    match draft.completion_date {
        Some(date) if draft.status != ProjectStatus::Completed && date <= today => Err(rule(
            "completion_date",
            "Ngày hoàn thành dự kiến phải ở trong tương lai",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_mongo_document() {
        let project: Project = serde_json::from_value(json!({
            "_id": "66a1",
            "name": "Sunrise Riverside",
            "slug": "sunrise-riverside",
            "type": "apartment",
            "status": "sold_out",
            "price": { "min": 2.5e9, "max": 4.0e9, "currency": "VND" },
            "area": { "min": 55, "max": 120 },
            "totalUnits": 300,
            "soldUnits": 280,
            "isFeatured": true
        }))
        .unwrap();

        assert_eq!(project.id, "66a1");
        assert_eq!(project.status, ProjectStatus::SoldOut);
        assert_eq!(project.area.unit, "m2");
        assert!(project.is_active);
        assert_eq!(project.available_units(), 20);
    }

    #[test]
    fn enum_strings_match_wire_format() {
        assert_eq!(ProjectStatus::SoldOut.to_string(), "sold_out");
        assert_eq!("villa".parse::<ProjectType>().unwrap(), ProjectType::Villa);
    }

    #[test]
    fn draft_serializes_type_key_and_skips_empty_slug() {
        let draft = ProjectDraft {
            name: "A".into(),
            project_type: ProjectType::Office,
            ..ProjectDraft::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "office");
        assert!(value.get("slug").is_none());
        assert_eq!(value["totalUnits"], 0);
    }
}
