// ── Client-side form validation ──
//
// Drafts carry `validator` rules; this module turns a failed run into a
// flat field → message map that a form can render inline.

use std::collections::BTreeMap;
use std::fmt;

use validator::{Validate, ValidationErrors};

/// Key under which `validator` files struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

/// Per-field validation messages, first failure per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, list) in errors.field_errors() {
            for err in list {
                // Schema-level rules are keyed by their code instead.
                let key = if field == SCHEMA_KEY {
                    err.code.to_string()
                } else {
                    field.to_string()
                };
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), ToString::to_string);
                out.insert(key, message);
            }
        }
        out
    }
}

/// Run `value`'s rules.
pub fn validate<T: Validate>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(|e| FieldErrors::from(&e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use estate_api::models::{AreaRange, PriceRange, ProjectDraft, ProjectStatus};
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft(price: (f64, f64), area: (f64, f64)) -> ProjectDraft {
        ProjectDraft {
            name: "Sunrise Riverside".into(),
            location: "Quận 7".into(),
            price: PriceRange {
                min: price.0,
                max: price.1,
                ..PriceRange::default()
            },
            area: AreaRange {
                min: area.0,
                max: area.1,
                ..AreaRange::default()
            },
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn equal_price_bounds_are_rejected() {
        let errors = validate(&draft((100.0, 100.0), (50.0, 80.0))).unwrap_err();
        assert_eq!(
            errors.get("price"),
            Some("Giá tối đa phải lớn hơn giá tối thiểu")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn strictly_greater_price_is_accepted() {
        assert!(validate(&draft((100.0, 101.0), (50.0, 80.0))).is_ok());
    }

    #[test]
    fn inverted_or_equal_area_bounds_are_rejected() {
        for area in [(50.0, 49.0), (50.0, 50.0)] {
            let errors = validate(&draft((1.0, 2.0), area)).unwrap_err();
            assert_eq!(
                errors.get("area"),
                Some("Diện tích tối đa phải lớn hơn diện tích tối thiểu")
            );
        }
    }

    #[test]
    fn negative_minimum_is_rejected() {
        let errors = validate(&draft((-1.0, 2.0), (50.0, 80.0))).unwrap_err();
        assert_eq!(errors.get("price"), Some("Giá không được âm"));
    }

    #[test]
    fn missing_name_and_location_are_reported() {
        let mut d = draft((1.0, 2.0), (1.0, 2.0));
        d.name.clear();
        d.location.clear();
        let errors = validate(&d).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("location"));
    }

    #[test]
    fn unfinished_project_needs_future_completion_date() {
        let today = Utc::now().date_naive();
        let mut d = draft((1.0, 2.0), (1.0, 2.0));

        d.status = ProjectStatus::Planning;
        d.completion_date = Some(today - Duration::days(365));
        let errors = validate(&d).unwrap_err();
        assert_eq!(
            errors.get("completion_date"),
            Some("Ngày hoàn thành dự kiến phải ở trong tương lai")
        );

        d.status = ProjectStatus::Construction;
        assert!(validate(&d).unwrap_err().contains("completion_date"));

        // Today is not in the future.
        d.completion_date = Some(today);
        assert!(validate(&d).unwrap_err().contains("completion_date"));

        d.completion_date = Some(today + Duration::days(30));
        assert!(validate(&d).is_ok());

        d.completion_date = None;
        assert!(validate(&d).is_ok());
    }

    #[test]
    fn completed_project_may_carry_past_date() {
        let mut d = draft((1.0, 2.0), (1.0, 2.0));
        d.status = ProjectStatus::Completed;
        d.completion_date = Some(Utc::now().date_naive() - Duration::days(365));
        assert!(validate(&d).is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.insert("a", "một");
        errors.insert("b", "hai");
        errors.insert("a", "ignored");
        assert_eq!(errors.to_string(), "một; hai");
    }
}
