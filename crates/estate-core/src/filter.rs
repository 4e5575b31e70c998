// ── List filters ──
//
// Filter state per resource. A field left at its "no constraint" value
// (`Choice::All`, an empty string, `None`) is never sent to the backend.

use std::fmt;
use std::str::FromStr;

use estate_api::models::{ContactStatus, EmploymentType, ProjectStatus, ProjectType, PublishStatus};

/// Sentinel string for `Choice::All` in URLs and select boxes.
pub const ALL: &str = "all";

/// A categorical filter value: either unconstrained or one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Choice<T> {
    pub fn only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(v) => v.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Query parameters a filter contributes.
pub trait ListFilter: Clone + PartialEq + Default + Send + Sync + 'static {
    fn params(&self) -> Vec<(&'static str, String)>;
}

// ── Param builders ───────────────────────────────────────────────────

fn push_text(params: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        params.push((key, value.to_owned()));
    }
}

fn push_choice<T: fmt::Display>(params: &mut Vec<(&'static str, String)>, key: &'static str, value: &Choice<T>) {
    if let Choice::Only(v) = value {
        params.push((key, v.to_string()));
    }
}

fn push_number(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<f64>) {
    if let Some(v) = value {
        params.push((key, v.to_string()));
    }
}

// ── Pagination ───────────────────────────────────────────────────────

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Page, page size and filter of one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub filter: F,
}

impl<F: Default> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filter: F::default(),
        }
    }
}

impl<F: ListFilter> ListQuery<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Filter params followed by `page` and `limit`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter.params();
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

// ── Per-resource filters ─────────────────────────────────────────────

/// Resources that are listed whole (settings sub-resources).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl ListFilter for NoFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: String,
    pub project_type: Choice<ProjectType>,
    pub status: Choice<ProjectStatus>,
    pub location: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
}

impl ListFilter for ProjectFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "search", &self.search);
        push_choice(&mut params, "type", &self.project_type);
        push_choice(&mut params, "status", &self.status);
        push_text(&mut params, "location", &self.location);
        push_number(&mut params, "minPrice", self.min_price);
        push_number(&mut params, "maxPrice", self.max_price);
        push_number(&mut params, "minArea", self.min_area);
        push_number(&mut params, "maxArea", self.max_area);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    pub search: String,
    pub category: String,
    pub status: Choice<PublishStatus>,
}

impl ListFilter for NewsFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "search", &self.search);
        push_text(&mut params, "category", &self.category);
        push_choice(&mut params, "status", &self.status);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: String,
    pub category: String,
}

impl ListFilter for ProductFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "search", &self.search);
        push_text(&mut params, "category", &self.category);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareerFilter {
    pub search: String,
    pub employment_type: Choice<EmploymentType>,
    pub location: String,
}

impl ListFilter for CareerFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "search", &self.search);
        push_choice(&mut params, "type", &self.employment_type);
        push_text(&mut params, "location", &self.location);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: String,
    pub status: Choice<ContactStatus>,
}

impl ListFilter for ContactFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "search", &self.search);
        push_choice(&mut params, "status", &self.status);
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_project_filter_sends_only_paging() {
        let query = ListQuery::new(ProjectFilter::default());
        assert_eq!(
            query.params(),
            vec![("page", "1".to_owned()), ("limit", "10".to_owned())]
        );
    }

    #[test]
    fn constrained_fields_become_params() {
        let filter = ProjectFilter {
            search: "  riverside ".into(),
            project_type: Choice::Only(ProjectType::Villa),
            status: Choice::All,
            min_price: Some(2_500_000_000.0),
            max_area: Some(120.5),
            ..ProjectFilter::default()
        };
        assert_eq!(
            filter.params(),
            vec![
                ("search", "riverside".to_owned()),
                ("type", "villa".to_owned()),
                ("minPrice", "2500000000".to_owned()),
                ("maxArea", "120.5".to_owned()),
            ]
        );
    }

    #[test]
    fn choice_parses_all_sentinel() {
        assert_eq!("all".parse::<Choice<ProjectStatus>>().unwrap(), Choice::All);
        assert_eq!(
            "sold_out".parse::<Choice<ProjectStatus>>().unwrap(),
            Choice::Only(ProjectStatus::SoldOut)
        );
        assert_eq!(Choice::<ProjectStatus>::All.to_string(), "all");
        assert!("bogus".parse::<Choice<ProjectStatus>>().is_err());
    }
}
