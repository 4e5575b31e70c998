// Dashboard overview
//
// Every counter defaults to zero: the overview endpoint omits sections the
// admin has no data for yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contact::Contact;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStats {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
    pub featured: u64,
    pub total_units: u64,
    pub sold_units: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentStats {
    pub news: u64,
    pub products: u64,
    pub careers: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactStats {
    pub total: u64,
    pub unread: u64,
    pub this_month: u64,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload of `/admin/dashboard/overview`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardOverview {
    pub projects: ProjectStats,
    pub content: ContentStats,
    pub contacts: ContactStats,
    pub recent_contacts: Vec<Contact>,
    pub recent_activity: Vec<Activity>,
}

impl ProjectStats {
    /// Percentage of units sold, `0.0` when nothing is on the market.
    #[allow(clippy::cast_precision_loss)]
    pub fn sales_rate(&self) -> f64 {
        if self.total_units == 0 {
            return 0.0;
        }
        self.sold_units as f64 / self.total_units as f64 * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_overview_fills_zeroes() {
        let overview: DashboardOverview =
            serde_json::from_str(r#"{"projects":{"total":4,"totalUnits":200,"soldUnits":50}}"#)
                .unwrap();
        assert_eq!(overview.projects.total, 4);
        assert_eq!(overview.contacts.unread, 0);
        assert!((overview.projects.sales_rate() - 25.0).abs() < f64::EPSILON);
    }
}
