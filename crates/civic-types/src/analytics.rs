use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub open: usize,
    pub assigned: usize,
    pub resolved: usize,
}

/// Complaints created on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub name: Category,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub department: Option<Category>,
    pub status_counts: StatusCounts,
    pub trend: Vec<TrendBucket>,
    pub by_department: Vec<DepartmentCount>,
    pub top_users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenSummary {
    pub total: usize,
    pub resolved: usize,
    pub reward_points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_bucket_serializes_date_only() {
        let bucket = TrendBucket {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            count: 3,
        };
        assert_eq!(
            serde_json::to_string(&bucket).unwrap(),
            r#"{"date":"2024-01-02","count":3}"#
        );
    }
}
