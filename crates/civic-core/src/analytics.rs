//! Derived views over a complaint collection. Everything here is a pure
//! function of its input: no store access, no clock.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use civic_types::analytics::{AnalyticsSnapshot, DepartmentCount, StatusCounts, TrendBucket};
use civic_types::models::{Category, Complaint, ComplaintStatus, User};

/// The department axis charted by the analytics page.
pub const DEPARTMENTS: [Category; 7] = Category::ALL;

/// How many citizens the analytics page lists by default.
pub const DEFAULT_TOP_USERS: usize = 5;

/// Complaints whose requested category is `department`, or all of them.
pub fn filter_by_department(
    complaints: &[Complaint],
    department: Option<Category>,
) -> Vec<&Complaint> {
    complaints
        .iter()
        .filter(|c| department.is_none_or(|d| c.category == d))
        .collect()
}

pub fn status_counts<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for complaint in complaints {
        match complaint.status {
            ComplaintStatus::Open => counts.open += 1,
            ComplaintStatus::Assigned => counts.assigned += 1,
            ComplaintStatus::Resolved => counts.resolved += 1,
        }
    }
    counts
}

/// Complaints per UTC calendar day, oldest day first. Days without
/// complaints are not emitted.
pub fn daily_trend<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Vec<TrendBucket> {
    let mut days = BTreeMap::new();
    for complaint in complaints {
        *days.entry(complaint.created_at.date_naive()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, count)| TrendBucket { date, count })
        .collect()
}

/// One entry per department in `departments`, zero counts included, so a
/// chart always gets a complete axis.
pub fn by_department<'a>(
    complaints: impl IntoIterator<Item = &'a Complaint>,
    departments: &[Category],
) -> Vec<DepartmentCount> {
    let mut counts: Vec<DepartmentCount> = departments
        .iter()
        .map(|&name| DepartmentCount { name, count: 0 })
        .collect();

    for complaint in complaints {
        if let Some(entry) = counts.iter_mut().find(|d| d.name == complaint.category) {
            entry.count += 1;
        }
    }
    counts
}

/// The `n` users with the most points. Equal balances keep their input order.
pub fn top_users(users: &[User], n: usize) -> Vec<User> {
    let mut ranked = users.to_vec();
    ranked.sort_by_key(|u| Reverse(u.reward_points));
    ranked.truncate(n);
    ranked
}

/// Everything the admin analytics page shows, for one department filter.
pub fn analytics_snapshot(
    complaints: &[Complaint],
    users: &[User],
    department: Option<Category>,
    top_n: usize,
) -> AnalyticsSnapshot {
    let filtered = filter_by_department(complaints, department);

    AnalyticsSnapshot {
        department,
        status_counts: status_counts(filtered.iter().copied()),
        trend: daily_trend(filtered.iter().copied()),
        by_department: by_department(filtered.iter().copied(), &DEPARTMENTS),
        top_users: top_users(users, top_n),
    }
}
