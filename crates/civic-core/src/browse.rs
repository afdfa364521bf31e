use std::cmp::Reverse;

use uuid::Uuid;

use civic_types::analytics::CitizenSummary;
use civic_types::api::{ComplaintListQuery, ComplaintSort};
use civic_types::models::{Category, Complaint, ComplaintStatus, User};

/// Narrows a complaint listing. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<Category>,
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
    pub user_id: Option<Uuid>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|s| complaint.status == s)
            && self.category.is_none_or(|c| complaint.category == c)
            && self.user_id.is_none_or(|u| complaint.user_id == u)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                complaint.title.to_lowercase().contains(&needle)
                    || complaint.description.to_lowercase().contains(&needle)
            })
    }
}

impl From<ComplaintListQuery> for ComplaintFilter {
    fn from(query: ComplaintListQuery) -> Self {
        Self {
            status: query.status,
            category: query.category,
            search: query.search.filter(|s| !s.trim().is_empty()),
            user_id: query.user_id,
        }
    }
}

/// Filters, then orders. Both orders are stable.
pub fn browse(
    complaints: Vec<Complaint>,
    filter: &ComplaintFilter,
    sort: ComplaintSort,
) -> Vec<Complaint> {
    let mut selected: Vec<Complaint> =
        complaints.into_iter().filter(|c| filter.matches(c)).collect();
    match sort {
        ComplaintSort::MostRecent => selected.sort_by_key(|c| Reverse(c.created_at)),
        ComplaintSort::MostVoted => selected.sort_by_key(|c| Reverse(c.votes())),
    }
    selected
}

pub fn citizen_summary(complaints: &[Complaint], user: &User) -> CitizenSummary {
    let own = complaints.iter().filter(|c| c.user_id == user.id);
    let (total, resolved) = own.fold((0, 0), |(total, resolved), c| {
        let done = usize::from(c.status == ComplaintStatus::Resolved);
        (total + 1, resolved + done)
    });

    CitizenSummary {
        total,
        resolved,
        reward_points: user.reward_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, complaint, user_with_points};

    fn sample() -> Vec<Complaint> {
        let mut pothole = complaint(Category::Roads, ComplaintStatus::Open, at(2024, 1, 1, 0));
        pothole.title = "Pothole on 5th Cross".into();
        pothole.voted_by = vec![Uuid::new_v4(), Uuid::new_v4()];

        let mut leak = complaint(Category::Water, ComplaintStatus::Resolved, at(2024, 1, 3, 0));
        leak.title = "Pipe leak".into();
        leak.description = "Water gushing near the POTHOLE repair".into();

        let mut lamp = complaint(Category::Electricity, ComplaintStatus::Open, at(2024, 1, 2, 0));
        lamp.title = "Lamp out".into();
        lamp.voted_by = vec![Uuid::new_v4(), Uuid::new_v4()];

        vec![pothole, leak, lamp]
    }

    fn titles(complaints: &[Complaint]) -> Vec<&str> {
        complaints.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn most_recent_first() {
        let sorted = browse(sample(), &ComplaintFilter::default(), ComplaintSort::MostRecent);
        assert_eq!(titles(&sorted), vec!["Pipe leak", "Lamp out", "Pothole on 5th Cross"]);
    }

    #[test]
    fn most_voted_keeps_ties_in_input_order() {
        let sorted = browse(sample(), &ComplaintFilter::default(), ComplaintSort::MostVoted);
        assert_eq!(titles(&sorted), vec!["Pothole on 5th Cross", "Lamp out", "Pipe leak"]);
    }

    #[test]
    fn search_covers_title_and_description_case_insensitively() {
        let filter = ComplaintFilter {
            search: Some("pothole".into()),
            ..Default::default()
        };
        let found = browse(sample(), &filter, ComplaintSort::MostRecent);
        assert_eq!(titles(&found), vec!["Pipe leak", "Pothole on 5th Cross"]);
    }

    #[test]
    fn filters_combine() {
        let filter = ComplaintFilter {
            status: Some(ComplaintStatus::Open),
            category: Some(Category::Electricity),
            ..Default::default()
        };
        let found = browse(sample(), &filter, ComplaintSort::MostRecent);
        assert_eq!(titles(&found), vec!["Lamp out"]);
    }

    #[test]
    fn blank_search_from_query_matches_everything() {
        let filter = ComplaintFilter::from(ComplaintListQuery {
            search: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(browse(sample(), &filter, ComplaintSort::MostRecent).len(), 3);
    }

    #[test]
    fn summary_counts_only_the_users_complaints() {
        let user = user_with_points("Tara", 40);
        let mut complaints = sample();
        complaints[0].user_id = user.id;
        complaints[1].user_id = user.id;

        assert_eq!(
            citizen_summary(&complaints, &user),
            CitizenSummary {
                total: 2,
                resolved: 1,
                reward_points: 40,
            }
        );
    }
}
