use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raised when a stored or submitted string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// -- Category --

/// Requested topic of a complaint. Doubles as the routing department an
/// administrator assigns, so the same enumeration backs both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Roads,
    Water,
    Waste,
    Electricity,
    Parks,
    Traffic,
    Other,
}

impl Category {
    /// Every department in display order. Charts use this as their axis.
    pub const ALL: [Category; 7] = [
        Category::Roads,
        Category::Water,
        Category::Waste,
        Category::Electricity,
        Category::Parks,
        Category::Traffic,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Roads => "Roads",
            Category::Water => "Water",
            Category::Waste => "Waste",
            Category::Electricity => "Electricity",
            Category::Parks => "Parks",
            Category::Traffic => "Traffic",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Status --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Open,
    Assigned,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::Assigned => "assigned",
            ComplaintStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ComplaintStatus::Open),
            "assigned" => Ok(ComplaintStatus::Assigned),
            "resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(UnknownVariant::new("status", s)),
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Role --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Role::Citizen),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

// -- Records --

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Complaints with more votes than this are flagged as trending.
pub const TRENDING_THRESHOLD: usize = 20;

/// A citizen-submitted civic issue.
///
/// The vote count is not stored: it is always `voted_by.len()`, so the two
/// can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: ComplaintStatus,
    pub assigned_department: Option<Category>,
    pub location: Location,
    pub address: String,
    pub image: Option<String>,
    /// Voters in the order their votes were counted.
    pub voted_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    pub fn votes(&self) -> usize {
        self.voted_by.len()
    }

    pub fn has_voted(&self, user_id: Uuid) -> bool {
        self.voted_by.contains(&user_id)
    }

    pub fn is_trending(&self) -> bool {
        self.votes() > TRENDING_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub reward_points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("Sewage".parse::<Category>().is_err());
    }

    #[test]
    fn status_rejects_unknown_values() {
        let err = "closed".parse::<ComplaintStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert_eq!(err.to_string(), "unknown status: \"closed\"");
    }

    fn complaint() -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Asha".into(),
            title: "Pothole".into(),
            description: "Deep pothole near the school".into(),
            category: Category::Roads,
            status: ComplaintStatus::Open,
            assigned_department: None,
            location: Location {
                latitude: 12.97,
                longitude: 77.59,
            },
            address: "MG Road".into(),
            image: None,
            voted_by: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn complaint_serializes_with_client_field_names() {
        let complaint = complaint();

        let json = serde_json::to_value(&complaint).unwrap();
        assert_eq!(json["userName"], "Asha");
        assert_eq!(json["category"], "Roads");
        assert_eq!(json["status"], "open");
        assert!(json["assignedDepartment"].is_null());
        assert_eq!(json["votedBy"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn trending_needs_more_than_threshold_votes() {
        let mut complaint = complaint();
        complaint.voted_by = (0..TRENDING_THRESHOLD).map(|_| Uuid::new_v4()).collect();
        assert!(!complaint.is_trending());

        complaint.voted_by.push(Uuid::new_v4());
        assert!(complaint.is_trending());
    }

    #[test]
    fn location_bounds() {
        let at = |latitude, longitude| Location {
            latitude,
            longitude,
        };
        assert!(at(90.0, -180.0).is_valid());
        assert!(!at(91.0, 0.0).is_valid());
        assert!(!at(f64::NAN, 0.0).is_valid());
    }
}
