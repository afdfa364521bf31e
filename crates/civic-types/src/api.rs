use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, Complaint, ComplaintStatus, Location, Role};

// -- Complaints --

/// Body of a new complaint. Required fields are optional here so a missing
/// one surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateComplaintRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<Category>,
    pub location: Option<Location>,
    #[serde(default)]
    pub address: String,
    pub image: Option<String>,
}

/// The closed set of changes an existing complaint accepts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ComplaintUpdate {
    SetStatus {
        status: ComplaintStatus,
    },
    /// Routes the complaint to a department and marks it assigned.
    AssignDepartment {
        department: Category,
    },
    Edit {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub votes: usize,
    pub trending: bool,
}

impl From<Complaint> for ComplaintResponse {
    fn from(complaint: Complaint) -> Self {
        Self {
            votes: complaint.votes(),
            trending: complaint.is_trending(),
            complaint,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub complaint: ComplaintResponse,
    pub points_awarded: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintSort {
    #[default]
    MostRecent,
    MostVoted,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintListQuery {
    pub status: Option<ComplaintStatus>,
    pub category: Option<Category>,
    pub search: Option<String>,
    pub user_id: Option<Uuid>,
    pub sort: Option<ComplaintSort>,
}

// -- Votes --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VoteRequest {
    pub user_id: Uuid,
}

// -- Users --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProvisionUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Citizen
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointsRequest {
    pub delta: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

// -- Analytics --

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Restricts every view to complaints of one category. Absent means all.
    pub department: Option<Category>,
    pub top: Option<usize>,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
