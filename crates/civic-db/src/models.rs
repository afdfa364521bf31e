//! Row types, mapped one-to-one onto SQLite columns and kept distinct from
//! the civic-types records so the schema can evolve on its own.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

use civic_types::models::{Complaint, Location, User};

pub struct ComplaintRow {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub assigned_department: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub image: Option<String>,
    pub created_at: String,
}

pub struct VoteRow {
    pub complaint_id: String,
    pub user_id: String,
}

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub reward_points: i64,
}

impl ComplaintRow {
    pub fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            id: complaint.id.to_string(),
            user_id: complaint.user_id.to_string(),
            user_name: complaint.user_name.clone(),
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            category: complaint.category.as_str().to_string(),
            status: complaint.status.as_str().to_string(),
            assigned_department: complaint.assigned_department.map(|d| d.as_str().to_string()),
            latitude: complaint.location.latitude,
            longitude: complaint.location.longitude,
            address: complaint.address.clone(),
            image: complaint.image.clone(),
            created_at: format_timestamp(&complaint.created_at),
        }
    }

    /// Decodes the row. `voted_by` must already be in vote order.
    pub fn into_complaint(self, voted_by: Vec<Uuid>) -> Result<Complaint> {
        let assigned_department = match self.assigned_department {
            Some(d) => Some(d.parse()?),
            None => None,
        };

        Ok(Complaint {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            user_name: self.user_name,
            title: self.title,
            description: self.description,
            category: self.category.parse()?,
            status: self.status.parse()?,
            assigned_department,
            location: Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            address: self.address,
            image: self.image,
            voted_by,
            created_at: parse_timestamp(&self.created_at)
                .ok_or_else(|| anyhow!("unparseable created_at {:?}", self.created_at))?,
        })
    }
}

impl UserRow {
    pub fn from_user(user: &User) -> Result<Self> {
        Ok(Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            reward_points: i64::try_from(user.reward_points)
                .context("reward points exceed storable range")?,
        })
    }

    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            name: self.name,
            email: self.email,
            role: self.role.parse()?,
            reward_points: u64::try_from(self.reward_points)
                .with_context(|| format!("negative reward points {}", self.reward_points))?,
        })
    }
}

pub fn parse_uuid(value: &str) -> Result<Uuid> {
    value
        .parse()
        .with_context(|| format!("corrupt id {:?}", value))
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 and SQLite's own `YYYY-MM-DD HH:MM:SS` (implicitly UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}
