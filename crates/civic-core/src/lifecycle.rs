use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use civic_db::{Database, queries};
use civic_types::api::{ComplaintUpdate, CreateComplaintRequest};
use civic_types::models::{Complaint, ComplaintStatus};

use crate::error::{CoreError, Result};
use crate::rewards;

/// Points credited to the owner when their complaint is resolved.
pub const RESOLUTION_REWARD: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub complaint: Complaint,
    /// Zero when the complaint was already resolved or its owner is unknown.
    pub points_awarded: u64,
}

pub fn create_complaint(db: &Database, req: CreateComplaintRequest) -> Result<Complaint> {
    create_complaint_at(db, req, Utc::now())
}

/// Validates and stores a new complaint stamped with `created_at`.
/// Nothing is written when validation fails.
pub fn create_complaint_at(
    db: &Database,
    req: CreateComplaintRequest,
    created_at: DateTime<Utc>,
) -> Result<Complaint> {
    let complaint = build_complaint(req, created_at)?;
    db.put_complaint(&complaint)?;

    info!(
        "Complaint {} filed by {} in {}",
        complaint.id, complaint.user_id, complaint.category
    );
    Ok(complaint)
}

pub fn get_complaint(db: &Database, id: Uuid) -> Result<Complaint> {
    db.get_complaint(id)?
        .ok_or_else(|| CoreError::complaint_not_found(id))
}

pub fn list_complaints(db: &Database) -> Result<Vec<Complaint>> {
    Ok(db.list_complaints()?)
}

/// Applies one typed change. Any status may follow any other, so an
/// administrator can reopen a resolved complaint.
pub fn update_complaint(db: &Database, id: Uuid, update: ComplaintUpdate) -> Result<Complaint> {
    db.transaction(|conn| -> Result<Complaint> {
        let mut complaint =
            queries::load_complaint(conn, id)?.ok_or_else(|| CoreError::complaint_not_found(id))?;

        apply_update(&mut complaint, update)?;
        queries::store_complaint(conn, &complaint)?;

        info!("Complaint {} updated (status {})", id, complaint.status);
        Ok(complaint)
    })
}

/// Marks the complaint resolved and credits the owner, in one transaction.
/// Resolving an already resolved complaint changes nothing and awards nothing.
pub fn resolve_complaint(db: &Database, id: Uuid) -> Result<Resolution> {
    db.transaction(|conn| -> Result<Resolution> {
        let mut complaint =
            queries::load_complaint(conn, id)?.ok_or_else(|| CoreError::complaint_not_found(id))?;

        if complaint.status == ComplaintStatus::Resolved {
            return Ok(Resolution {
                complaint,
                points_awarded: 0,
            });
        }

        complaint.status = ComplaintStatus::Resolved;
        queries::store_complaint(conn, &complaint)?;

        let points_awarded = match queries::load_user(conn, complaint.user_id)? {
            Some(owner) => {
                let credit = i64::try_from(RESOLUTION_REWARD).unwrap_or(i64::MAX);
                rewards::apply_delta(conn, owner, credit)?;
                RESOLUTION_REWARD
            }
            None => {
                warn!(
                    "Complaint {} resolved but owner {} has no user record; no points awarded",
                    id, complaint.user_id
                );
                0
            }
        };

        info!("Complaint {} resolved, {} points awarded", id, points_awarded);
        Ok(Resolution {
            complaint,
            points_awarded,
        })
    })
}

fn build_complaint(req: CreateComplaintRequest, created_at: DateTime<Utc>) -> Result<Complaint> {
    let title = required_text("title", &req.title)?;
    let description = required_text("description", &req.description)?;
    let category = req
        .category
        .ok_or_else(|| CoreError::validation("category", "is required"))?;
    let user_id = req
        .user_id
        .ok_or_else(|| CoreError::validation("userId", "is required"))?;
    let location = req
        .location
        .ok_or_else(|| CoreError::validation("location", "is required"))?;
    if !location.is_valid() {
        return Err(CoreError::validation(
            "location",
            format!(
                "({}, {}) is not a valid coordinate",
                location.latitude, location.longitude
            ),
        ));
    }

    Ok(Complaint {
        id: Uuid::new_v4(),
        user_id,
        user_name: req.user_name.trim().to_string(),
        title,
        description,
        category,
        status: ComplaintStatus::Open,
        assigned_department: None,
        location,
        address: req.address.trim().to_string(),
        image: req.image.filter(|i| !i.trim().is_empty()),
        voted_by: Vec::new(),
        // Millisecond precision, matching what the store keeps.
        created_at: created_at.trunc_subsecs(3),
    })
}

fn apply_update(complaint: &mut Complaint, update: ComplaintUpdate) -> Result<()> {
    match update {
        ComplaintUpdate::SetStatus { status } => complaint.status = status,
        ComplaintUpdate::AssignDepartment { department } => {
            complaint.assigned_department = Some(department);
            complaint.status = ComplaintStatus::Assigned;
        }
        ComplaintUpdate::Edit {
            title,
            description,
            address,
            image,
        } => {
            if let Some(title) = title {
                complaint.title = required_text("title", &title)?;
            }
            if let Some(description) = description {
                complaint.description = required_text("description", &description)?;
            }
            if let Some(address) = address {
                complaint.address = address.trim().to_string();
            }
            if let Some(image) = image {
                complaint.image = Some(image).filter(|i| !i.trim().is_empty());
            }
        }
    }
    Ok(())
}

fn required_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}
