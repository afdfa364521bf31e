use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use civic_db::Database;
use civic_types::api::{CreateComplaintRequest, ProvisionUserRequest};
use civic_types::models::{Category, Complaint, ComplaintStatus, Location, Role, User};

use crate::{lifecycle, users};

pub fn db() -> Database {
    Database::open_in_memory().unwrap()
}

pub fn citizen(db: &Database, name: &str) -> User {
    users::provision_user(
        db,
        ProvisionUserRequest {
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            role: Role::Citizen,
        },
    )
    .unwrap()
}

pub fn request(owner: &User, category: Category) -> CreateComplaintRequest {
    CreateComplaintRequest {
        user_id: Some(owner.id),
        user_name: owner.name.clone(),
        title: "Overflowing drain".to_string(),
        description: "Water floods the lane after every rain".to_string(),
        category: Some(category),
        location: Some(Location {
            latitude: 28.61,
            longitude: 77.21,
        }),
        address: "Janpath".to_string(),
        image: None,
    }
}

pub fn file(db: &Database, owner: &User, category: Category) -> Complaint {
    lifecycle::create_complaint(db, request(owner, category)).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// A detached record for the pure functions; never touches a store.
pub fn complaint(
    category: Category,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
) -> Complaint {
    Complaint {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        user_name: "Test".to_string(),
        title: "Broken bench".to_string(),
        description: "Slats missing".to_string(),
        category,
        status,
        assigned_department: None,
        location: Location {
            latitude: 0.0,
            longitude: 0.0,
        },
        address: String::new(),
        image: None,
        voted_by: vec![],
        created_at,
    }
}

pub fn user_with_points(name: &str, reward_points: u64) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        role: Role::Citizen,
        reward_points,
    }
}
