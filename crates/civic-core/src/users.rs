use tracing::info;
use uuid::Uuid;

use civic_db::Database;
use civic_types::analytics::CitizenSummary;
use civic_types::api::ProvisionUserRequest;
use civic_types::models::User;

use crate::analytics;
use crate::browse;
use crate::error::{CoreError, Result};

/// Creates a user record with an empty balance. Sign-up and credentials
/// live upstream; this only provisions the record the portal works with.
pub fn provision_user(db: &Database, req: ProvisionUserRequest) -> Result<User> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("name", "must not be blank"));
    }
    let email = req.email.trim();
    if !email.contains('@') {
        return Err(CoreError::validation("email", format!("{:?} is not an address", email)));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        role: req.role,
        reward_points: 0,
    };
    db.put_user(&user)?;

    info!("Provisioned {} {} ({})", user.role.as_str(), user.id, user.name);
    Ok(user)
}

pub fn get_user(db: &Database, id: Uuid) -> Result<User> {
    db.get_user(id)?.ok_or_else(|| CoreError::user_not_found(id))
}

pub fn list_users(db: &Database) -> Result<Vec<User>> {
    Ok(db.list_users()?)
}

/// Users by points, highest first. `limit` of `None` ranks everyone.
pub fn leaderboard(db: &Database, limit: Option<usize>) -> Result<Vec<User>> {
    let users = db.list_users()?;
    let n = limit.unwrap_or(users.len());
    Ok(analytics::top_users(&users, n))
}

/// Dashboard counters for one citizen.
pub fn summary(db: &Database, user_id: Uuid) -> Result<CitizenSummary> {
    let user = get_user(db, user_id)?;
    let complaints = db.list_complaints()?;
    Ok(browse::citizen_summary(&complaints, &user))
}
