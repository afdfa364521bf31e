use tracing::info;
use uuid::Uuid;

use civic_db::{Database, queries};
use civic_types::models::User;

use crate::error::{CoreError, Result};

/// Largest balance the store can hold.
const MAX_POINTS: u64 = i64::MAX as u64;

/// Adds `delta` to the user's balance, flooring at zero.
///
/// Not idempotent: every call is applied. Callers awarding points for an
/// event must make sure they only do so once per event, as
/// [`crate::lifecycle::resolve_complaint`] does.
pub fn update_user_points(db: &Database, user_id: Uuid, delta: i64) -> Result<User> {
    db.transaction(|conn| -> Result<User> {
        let user =
            queries::load_user(conn, user_id)?.ok_or_else(|| CoreError::user_not_found(user_id))?;
        apply_delta(conn, user, delta)
    })
}

pub(crate) fn apply_delta(conn: &civic_db::Connection, mut user: User, delta: i64) -> Result<User> {
    let before = user.reward_points;
    user.reward_points = if delta >= 0 {
        before.saturating_add(delta.unsigned_abs()).min(MAX_POINTS)
    } else {
        before.saturating_sub(delta.unsigned_abs())
    };
    queries::store_user(conn, &user)?;

    info!(
        "User {} points {} -> {} (delta {})",
        user.id, before, user.reward_points, delta
    );
    Ok(user)
}
