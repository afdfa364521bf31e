use tracing::{debug, info};
use uuid::Uuid;

use civic_db::{Database, queries};
use civic_types::models::Complaint;

use crate::error::{CoreError, Result};

pub const ALREADY_VOTED: &str = "already voted";

/// Result of a vote. A repeat vote is a routine outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    Counted(Complaint),
    AlreadyVoted,
}

/// Counts one vote from `user_id`. The membership check and the insert run
/// in one transaction, and the store's unique key backs the check up.
pub fn vote_complaint(db: &Database, id: Uuid, user_id: Uuid) -> Result<VoteOutcome> {
    db.transaction(|conn| -> Result<VoteOutcome> {
        let mut complaint =
            queries::load_complaint(conn, id)?.ok_or_else(|| CoreError::complaint_not_found(id))?;

        if complaint.has_voted(user_id) || !queries::insert_vote(conn, id, user_id)? {
            debug!("User {} already voted on complaint {}", user_id, id);
            return Ok(VoteOutcome::AlreadyVoted);
        }

        complaint.voted_by.push(user_id);
        info!(
            "User {} voted on complaint {} ({} votes)",
            user_id,
            id,
            complaint.votes()
        );
        Ok(VoteOutcome::Counted(complaint))
    })
}
