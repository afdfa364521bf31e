use std::fmt;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Complaint,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Complaint => f.write_str("Complaint"),
            EntityKind::User => f.write_str("User"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl CoreError {
    pub fn complaint_not_found(id: Uuid) -> Self {
        CoreError::NotFound {
            kind: EntityKind::Complaint,
            id,
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        CoreError::NotFound {
            kind: EntityKind::User,
            id,
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
