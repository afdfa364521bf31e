//! Business rules of the civic issue portal: complaint lifecycle, voting,
//! reward points and the derived analytics views. Every mutation funnels
//! through [`civic_db::Database::transaction`].

pub mod analytics;
pub mod browse;
pub mod error;
pub mod lifecycle;
pub mod rewards;
pub mod users;
pub mod voting;

pub use error::{CoreError, EntityKind, Result};

#[cfg(test)]
mod test_support;
