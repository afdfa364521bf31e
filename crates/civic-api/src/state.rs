use std::sync::Arc;

use civic_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Length of the top-citizens list when a request does not ask for one.
    pub default_top_users: usize,
}

impl AppStateInner {
    pub fn new(db: Database, default_top_users: usize) -> AppState {
        Arc::new(Self {
            db,
            default_top_users,
        })
    }
}
