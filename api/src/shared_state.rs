use std::sync::Arc;

use trip_planner_auth::{PasswordHasher, SessionManager};
use trip_planner_db as db;

use crate::auth::SessionStore;

pub struct InnerState {
    pub production: bool,
    pub db: db::Pool,
    pub sessions: SessionManager<SessionStore>,
    pub passwords: PasswordHasher,
    /// Hashed with `passwords` at startup. Logins for unknown usernames verify against it.
    pub decoy_hash: String,
}

pub type State = Arc<InnerState>;
