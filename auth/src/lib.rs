mod cookie;
mod error;
pub mod password;
pub mod session;

pub use cookie::*;
pub use error::*;
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionRecord, SessionStore};
