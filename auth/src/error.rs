use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Password hasher error: {0}")]
    PasswordHasherError(String),

    #[error("Invalid password hashing parameters: {0}")]
    InvalidHashParams(String),
}

/// Failure from one of the failing session lookups.
#[derive(Debug, Error)]
pub enum AuthError<E> {
    /// No cookie, an unknown or expired token, or a session whose user no longer exists.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Signed in, but not an admin.
    #[error("Not an admin user")]
    Forbidden,

    #[error("Session store error: {0}")]
    Store(E),
}
