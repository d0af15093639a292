use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use trip_planner_auth::AuthError;
use trip_planner_http_errors::ErrorResponseData;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Sent with every 401 so that clients know to sign in again.
pub const AUTHENTICATE_CHALLENGE: &str = r#"Cookie realm="trip-planner""#;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database Error: {0}")]
    DbErr(#[from] diesel::result::Error),

    #[error("Database Pool Error: {0}")]
    DbPool(#[from] deadpool_diesel::PoolError),

    #[error("Database Error: {0}")]
    Db(#[from] trip_planner_db::Error),

    #[error("Server error: {0}")]
    ServerError(#[from] hyper::Error),

    #[error("Database Error: {0}")]
    DeadpoolInteract(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not an admin user")]
    Forbidden,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Password error: {0}")]
    Password(#[from] trip_planner_auth::Error),

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Unknown {0}")]
    ObjectNotFound(&'static str),

    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}

impl Error {
    fn error_kind(&self) -> &'static str {
        match self {
            Error::DbErr(_) => "db",
            Error::DbPool(_) => "db_pool",
            Error::Db(_) => "db",
            Error::ServerError(_) => "internal_server_error",
            Error::DeadpoolInteract(_) => "db",
            Error::Unauthenticated => "authn",
            Error::Forbidden => "authz",
            Error::InvalidCredentials => "authn",
            Error::UsernameTaken => "conflict",
            Error::Password(_) => "internal_server_error",
            Error::InvalidInput(_) => "bad_request",
            Error::ObjectNotFound(_) => "not_found",
            Error::Generic(_) => "internal_server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::UsernameTaken => StatusCode::CONFLICT,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::ObjectNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn response_tuple(&self) -> (StatusCode, ErrorResponseData) {
        let status = self.status();
        (
            status,
            ErrorResponseData::new(status, self.error_kind(), self.to_string()),
        )
    }
}

impl From<deadpool_diesel::InteractError> for Error {
    fn from(e: deadpool_diesel::InteractError) -> Self {
        Error::DeadpoolInteract(e.to_string())
    }
}

impl<E: Into<Error>> From<AuthError<E>> for Error {
    fn from(e: AuthError<E>) -> Self {
        match e {
            AuthError::Unauthenticated => Error::Unauthenticated,
            AuthError::Forbidden => Error::Forbidden,
            AuthError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (code, json) = self.response_tuple();
        let mut response = (code, Json(json)).into_response();
        if code == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(AUTHENTICATE_CHALLENGE),
            );
        }
        response
    }
}
