use axum::http::StatusCode;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{event, Level};

#[derive(Debug, Serialize)]
pub struct ErrorResponseData {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    kind: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl ErrorResponseData {
    /// Build an error body and log it. Client errors are logged as warnings so that
    /// routine failures like an expired session don't show up as server errors.
    pub fn new(
        status: StatusCode,
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> ErrorResponseData {
        let ret = ErrorResponseData {
            error: ErrorDetails {
                kind: kind.into(),
                message: message.into(),
            },
        };

        if status.is_server_error() {
            event!(Level::ERROR, status=%status, kind=%ret.error.kind, message=%ret.error.message);
        } else {
            event!(Level::WARN, status=%status, kind=%ret.error.kind, message=%ret.error.message);
        }

        ret
    }

    pub fn kind(&self) -> &str {
        &self.error.kind
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_error() {
        let data = ErrorResponseData::new(StatusCode::FORBIDDEN, "forbidden", "Not an admin user");
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "error": { "kind": "forbidden", "message": "Not an admin user" } })
        );
        assert_eq!(data.kind(), "forbidden");
    }
}
