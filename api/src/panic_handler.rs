use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{event, Level};

pub fn handle_panic(production: bool, err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    event!(Level::ERROR, %details, "handler panicked");

    let message = if production {
        "Server error".to_string()
    } else {
        details
    };

    let body = serde_json::json!({
        "error": {
            "kind": "panic",
            "message": message,
        }
    });

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
