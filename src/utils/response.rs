use serde::{Deserialize, Serialize};
use actix_web::{http::StatusCode, HttpResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub kind: String,
    pub message: String,
}

impl Response {
    pub fn with_status(status: StatusCode, kind: &str, message: &str) -> HttpResponse {
        HttpResponse::build(status)
            .content_type("application/json")
            .json(Response {
                kind: kind.to_string(),
                message: message.to_string(),
            })
    }

    pub fn ok(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::OK, "ok", message)
    }

    pub fn bad_request(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::BAD_REQUEST, "invalid-argument", message)
    }

    pub fn unauthorized(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::UNAUTHORIZED, "unauthenticated", message)
    }

    pub fn forbidden(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::FORBIDDEN, "permission-denied", message)
    }

    pub fn not_found(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::NOT_FOUND, "not-found", message)
    }

    pub fn internal_server_error(message: &str) -> HttpResponse {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}
