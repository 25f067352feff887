//! Error types shared by the store, the services and the HTTP layer.

use thiserror::Error;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use crate::utils::response::Response;

/// Infrastructure faults raised by a [`crate::store::Store`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("bson serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Domain rejections surfaced to callers, plus infrastructure faults that abort
/// a primary operation.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    FailedPrecondition(String),

    #[error("{0}")]
    ResourceExhausted(String),

    #[error("internal error: {0}")]
    Internal(#[from] StoreError),
}

impl AppError {
    /// Machine-readable kind sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::PermissionDenied(_) => "permission-denied",
            AppError::InvalidArgument(_) => "invalid-argument",
            AppError::NotFound(_) => "not-found",
            AppError::AlreadyExists(_) => "already-exists",
            AppError::FailedPrecondition(_) => "failed-precondition",
            AppError::ResourceExhausted(_) => "resource-exhausted",
            AppError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
            AppError::ResourceExhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        match self {
            AppError::Unauthenticated(_) => Response::unauthorized(&message),
            AppError::PermissionDenied(_) => Response::forbidden(&message),
            AppError::InvalidArgument(_) => Response::bad_request(&message),
            AppError::NotFound(_) => Response::not_found(&message),
            AppError::Internal(error) => {
                log::error!("{:?}", error);
                Response::internal_server_error(&message)
            },
            _ => Response::with_status(self.status_code(), self.kind(), &message),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
