use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use hadith_core::pagination::PaginationError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid pagination parameters: {0}")]
    InvalidPagination(#[from] PaginationError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unauthorized: Invalid or missing API key")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    details: String,
    code: u16,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidPagination(_) | Error::InvalidParameter(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                details: self.to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}
