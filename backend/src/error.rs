use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::api::ErrorResponse;
use shared::store::StoreError;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Store(StoreError),
    Persistence(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "{}", e),
            Error::Persistence(message) => write!(f, "persistence error: {}", message),
            Error::Config(message) => write!(f, "configuration error: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Store(e) => match e {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::MinimumOptionsViolation | StoreError::DuplicateLabel(_) => {
                    StatusCode::CONFLICT
                }
                StoreError::InvalidLabel | StoreError::InvalidDate(_) => StatusCode::BAD_REQUEST,
                StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Persistence(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
