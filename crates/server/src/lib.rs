use api_types::ErrorBody;
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use auth::IdentityResolver;
pub use server::{ServerState, app, run_with_listener, spawn_with_listener};

mod auth;
mod budget;
mod convert;
mod health;
mod itinerary;
mod server;
mod shared;
mod trips;

/// Why a request was refused before reaching a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken,
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    /// Request body that is not JSON or does not fit the expected shape.
    InvalidBody(String),
    Unauthorized(AuthFailure),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::VersionConflict(_) => StatusCode::CONFLICT,
        EngineError::InvalidData(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    match err {
        EngineError::Validation(err) => ErrorBody {
            error: "Validation failed".to_string(),
            details: Some(vec![err.to_string()]),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            internal_error()
        }
        EngineError::InvalidData(msg) => {
            tracing::error!("corrupt stored data: {msg}");
            internal_error()
        }
        other => ErrorBody {
            error: other.to_string(),
            details: None,
        },
    }
}

fn internal_error() -> ErrorBody {
    ErrorBody {
        error: "internal server error".to_string(),
        details: None,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    details: None,
                },
            ),
            ServerError::InvalidBody(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid request body".to_string(),
                    details: Some(vec![detail]),
                },
            ),
            ServerError::Unauthorized(AuthFailure::MissingToken) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Access token required".to_string(),
                    details: None,
                },
            ),
            ServerError::Unauthorized(AuthFailure::InvalidToken) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: "Invalid token".to_string(),
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}
