use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::room::RoomError;

const LOG_TARGET: &str = "server::error";

/// Transport-facing error, per spec.md §7's kind → status mapping.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Forbidden(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::RoomNotFound | RoomError::GameNotFound => ApiError::NotFound,
            RoomError::NotHost => ApiError::Forbidden(err.to_string()),
            RoomError::NotYourTurn => ApiError::Forbidden(err.to_string()),
            RoomError::Internal(message) => ApiError::Internal(message),
            RoomError::InvalidInput(_)
            | RoomError::NameTaken(_)
            | RoomError::RoomFull
            | RoomError::BadPassword
            | RoomError::NotEnoughPlayers
            | RoomError::GameAlreadyStarted
            | RoomError::GameNotStarted
            | RoomError::IllegalAction(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(ErrorBody { error: message })).into_response()
            }
            ApiError::Internal(message) => {
                error!(target = LOG_TARGET, %message, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: message }))
                    .into_response()
            }
        }
    }
}
