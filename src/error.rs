use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Pairs the error with the message a caller is allowed to see. In
    /// production every failure collapses to `generic`.
    pub fn reply(self, production: bool, generic: &'static str) -> ErrorReply {
        let message = if production {
            generic.to_string()
        } else {
            self.to_string()
        };

        ErrorReply {
            status: self.status(),
            message,
        }
    }
}

/// `{success: false, error}` body shared by every API endpoint.
#[derive(Debug)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}
