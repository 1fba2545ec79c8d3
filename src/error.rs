use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;
use thiserror::Error;

use crate::archive::ArchiveError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("conversation {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("contact details already captured for conversation {0}")]
    ContactAlreadyCaptured(String),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ContactAlreadyCaptured(_) => StatusCode::CONFLICT,
            AppError::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing detail string. Internal failures are not echoed back.
    fn detail(&self) -> String {
        match self {
            AppError::NotFound(_) => "Conversation not found".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::ContactAlreadyCaptured(_) => "Contact information has already been submitted".to_string(),
            AppError::Archive(_) => "Failed to save conversation".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::info!("⚠️ Request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
