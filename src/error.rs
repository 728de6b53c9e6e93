//! Error types for schedule processing, input loading, rendering and the web app.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::config::ConfigError;
use crate::wcif::ActivityId;

/// Failures while turning a competition schedule into personal agendas.
///
/// `MalformedTimestamp` and `UnknownTimezone` are fatal to index
/// construction. `UnresolvedActivity` and `UnknownRoleCode` are raised per
/// assignment and the caller decides whether to skip, drop the person, or abort.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Malformed start time {raw:?} on activity {activity_id}")]
    MalformedTimestamp { activity_id: ActivityId, raw: String },

    #[error("Unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error("Activity {activity_id} assigned to {person} is not in the schedule")]
    UnresolvedActivity { activity_id: ActivityId, person: String },

    #[error("Unknown assignment code {code:?} for {person}")]
    UnknownRoleCode { code: String, person: String },
}

/// Failures reading the competition export.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid competition JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("HTML formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Application error type used by the binary and the web handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Schedule(_) | AppError::Input(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Render(_) | AppError::Config(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Internal server error");
        }
        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            error: self.to_string(),
        })
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
