//! Error types for the speed-ranking engine.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Race {race_id} not found for this team")]
    RaceNotFound { race_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine data directory")]
    DataDir,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Internal error from anything displayable (lock poisoning and the like).
    pub fn internal(message: impl ToString) -> Self {
        EngineError::Internal {
            message: message.to_string(),
        }
    }
}

/// Wire shape for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::MissingParameter { .. } | EngineError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            EngineError::RaceNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Database(_)
            | EngineError::Io(_)
            | EngineError::DataDir
            | EngineError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            EngineError::MissingParameter { .. } => "missing_parameter",
            EngineError::InvalidParameter { .. } => "invalid_parameter",
            EngineError::RaceNotFound { .. } => "race_not_found",
            EngineError::Database(_) => "database_error",
            EngineError::Io(_) => "io_error",
            EngineError::DataDir => "data_dir_error",
            EngineError::Internal { .. } => "internal_error",
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
        })
    }
}
