use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("invalid id")]
    BadId,

    #[error("resource not found")]
    NotFound,

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("operation cancelled after {after:?}")]
    Cancelled { after: Duration },

    #[error("can't get list of recipes")]
    ListUnavailable(#[source] Box<RecipeError>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RecipeError {
    pub fn validation(message: impl Into<String>) -> Self {
        RecipeError::ValidationError {
            message: message.into(),
        }
    }

    /// HTTP status for this error kind. The handler layer is the only caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecipeError::BadId | RecipeError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            RecipeError::NotFound => StatusCode::NOT_FOUND,
            RecipeError::Cancelled { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures the client caused.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<mongodb::error::Error> for RecipeError {
    fn from(err: mongodb::error::Error) -> Self {
        RecipeError::StorageError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
