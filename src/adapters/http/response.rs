use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::utils::error::RecipeError;

/// `{"error": "..."}` body for lookup and storage failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"message": "..."}` body for invalid requests and confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            RecipeError::ValidationError { message } => {
                (status, Json(MessageBody { message })).into_response()
            }
            RecipeError::BadId | RecipeError::NotFound | RecipeError::ListUnavailable(_) => {
                if status.is_server_error() {
                    error!("{self}: {:?}", std::error::Error::source(&self));
                }
                (status, Json(ErrorBody { error: self.to_string() })).into_response()
            }
            RecipeError::Cancelled { .. } => {
                error!("Request abandoned: {self}");
                (status, Json(ErrorBody { error: self.to_string() })).into_response()
            }
            other => {
                error!("Request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
