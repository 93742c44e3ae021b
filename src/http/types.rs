use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::error::TaskError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wraps domain errors so handlers can `?` and still map each kind to its
/// status code.
pub struct ApiError(TaskError);

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            TaskError::NotFound => StatusCode::NOT_FOUND,
            TaskError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, axum::Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
