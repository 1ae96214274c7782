use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Transport,
    GraphQl,
    Internal,
}

/// Failure a query or command leaves behind for the user. Carried in the
/// derived view and returned from the CLI as the process error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether reissuing the same request can succeed. Bad input and unknown
    /// ids stay wrong however often they are asked for.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.code, ErrorCode::NotFound | ErrorCode::Validation)
    }
}
