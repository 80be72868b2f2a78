//! Domain Layer - Errors
//!
//! Every failure a task operation can report. Errors are `Clone` so the
//! view-model can keep the last one around for display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaskId;

/// Common result type for task operations
pub type TaskResult<T> = Result<T, TaskError>;

/// Task operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskError {
    /// The request never produced a response (connection, DNS, fetch rejected).
    #[error("network error: {reason}")]
    Network { reason: String },

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be decoded.
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    /// Rejected before any request was issued.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// No task with this id in the current list.
    #[error("task {id} not found")]
    NotFound { id: TaskId },
}

impl TaskError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for failures that came from talking to the remote service.
    ///
    /// Precondition failures (`InvalidInput`, `NotFound`) never reach the
    /// network and never touch the list.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Status { .. } | Self::InvalidResponse { .. }
        )
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::invalid_response(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_response(err.to_string())
    }
}
