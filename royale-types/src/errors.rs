use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy shared by the rules core, the repositories, and the HTTP
/// layer. Every variant carries the user-facing message verbatim; the server
/// maps variants to status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GameError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        GameError::NotFound(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        GameError::Authorization(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        GameError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GameError::Internal(msg.into())
    }
}
