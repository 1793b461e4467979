//! Error taxonomy shared across the client.
//!
//! Everything a board operation can fail with lands in one of these
//! categories; the chrome maps each to a user-visible message and nothing
//! propagates past that boundary.

use thiserror::Error;

use crate::form::FormError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A client-side field check failed. No request was made.
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Missing, expired or rejected credentials. Callers clear the stored
    /// token and send the user back through login.
    #[error("{0}")]
    Auth(String),

    /// The task vanished server-side.
    #[error("task not found")]
    NotFound,

    /// Transport-level failure (connect, timeout, malformed response).
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with an error, reported verbatim when it
    /// provided a message.
    #[error("{0}")]
    Server(String),
}

impl ServiceError {
    pub fn not_logged_in() -> Self {
        ServiceError::Auth("not logged in".to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation {
            field: err.field(),
            reason: err.to_string(),
        }
    }
}
