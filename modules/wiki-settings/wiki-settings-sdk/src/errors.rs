//! Error types for the wiki-settings SDK.

use thiserror::Error;

/// Failure reported by a document store or local persistence backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("stored value under '{key}' is not a JSON object")]
    NotAnObject { key: String },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StorageError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    #[must_use]
    pub fn not_an_object(key: impl Into<String>) -> Self {
        Self::NotAnObject { key: key.into() }
    }
}

/// Failure reported by the identity capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    EmailAlreadyInUse,

    #[error("no account exists for this email")]
    UserNotFound,

    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("malformed email address")]
    InvalidEmail,

    #[error("identity provider error: {0}")]
    Provider(String),
}
