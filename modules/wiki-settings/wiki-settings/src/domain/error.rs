use wiki_settings_sdk::StorageError;

/// Errors raised inside the settings subsystem.
///
/// None of them reach presentation consumers: each is absorbed with a safe
/// fallback and handed to [`report`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings document '{key}'")]
    StorageRead {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to write settings document '{key}'")]
    StorageWrite {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("update rejected: {reason}")]
    Rejected { reason: String },

    #[error("validation error on field '{field}': {message}")]
    Validation { field: String, message: String },
}

impl SettingsError {
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Observability sink for absorbed errors.
pub fn report(err: &SettingsError) {
    match err {
        SettingsError::StorageRead { key, source } => {
            tracing::error!(key = %key, error = %source, "settings read failed, using defaults");
        }
        SettingsError::StorageWrite { key, source } => {
            tracing::error!(key = %key, error = %source, "settings write failed");
        }
        SettingsError::Rejected { .. } | SettingsError::Validation { .. } => {
            tracing::warn!(error = %err, "settings update dropped");
        }
    }
}
