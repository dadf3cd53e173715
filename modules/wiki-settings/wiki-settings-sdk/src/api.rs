//! Port traits consumed by the settings store and theme applier.
//!
//! Every collaborator is passed in explicitly at construction time, so the
//! resolution algorithm can be exercised against in-process doubles.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::{AuthError, StorageError};
use crate::models::{Document, FederatedProvider, IdentityState, ThemeValue, UserId, WriteMode};

/// Remote document storage holding settings records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document stored under `key`.
    /// Returns `Ok(None)` when nothing is stored there.
    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError>;

    /// Write `document` under `key` using the given write mode.
    async fn set(&self, key: &str, document: Document, mode: WriteMode)
    -> Result<(), StorageError>;
}

/// Authentication capability.
///
/// Implementations publish a new [`IdentityState`] through the watch channel
/// on every authentication change.
#[async_trait]
pub trait IdentitySession: Send + Sync {
    /// Current authentication state.
    fn state(&self) -> IdentityState;

    /// Receiver observing every authentication state change.
    fn subscribe(&self) -> watch::Receiver<IdentityState>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<UserId, AuthError>;

    async fn sign_in_federated(&self, provider: FederatedProvider) -> Result<UserId, AuthError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Global render surface accepting named theme variables.
///
/// Assignments take effect immediately for everything reading the variable.
pub trait RenderSurface: Send + Sync {
    fn set_variable(&self, name: &str, value: ThemeValue);
}

/// String key/value persistence local to the device.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
