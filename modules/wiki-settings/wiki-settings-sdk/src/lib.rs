//! Wiki Settings SDK
//!
//! Transport-agnostic contract of the wiki-settings module: the settings
//! models, the ports the settings store depends on (identity, document
//! storage, local persistence, render surface) and their error types.

pub mod api;
pub mod errors;
pub mod models;

pub use api::{DocumentStore, IdentitySession, LocalStore, RenderSurface};
pub use errors::{AuthError, StorageError};
pub use models::{
    ACCENT_PRESETS, ButtonRadius, Document, FederatedProvider, IdentityState, LogoKind,
    PrimaryButtonStyle, Settings, SettingsKey, SettingsPatch, ThemeValue, UserId, WriteMode,
};
