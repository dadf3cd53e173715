//! Wiki Settings Module Implementation
//!
//! Resolves which settings record governs the UI for the current identity,
//! keeps it published to consumers, applies the accent color to the render
//! surface and commits staged edits back to storage.
//!
//! The public contract is defined in `wiki-settings-sdk` and re-exported here.

pub use wiki_settings_sdk::{
    ACCENT_PRESETS, AuthError, ButtonRadius, Document, DocumentStore, FederatedProvider,
    IdentitySession, IdentityState, LocalStore, LogoKind, PrimaryButtonStyle, RenderSurface,
    Settings, SettingsKey, SettingsPatch, StorageError, ThemeValue, UserId, WriteMode,
};

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{SettingsConfig, SettingsMode};
pub use domain::color::{ColorParseError, Hsl, Rgb, hex_to_hsl};
pub use domain::editor::{FieldChange, SettingsEditor};
pub use domain::error::SettingsError;
pub use domain::store::{ResolutionOutcome, SettingsStore, SettingsView, UpdateOutcome};
pub use domain::theme::{AppliedTheme, ThemeApplier};
