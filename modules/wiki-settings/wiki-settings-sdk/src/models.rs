//! Public models for the wiki-settings module.
//!
//! These are transport-agnostic data structures shared between the settings
//! store, its ports and the presentation layer that reads resolved settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stored settings document: a flat JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Accent swatches offered by the settings page.
pub const ACCENT_PRESETS: [&str; 6] = [
    "#C92D3B", "#4f46e5", "#0891b2", "#059669", "#ca8a04", "#d97706",
];

/// Brand mark shown next to the application name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoKind {
    #[default]
    Default,
    Swatch,
    Cube,
    Plus,
}

impl LogoKind {
    pub const ALL: [Self; 4] = [Self::Default, Self::Plus, Self::Swatch, Self::Cube];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Swatch => "swatch",
            Self::Cube => "cube",
            Self::Plus => "plus",
        }
    }
}

/// Corner radius applied to buttons.
///
/// Older documents store the utility class name (`rounded-md`), which is
/// still accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonRadius {
    #[serde(alias = "rounded-none")]
    None,
    #[serde(alias = "rounded")]
    Small,
    #[default]
    #[serde(alias = "rounded-md")]
    Medium,
    #[serde(alias = "rounded-lg")]
    Large,
    #[serde(alias = "rounded-full")]
    Full,
}

impl ButtonRadius {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Full,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Full => "full",
        }
    }

    /// Utility class the presentation layer puts on buttons.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::None => "rounded-none",
            Self::Small => "rounded",
            Self::Medium => "rounded-md",
            Self::Large => "rounded-lg",
            Self::Full => "rounded-full",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Full => "Full",
        }
    }
}

/// Visual style of primary buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryButtonStyle {
    #[default]
    Filled,
    Outline,
}

impl PrimaryButtonStyle {
    pub const ALL: [Self; 2] = [Self::Filled, Self::Outline];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filled => "filled",
            Self::Outline => "outline",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Filled => "Filled",
            Self::Outline => "Outline",
        }
    }
}

/// Appearance settings governing the wiki UI.
///
/// `Default` yields the fixed default record used to initialize new keys and
/// to repair invalid fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub app_name: String,
    pub logo: LogoKind,
    pub primary_color: String,
    pub button_radius: ButtonRadius,
    pub primary_button_style: PrimaryButtonStyle,
}

impl Settings {
    pub const DEFAULT_APP_NAME: &'static str = "Design Wiki";
    pub const DEFAULT_PRIMARY_COLOR: &'static str = "#C92D3B";

    /// Shallow merge: every field present in `patch` overwrites ours.
    #[must_use]
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            app_name: patch
                .app_name
                .clone()
                .unwrap_or_else(|| self.app_name.clone()),
            logo: patch.logo.unwrap_or(self.logo),
            primary_color: patch
                .primary_color
                .clone()
                .unwrap_or_else(|| self.primary_color.clone()),
            button_radius: patch.button_radius.unwrap_or(self.button_radius),
            primary_button_style: patch
                .primary_button_style
                .unwrap_or(self.primary_button_style),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: Self::DEFAULT_APP_NAME.to_owned(),
            logo: LogoKind::Default,
            primary_color: Self::DEFAULT_PRIMARY_COLOR.to_owned(),
            button_radius: ButtonRadius::Medium,
            primary_button_style: PrimaryButtonStyle::Filled,
        }
    }
}

/// Partial update for settings. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_radius: Option<ButtonRadius>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_button_style: Option<PrimaryButtonStyle>,
}

impl SettingsPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.logo.is_none()
            && self.primary_color.is_none()
            && self.button_radius.is_none()
            && self.primary_button_style.is_none()
    }

    #[must_use]
    pub fn primary_color(color: impl Into<String>) -> Self {
        Self {
            primary_color: Some(color.into()),
            ..Self::default()
        }
    }
}

/// A patch carrying every field, i.e. a full overwrite.
impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            app_name: Some(settings.app_name),
            logo: Some(settings.logo),
            primary_color: Some(settings.primary_color),
            button_radius: Some(settings.button_radius),
            primary_button_style: Some(settings.primary_button_style),
        }
    }
}

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Authentication state as reported by the identity capability.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityState {
    pub identity: Option<UserId>,
    /// `false` until the provider has reported its first answer.
    pub settled: bool,
}

impl IdentityState {
    #[must_use]
    pub fn pending() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            settled: true,
        }
    }

    #[must_use]
    pub fn signed_in(user: UserId) -> Self {
        Self {
            identity: Some(user),
            settled: true,
        }
    }
}

/// Federated identity providers offered on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FederatedProvider {
    Google,
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
        }
    }
}

/// Which settings record governs the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    /// Record owned by one signed-in user.
    User(UserId),
    /// Reserved shared record used when nobody is signed in.
    Global,
    /// Record kept in local persistence (single-tenant variant).
    Local,
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => write!(f, "user:{user}"),
            Self::Global => f.write_str("global"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// How a document write treats fields already in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The written document becomes the whole record.
    Replace,
    /// Written fields overwrite, all other stored fields are kept.
    Merge,
}

/// A numeric theme variable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeValue {
    /// Plain number, e.g. a hue in degrees.
    Number(u16),
    /// Percentage in `0..=100`.
    Percent(u8),
}

impl fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}
