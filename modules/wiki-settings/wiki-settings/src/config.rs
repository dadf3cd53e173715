use serde::{Deserialize, Serialize};
use wiki_settings_sdk::{SettingsKey, UserId};

/// Which records the settings store reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsMode {
    /// One record in local persistence, identity is ignored.
    LocalOnly,
    /// Per-user record, the global record when nobody is signed in.
    #[default]
    UserScoped,
    /// One shared global record for everybody.
    GlobalOnly,
}

impl SettingsMode {
    #[must_use]
    pub fn key_for(self, identity: Option<&UserId>) -> SettingsKey {
        match (self, identity) {
            (Self::LocalOnly, _) => SettingsKey::Local,
            (Self::UserScoped, Some(user)) => SettingsKey::User(user.clone()),
            (Self::UserScoped | Self::GlobalOnly, _) => SettingsKey::Global,
        }
    }

    /// Updates are only accepted from a signed-in user.
    #[must_use]
    pub const fn requires_identity(self) -> bool {
        matches!(self, Self::UserScoped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    #[serde(default)]
    pub mode: SettingsMode,
    /// Collection holding per-user and global documents.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Document id reserved for the global record.
    #[serde(default = "default_global_document")]
    pub global_document: String,
    /// Local persistence key used in `local_only` mode.
    #[serde(default = "default_local_key")]
    pub local_key: String,
    #[serde(default = "default_max_app_name_length")]
    pub max_app_name_length: usize,
}

impl SettingsConfig {
    #[must_use]
    pub fn with_mode(mode: SettingsMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Storage key of the document backing `key`.
    #[must_use]
    pub fn document_key(&self, key: &SettingsKey) -> String {
        match key {
            SettingsKey::User(user) => format!("{}/{user}", self.collection),
            SettingsKey::Global => format!("{}/{}", self.collection, self.global_document),
            SettingsKey::Local => self.local_key.clone(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            mode: SettingsMode::default(),
            collection: default_collection(),
            global_document: default_global_document(),
            local_key: default_local_key(),
            max_app_name_length: default_max_app_name_length(),
        }
    }
}

fn default_collection() -> String {
    "settings".to_owned()
}

fn default_global_document() -> String {
    "global".to_owned()
}

fn default_local_key() -> String {
    "design-wiki-settings".to_owned()
}

fn default_max_app_name_length() -> usize {
    100
}
