use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use wiki_settings::SettingsConfig;

/// Prefix of environment overrides, e.g. `WIKI__SETTINGS__MODE=global_only`.
const ENV_PREFIX: &str = "WIKI__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Base directory; `~` expands to the user's home.
    #[serde(default = "default_home_dir")]
    pub home_dir: String,
    /// Shared document file, relative to `home_dir`.
    #[serde(default = "default_documents_file")]
    pub documents_file: String,
    /// Directory of per-key files used in `local_only` mode.
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            documents_file: default_documents_file(),
            local_dir: default_local_dir(),
        }
    }
}

fn default_home_dir() -> String {
    "~/.wiki-settings".to_owned()
}

fn default_documents_file() -> String {
    "documents.json".to_owned()
}

fn default_local_dir() -> String {
    "local".to_owned()
}

impl StorageConfig {
    /// # Errors
    /// Fails when `home_dir` starts with `~` and no home directory is known.
    pub fn home(&self) -> Result<PathBuf> {
        expand_tilde(&self.home_dir)
    }

    /// # Errors
    /// See [`StorageConfig::home`].
    pub fn documents_path(&self) -> Result<PathBuf> {
        Ok(self.home()?.join(&self.documents_file))
    }

    /// # Errors
    /// See [`StorageConfig::home`].
    pub fn local_path(&self) -> Result<PathBuf> {
        Ok(self.home()?.join(&self.local_dir))
    }
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };
    let home = env::home_dir().context("HOME is not set, cannot expand '~'")?;
    Ok(home.join(rest))
}

impl AppConfig {
    /// Layered load: defaults, then the YAML file (if any), then `WIKI__*`
    /// environment variables.
    ///
    /// # Errors
    /// Fails when the file is missing or any layer does not fit the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Raise the log level from repeated `-v` flags.
    pub fn apply_verbosity(&mut self, verbose: u8) {
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }
}
