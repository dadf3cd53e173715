use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;
use wiki_settings::infra::identity::InMemoryIdentitySession;
use wiki_settings::infra::storage::{DirLocalStore, JsonFileDocumentStore, LocalDocumentStore};
use wiki_settings::infra::surface::CssVariables;
use wiki_settings::{
    ACCENT_PRESETS, DocumentStore, FieldChange, IdentitySession, SettingsEditor, SettingsMode,
    SettingsPatch, SettingsStore, ThemeApplier, UpdateOutcome, UserId, hex_to_hsl,
};

use crate::config::AppConfig;

fn build_storage(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    let storage: Arc<dyn DocumentStore> = match config.settings.mode {
        SettingsMode::LocalOnly => {
            let dir = config.storage.local_path()?;
            info!(dir = %dir.display(), "using local settings directory");
            Arc::new(LocalDocumentStore::new(Arc::new(DirLocalStore::new(dir))))
        }
        SettingsMode::UserScoped | SettingsMode::GlobalOnly => {
            let path = config.storage.documents_path()?;
            info!(path = %path.display(), "using settings document file");
            Arc::new(JsonFileDocumentStore::new(path))
        }
    };
    Ok(storage)
}

/// Wire storage, identity and the store, and wait for the first resolution.
pub async fn open_store(config: &AppConfig, user: Option<&str>) -> Result<Arc<SettingsStore>> {
    let store = Arc::new(SettingsStore::new(
        config.settings.clone(),
        build_storage(config)?,
    ));
    let session = InMemoryIdentitySession::new();
    let _watcher = store.watch_identity(session.subscribe());

    match user {
        Some(id) => session.restore(UserId::new(id)),
        None => session.settle(),
    }

    let mut view = store.subscribe();
    view.wait_for(|v| !v.loading)
        .await
        .context("settings store stopped before resolving")?;
    Ok(store)
}

pub fn check(config: &AppConfig) -> Result<()> {
    info!("checking configuration");
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

pub fn presets() {
    for preset in ACCENT_PRESETS {
        match hex_to_hsl(preset) {
            Some(hsl) => println!("{preset}  hsl({} {}% {}%)", hsl.h, hsl.s, hsl.l),
            None => println!("{preset}"),
        }
    }
}

pub fn show(store: &SettingsStore, json: bool) -> Result<()> {
    let view = store.view();
    let settings = &view.settings;
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    if let Some(key) = &view.key {
        println!("record:               {key}");
    }
    println!("loading:              {}", view.loading);
    println!("appName:              {}", settings.app_name);
    println!("logo:                 {}", settings.logo.as_str());
    match hex_to_hsl(&settings.primary_color) {
        Some(hsl) => println!(
            "primaryColor:         {} (hsl {} {}% {}%)",
            settings.primary_color, hsl.h, hsl.s, hsl.l
        ),
        None => println!("primaryColor:         {}", settings.primary_color),
    }
    println!(
        "buttonRadius:         {} ({})",
        settings.button_radius.as_str(),
        settings.button_radius.css_class()
    );
    println!(
        "primaryButtonStyle:   {}",
        settings.primary_button_style.as_str()
    );
    Ok(())
}

pub fn theme(store: &SettingsStore) -> Result<()> {
    let surface = Arc::new(CssVariables::new());
    let applier = ThemeApplier::new(surface.clone());
    let settings = store.settings();
    if applier.apply(&settings).is_none() {
        bail!("stored accent color '{}' is not a valid hex color", settings.primary_color);
    }
    println!("{}", surface.to_css());
    Ok(())
}

/// Stage every given field in an editor and commit the staged record.
pub async fn set(store: &Arc<SettingsStore>, patch: SettingsPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to update, pass at least one field");
    }
    let mut editor = SettingsEditor::new(Arc::clone(store));
    for change in field_changes(patch) {
        editor.stage(change);
    }
    if !editor.has_unsaved_changes() {
        println!("Settings already up to date");
        return Ok(());
    }
    match editor.commit().await {
        UpdateOutcome::Persisted => {
            println!("Settings saved");
            Ok(())
        }
        UpdateOutcome::WriteFailed => bail!("settings could not be saved"),
        UpdateOutcome::Rejected => {
            bail!("update rejected, check the values or pass --user in user_scoped mode")
        }
    }
}

fn field_changes(patch: SettingsPatch) -> Vec<FieldChange> {
    let SettingsPatch {
        app_name,
        logo,
        primary_color,
        button_radius,
        primary_button_style,
    } = patch;
    [
        app_name.map(FieldChange::AppName),
        logo.map(FieldChange::Logo),
        primary_color.map(FieldChange::PrimaryColor),
        button_radius.map(FieldChange::ButtonRadius),
        primary_button_style.map(FieldChange::PrimaryButtonStyle),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use wiki_settings::{SettingsConfig, SettingsKey};

    fn config_in(dir: &std::path::Path, mode: SettingsMode) -> AppConfig {
        AppConfig {
            storage: StorageConfig {
                home_dir: dir.display().to_string(),
                ..StorageConfig::default()
            },
            settings: SettingsConfig::with_mode(mode),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn set_then_reopen_sees_update() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), SettingsMode::UserScoped);

        let store = open_store(&config, Some("alice")).await.unwrap();
        assert_eq!(store.view().key, Some(SettingsKey::User(UserId::from("alice"))));
        set(&store, SettingsPatch::primary_color("#0891b2"))
            .await
            .unwrap();

        let reopened = open_store(&config, Some("alice")).await.unwrap();
        assert_eq!(reopened.settings().primary_color, "#0891b2");
        let anonymous = open_store(&config, None).await.unwrap();
        assert_eq!(anonymous.settings().primary_color, "#C92D3B");
    }

    #[tokio::test]
    async fn anonymous_set_is_an_error_in_user_scoped_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), SettingsMode::UserScoped);

        let store = open_store(&config, None).await.unwrap();
        assert!(set(&store, SettingsPatch::primary_color("#0891b2")).await.is_err());
        assert!(set(&store, SettingsPatch::default()).await.is_err());
        assert_eq!(store.settings().primary_color, "#C92D3B");
    }

    #[test]
    fn patch_becomes_one_change_per_field() {
        let changes = field_changes(SettingsPatch {
            app_name: Some("Docs".to_owned()),
            ..SettingsPatch::primary_color("#059669")
        });
        assert_eq!(
            changes,
            vec![
                FieldChange::AppName("Docs".to_owned()),
                FieldChange::PrimaryColor("#059669".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn local_mode_writes_into_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), SettingsMode::LocalOnly);

        let store = open_store(&config, None).await.unwrap();
        set(&store, SettingsPatch::primary_color("#d97706"))
            .await
            .unwrap();

        assert!(dir.path().join("local").join("design-wiki-settings.json").exists());
        let reopened = open_store(&config, Some("bob")).await.unwrap();
        assert_eq!(reopened.view().key, Some(SettingsKey::Local));
        assert_eq!(reopened.settings().primary_color, "#d97706");
    }
}
