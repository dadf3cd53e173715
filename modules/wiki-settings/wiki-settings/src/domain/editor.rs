//! Staged editing of settings, committed through the store on confirmation.

use std::sync::Arc;

use tokio::sync::watch;
use wiki_settings_sdk::{ButtonRadius, LogoKind, PrimaryButtonStyle, Settings, SettingsPatch};

use super::store::{SettingsStore, SettingsView, UpdateOutcome};

/// A single-field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    AppName(String),
    Logo(LogoKind),
    PrimaryColor(String),
    ButtonRadius(ButtonRadius),
    PrimaryButtonStyle(PrimaryButtonStyle),
}

/// Local copy of the settings that buffers edits until `commit`.
///
/// Whenever the store publishes different settings (a remote load finished,
/// someone else updated), the staged copy is re-seeded from them.
pub struct SettingsEditor {
    store: Arc<SettingsStore>,
    updates: watch::Receiver<SettingsView>,
    baseline: Settings,
    staged: Settings,
}

impl SettingsEditor {
    pub fn new(store: Arc<SettingsStore>) -> Self {
        let updates = store.subscribe();
        let baseline = updates.borrow().settings.clone();
        Self {
            store,
            updates,
            staged: baseline.clone(),
            baseline,
        }
    }

    fn sync(&mut self) {
        if !self.updates.has_changed().unwrap_or(false) {
            return;
        }
        let current = self.updates.borrow_and_update().settings.clone();
        if current != self.baseline {
            self.staged = current.clone();
            self.baseline = current;
        }
    }

    pub fn staged(&mut self) -> &Settings {
        self.sync();
        &self.staged
    }

    pub fn has_unsaved_changes(&mut self) -> bool {
        self.sync();
        self.staged != self.baseline
    }

    pub fn stage(&mut self, change: FieldChange) {
        self.sync();
        match change {
            FieldChange::AppName(name) => self.staged.app_name = name,
            FieldChange::Logo(logo) => self.staged.logo = logo,
            FieldChange::PrimaryColor(color) => self.staged.primary_color = color,
            FieldChange::ButtonRadius(radius) => self.staged.button_radius = radius,
            FieldChange::PrimaryButtonStyle(style) => self.staged.primary_button_style = style,
        }
    }

    /// Send the whole staged record to the store as a full overwrite.
    pub async fn commit(&mut self) -> UpdateOutcome {
        self.sync();
        let patch = SettingsPatch::from(self.staged.clone());
        self.store.update_settings(patch).await
    }

    pub fn discard(&mut self) {
        self.sync();
        self.staged = self.baseline.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SettingsConfig, SettingsMode};
    use crate::domain::fields::SettingsFields;
    use crate::infra::storage::InMemoryDocumentStore;
    use serde_json::json;

    fn store_with(storage: &Arc<InMemoryDocumentStore>) -> Arc<SettingsStore> {
        Arc::new(SettingsStore::new(
            SettingsConfig::with_mode(SettingsMode::GlobalOnly),
            storage.clone(),
        ))
    }

    #[tokio::test]
    async fn staging_tracks_unsaved_changes_and_discard_resets() {
        let storage = Arc::new(InMemoryDocumentStore::new());
        let store = store_with(&storage);
        let _ = store.resolve(None).await;
        let mut editor = SettingsEditor::new(store.clone());

        assert!(!editor.has_unsaved_changes());

        editor.stage(FieldChange::PrimaryColor("#0891b2".to_owned()));
        editor.stage(FieldChange::Logo(LogoKind::Plus));
        assert!(editor.has_unsaved_changes());
        assert_eq!(editor.staged().logo, LogoKind::Plus);
        assert_eq!(store.settings(), Settings::default());

        editor.discard();
        assert!(!editor.has_unsaved_changes());
        assert_eq!(editor.staged(), &Settings::default());
    }

    #[tokio::test]
    async fn commit_writes_full_record_and_clears_changes() {
        let storage = Arc::new(InMemoryDocumentStore::new());
        let store = store_with(&storage);
        let _ = store.resolve(None).await;
        storage.insert("settings/global", json!({ "appName": "Design Wiki" }));
        let mut editor = SettingsEditor::new(store.clone());

        editor.stage(FieldChange::AppName("Acme".to_owned()));
        editor.stage(FieldChange::ButtonRadius(ButtonRadius::Full));
        let outcome = editor.commit().await;

        assert_eq!(outcome, UpdateOutcome::Persisted);
        assert!(!editor.has_unsaved_changes());
        assert_eq!(store.settings().app_name, "Acme");

        let stored = storage.document("settings/global").unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[SettingsFields::BUTTON_RADIUS], json!("full"));
        assert_eq!(stored[SettingsFields::PRIMARY_COLOR], json!("#C92D3B"));
    }

    #[tokio::test]
    async fn reseeds_when_store_loads_a_record() {
        let storage = Arc::new(InMemoryDocumentStore::new());
        storage.insert("settings/global", json!({ "appName": "Acme", "logo": "cube" }));
        let store = store_with(&storage);
        let mut editor = SettingsEditor::new(store.clone());
        assert_eq!(editor.staged(), &Settings::default());

        let _ = store.resolve(None).await;

        assert_eq!(editor.staged().app_name, "Acme");
        assert_eq!(editor.staged().logo, LogoKind::Cube);
        assert!(!editor.has_unsaved_changes());
    }

    #[tokio::test]
    async fn loading_flag_changes_keep_staged_edits() {
        let storage = Arc::new(InMemoryDocumentStore::new());
        let store = store_with(&storage);
        let _ = store.resolve(None).await;
        let mut editor = SettingsEditor::new(store.clone());

        editor.stage(FieldChange::PrimaryButtonStyle(PrimaryButtonStyle::Outline));
        store.mark_pending();

        assert!(editor.has_unsaved_changes());
        assert_eq!(editor.staged().primary_button_style, PrimaryButtonStyle::Outline);
    }

    #[tokio::test]
    async fn rejected_commit_keeps_edits_staged() {
        let storage = Arc::new(InMemoryDocumentStore::new());
        let store = store_with(&storage);
        let _ = store.resolve(None).await;
        let mut editor = SettingsEditor::new(store.clone());

        editor.stage(FieldChange::PrimaryColor("#zzzzzz".to_owned()));
        let outcome = editor.commit().await;

        assert_eq!(outcome, UpdateOutcome::Rejected);
        assert!(editor.has_unsaved_changes());
        assert_eq!(store.settings(), Settings::default());
    }
}
