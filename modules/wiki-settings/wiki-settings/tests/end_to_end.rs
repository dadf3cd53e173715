#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests wiring identity, storage, the settings store, the theme
//! applier and the editor together the way a host application does.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiki_settings::domain::theme::{ACCENT_HUE, ACCENT_LIGHTNESS, ACCENT_SATURATION};
use wiki_settings::infra::identity::InMemoryIdentitySession;
use wiki_settings::infra::storage::InMemoryDocumentStore;
use wiki_settings::infra::surface::CssVariables;
use wiki_settings::{
    FieldChange, IdentitySession, SettingsConfig, SettingsEditor, SettingsKey, SettingsStore,
    ThemeApplier, ThemeValue, UpdateOutcome,
};

struct Harness {
    session: Arc<InMemoryIdentitySession>,
    storage: Arc<InMemoryDocumentStore>,
    surface: Arc<CssVariables>,
    store: Arc<SettingsStore>,
}

fn start() -> Harness {
    let session = Arc::new(InMemoryIdentitySession::new());
    let storage = Arc::new(InMemoryDocumentStore::new());
    let surface = Arc::new(CssVariables::new());
    let store = Arc::new(SettingsStore::new(
        SettingsConfig::default(),
        storage.clone(),
    ));
    let applier = Arc::new(ThemeApplier::new(surface.clone()));

    let _ = store.watch_identity(session.subscribe());
    let _ = applier.watch(store.subscribe());

    Harness {
        session,
        storage,
        surface,
        store,
    }
}

async fn eventually(what: &str, condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn accent(surface: &CssVariables) -> (Option<ThemeValue>, Option<ThemeValue>, Option<ThemeValue>) {
    (
        surface.get(ACCENT_HUE),
        surface.get(ACCENT_SATURATION),
        surface.get(ACCENT_LIGHTNESS),
    )
}

fn hsl(h: u16, s: u8, l: u8) -> (Option<ThemeValue>, Option<ThemeValue>, Option<ThemeValue>) {
    (
        Some(ThemeValue::Number(h)),
        Some(ThemeValue::Percent(s)),
        Some(ThemeValue::Percent(l)),
    )
}

#[tokio::test]
async fn anonymous_visitor_gets_initialized_global_record() {
    let h = start();
    assert!(h.store.is_loading());

    h.session.settle();
    eventually("global settings", || {
        let view = h.store.view();
        view.key == Some(SettingsKey::Global) && !view.loading
    })
    .await;

    assert_eq!(
        h.storage.document("settings/global").map(Value::Object),
        Some(json!({
            "appName": "Design Wiki",
            "logo": "default",
            "primaryColor": "#C92D3B",
            "buttonRadius": "medium",
            "primaryButtonStyle": "filled",
        }))
    );
    eventually("default accent", || accent(&h.surface) == hsl(355, 63, 48)).await;
}

#[tokio::test]
async fn signed_in_user_edits_own_record_and_sign_out_restores_global() {
    let h = start();
    h.storage
        .insert("settings/global", json!({ "appName": "Shared Wiki" }));
    h.session.settle();
    eventually("global settings", || {
        h.store.view().key == Some(SettingsKey::Global) && !h.store.is_loading()
    })
    .await;

    let user = h.session.sign_up("ada@example.com", "secret-1").await.unwrap();
    let user_key = SettingsKey::User(user.clone());
    eventually("user settings", || {
        let view = h.store.view();
        view.key.as_ref() == Some(&user_key) && !view.loading
    })
    .await;
    assert_eq!(h.store.settings().app_name, "Design Wiki");

    let mut editor = SettingsEditor::new(h.store.clone());
    editor.stage(FieldChange::PrimaryColor("#4f46e5".to_owned()));
    editor.stage(FieldChange::AppName("Ada's Wiki".to_owned()));
    assert!(editor.has_unsaved_changes());
    assert_eq!(editor.commit().await, UpdateOutcome::Persisted);

    let stored = h
        .storage
        .document(&format!("settings/{user}"))
        .unwrap();
    assert_eq!(stored.get("primaryColor"), Some(&json!("#4f46e5")));
    assert_eq!(stored.get("appName"), Some(&json!("Ada's Wiki")));
    eventually("user accent", || accent(&h.surface) == hsl(243, 75, 59)).await;

    h.session.sign_out().await.unwrap();
    eventually("global settings again", || {
        let view = h.store.view();
        view.key == Some(SettingsKey::Global) && !view.loading
    })
    .await;
    assert_eq!(h.store.settings().app_name, "Shared Wiki");
    eventually("default accent", || accent(&h.surface) == hsl(355, 63, 48)).await;
}

#[tokio::test]
async fn anonymous_updates_are_rejected() {
    let h = start();
    h.session.settle();
    eventually("global settings", || !h.store.is_loading()).await;

    let mut editor = SettingsEditor::new(h.store.clone());
    editor.stage(FieldChange::PrimaryColor("#059669".to_owned()));

    assert_eq!(editor.commit().await, UpdateOutcome::Rejected);
    assert_eq!(
        h.storage
            .document("settings/global")
            .and_then(|doc| doc.get("primaryColor").cloned()),
        Some(json!("#C92D3B"))
    );
    assert!(editor.has_unsaved_changes());
}
