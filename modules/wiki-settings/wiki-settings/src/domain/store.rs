//! Settings store: resolves, holds and publishes the settings record that
//! governs the UI for the current identity.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wiki_settings_sdk::{
    DocumentStore, IdentityState, Settings, SettingsKey, SettingsPatch, UserId, WriteMode,
};

use super::document::{patch_to_document, sanitize, settings_to_document, validate_patch};
use super::error::{SettingsError, report};
use crate::config::SettingsConfig;

/// What presentation consumers observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub settings: Settings,
    /// `true` while a resolution is outstanding; `settings` is not
    /// authoritative in that window.
    pub loading: bool,
    /// Record the store is bound to, `None` before the first resolution.
    pub key: Option<SettingsKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The fetched record became the visible settings.
    Adopted,
    /// A newer resolution started meanwhile; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum UpdateOutcome {
    /// Applied in memory and acknowledged by storage.
    Persisted,
    /// Applied in memory, the write failed. Not rolled back.
    WriteFailed,
    /// Dropped without touching memory or storage.
    Rejected,
}

struct Binding {
    /// Token of the most recently started resolution.
    token: u64,
    identity: Option<UserId>,
    key: Option<SettingsKey>,
}

pub struct SettingsStore {
    config: SettingsConfig,
    storage: Arc<dyn DocumentStore>,
    binding: Mutex<Binding>,
    /// Held for the duration of every store-issued write, so writes land in
    /// the order they were issued and reads can wait for them.
    writes: tokio::sync::Mutex<()>,
    view: watch::Sender<SettingsView>,
}

impl SettingsStore {
    /// Create a store in the loading state, showing defaults until the first
    /// resolution completes.
    pub fn new(config: SettingsConfig, storage: Arc<dyn DocumentStore>) -> Self {
        let (view, _) = watch::channel(SettingsView {
            settings: Settings::default(),
            loading: true,
            key: None,
        });
        Self {
            config,
            storage,
            binding: Mutex::new(Binding {
                token: 0,
                identity: None,
                key: None,
            }),
            writes: tokio::sync::Mutex::new(()),
            view,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.view.borrow().settings.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.view.borrow().loading
    }

    #[must_use]
    pub fn view(&self) -> SettingsView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every change of the published view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SettingsView> {
        self.view.subscribe()
    }

    /// Identity is not settled: invalidate any resolution in flight, forget
    /// the bound identity and show the loading state.
    pub fn mark_pending(&self) {
        let mut binding = self.binding.lock();
        binding.token += 1;
        binding.identity = None;
        binding.key = None;
        self.view.send_modify(|view| view.loading = true);
    }

    fn is_current(&self, token: u64) -> bool {
        self.binding.lock().token == token
    }

    /// Load the record that applies to `identity` and make it visible.
    ///
    /// A missing record is initialized with defaults. A failed read falls back
    /// to defaults without writing anything. If another resolution starts
    /// before this one finishes, this result is discarded and nothing is
    /// written on its behalf.
    pub async fn resolve(&self, identity: Option<UserId>) -> ResolutionOutcome {
        let key = self.config.mode.key_for(identity.as_ref());
        let token = {
            let mut binding = self.binding.lock();
            binding.token += 1;
            binding.identity = identity;
            binding.key = Some(key.clone());
            self.view.send_modify(|view| {
                view.loading = true;
                view.key = Some(key.clone());
            });
            binding.token
        };

        let document_key = self.config.document_key(&key);
        debug!(key = %key, document = %document_key, token, "resolving settings");

        // Writes issued before this resolution must be visible to its read.
        drop(self.writes.lock().await);

        let settings = match self.storage.get(&document_key).await {
            Ok(Some(document)) => sanitize(&document),
            Ok(None) => {
                self.initialize(token, &document_key).await;
                Settings::default()
            }
            Err(source) => {
                report(&SettingsError::StorageRead {
                    key: document_key.clone(),
                    source,
                });
                Settings::default()
            }
        };

        self.adopt(token, settings)
    }

    /// Store the defaults under `document_key`, unless a newer resolution
    /// has started in the meantime.
    async fn initialize(&self, token: u64, document_key: &str) {
        let _writing = self.writes.lock().await;
        if !self.is_current(token) {
            debug!(document = %document_key, token, "skipping initialization for stale resolution");
            return;
        }
        info!(document = %document_key, "initializing settings document with defaults");
        if let Err(source) = self
            .storage
            .set(
                document_key,
                settings_to_document(&Settings::default()),
                WriteMode::Replace,
            )
            .await
        {
            report(&SettingsError::StorageWrite {
                key: document_key.to_owned(),
                source,
            });
        }
    }

    fn adopt(&self, token: u64, settings: Settings) -> ResolutionOutcome {
        let binding = self.binding.lock();
        if binding.token != token {
            debug!(token, latest = binding.token, "discarding stale settings resolution");
            return ResolutionOutcome::Superseded;
        }
        self.view.send_modify(|view| {
            view.settings = settings;
            view.loading = false;
        });
        ResolutionOutcome::Adopted
    }

    /// Merge `patch` into the current settings and persist it.
    ///
    /// The merged record is visible before the write is acknowledged. Only the
    /// fields present in `patch` are written, using a merge write. A failed
    /// write is reported and the in-memory value is kept. Updates are
    /// rejected while a resolution is outstanding.
    pub async fn update_settings(&self, patch: SettingsPatch) -> UpdateOutcome {
        if let Err(err) = validate_patch(&patch, self.config.max_app_name_length) {
            report(&err);
            return UpdateOutcome::Rejected;
        }

        let _writing = self.writes.lock().await;
        let key = {
            let binding = self.binding.lock();
            if self.view.borrow().loading {
                report(&SettingsError::rejected("settings are still loading"));
                return UpdateOutcome::Rejected;
            }
            if self.config.mode.requires_identity() && binding.identity.is_none() {
                report(&SettingsError::rejected("no signed-in identity"));
                return UpdateOutcome::Rejected;
            }
            let key = binding
                .key
                .clone()
                .unwrap_or_else(|| self.config.mode.key_for(binding.identity.as_ref()));
            self.view
                .send_modify(|view| view.settings = view.settings.merged(&patch));
            key
        };

        let document_key = self.config.document_key(&key);
        match self
            .storage
            .set(&document_key, patch_to_document(&patch), WriteMode::Merge)
            .await
        {
            Ok(()) => {
                debug!(document = %document_key, "settings update persisted");
                UpdateOutcome::Persisted
            }
            Err(source) => {
                report(&SettingsError::StorageWrite {
                    key: document_key,
                    source,
                });
                UpdateOutcome::WriteFailed
            }
        }
    }

    /// Follow the identity capability, resolving again whenever the settled
    /// identity changes.
    ///
    /// Each resolution runs as its own task and is never cancelled; stale
    /// completions are discarded by [`SettingsStore::resolve`].
    pub fn watch_identity(
        self: &Arc<Self>,
        mut identity: watch::Receiver<IdentityState>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut resolved: Option<Option<UserId>> = None;
            loop {
                let state = identity.borrow_and_update().clone();
                if state.settled {
                    if resolved.as_ref() != Some(&state.identity) {
                        resolved = Some(state.identity.clone());
                        let store = Arc::clone(&store);
                        tokio::spawn(async move {
                            let _ = store.resolve(state.identity).await;
                        });
                    }
                } else if resolved.take().is_some() {
                    store.mark_pending();
                }

                if identity.changed().await.is_err() {
                    debug!("identity session closed, stopping settings resolution");
                    break;
                }
            }
        })
    }
}
