use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use wiki_settings_sdk::{Document, DocumentStore, LocalStore, StorageError, WriteMode};

use super::apply_write;

/// Exposes a string key/value local store as a document store, keeping each
/// document as serialized JSON under its key.
pub struct LocalDocumentStore {
    local: Arc<dyn LocalStore>,
}

impl LocalDocumentStore {
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self { local }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError> {
        let Some(raw) = self.local.get(key).await? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing local value '{key}'"))?;
        match value {
            Value::Object(document) => Ok(Some(document)),
            _ => Err(StorageError::not_an_object(key)),
        }
    }

    async fn set(
        &self,
        key: &str,
        document: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        // Merging over an unreadable value is an error.
        let existing = match mode {
            WriteMode::Replace => None,
            WriteMode::Merge => self.get(key).await?,
        };
        let merged = apply_write(existing, document, mode);
        let raw = serde_json::to_string(&merged).context("serializing local settings")?;
        self.local.set(key, raw).await
    }
}

/// Local store kept in memory, lost with the process.
#[derive(Default)]
pub struct InMemoryLocalStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.write().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Local store keeping one `<key>.json` file per key in a directory.
pub struct DirLocalStore {
    dir: PathBuf,
}

impl DirLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl LocalStore for DirLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.file_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("reading {}", path.display()))
                .into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.file_for(key);
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn documents_are_stored_as_json_strings() {
        let local = Arc::new(InMemoryLocalStore::new());
        let store = LocalDocumentStore::new(local.clone());

        store
            .set(
                "design-wiki-settings",
                json!({ "appName": "Local" }).as_object().cloned().unwrap(),
                WriteMode::Replace,
            )
            .await
            .unwrap();

        let raw = local.get("design-wiki-settings").await.unwrap().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&raw).unwrap(),
            json!({ "appName": "Local" })
        );
    }

    #[tokio::test]
    async fn merge_write_keeps_the_full_record() {
        let local = Arc::new(InMemoryLocalStore::new());
        local
            .set(
                "design-wiki-settings",
                r##"{"appName":"Local","primaryColor":"#059669"}"##.to_owned(),
            )
            .await
            .unwrap();
        let store = LocalDocumentStore::new(local);

        store
            .set(
                "design-wiki-settings",
                json!({ "logo": "plus" }).as_object().cloned().unwrap(),
                WriteMode::Merge,
            )
            .await
            .unwrap();

        assert_eq!(
            Value::Object(store.get("design-wiki-settings").await.unwrap().unwrap()),
            json!({ "appName": "Local", "primaryColor": "#059669", "logo": "plus" })
        );
    }

    #[tokio::test]
    async fn unparsable_or_non_object_values_are_errors() {
        let local = Arc::new(InMemoryLocalStore::new());
        local.set("broken", "{".to_owned()).await.unwrap();
        local.set("array", "[1, 2]".to_owned()).await.unwrap();
        let store = LocalDocumentStore::new(local);

        assert!(matches!(
            store.get("broken").await,
            Err(StorageError::Backend(_))
        ));
        assert!(matches!(
            store.get("array").await,
            Err(StorageError::NotAnObject { .. })
        ));
    }

    #[tokio::test]
    async fn merge_over_unreadable_value_fails_and_keeps_it() {
        let local = Arc::new(InMemoryLocalStore::new());
        local.set("design-wiki-settings", "{".to_owned()).await.unwrap();
        let store = LocalDocumentStore::new(local.clone());

        let result = store
            .set(
                "design-wiki-settings",
                json!({ "logo": "plus" }).as_object().cloned().unwrap(),
                WriteMode::Merge,
            )
            .await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
        assert_eq!(
            local.get("design-wiki-settings").await.unwrap().as_deref(),
            Some("{")
        );

        store
            .set(
                "design-wiki-settings",
                json!({ "logo": "plus" }).as_object().cloned().unwrap(),
                WriteMode::Replace,
            )
            .await
            .unwrap();
        assert_eq!(
            Value::Object(store.get("design-wiki-settings").await.unwrap().unwrap()),
            json!({ "logo": "plus" })
        );
    }

    #[tokio::test]
    async fn dir_store_round_trips_and_escapes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let local = DirLocalStore::new(dir.path().join("local"));

        assert_eq!(local.get("settings/alice").await.unwrap(), None);
        local
            .set("settings/alice", "{}".to_owned())
            .await
            .unwrap();

        assert_eq!(
            local.get("settings/alice").await.unwrap().as_deref(),
            Some("{}")
        );
        assert!(dir.path().join("local").join("settings_alice.json").exists());
    }
}
