use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;
use wiki_settings_sdk::{Document, DocumentStore, StorageError, WriteMode};

use super::apply_write;

type Documents = BTreeMap<String, Document>;

/// Document store persisted as one JSON object (`key -> document`) on disk.
///
/// Writes go to a temporary sibling file that is renamed over the original.
pub struct JsonFileDocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> anyhow::Result<Documents> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Documents::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    async fn persist(&self, documents: &Documents) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut documents = self.load().await?;
        Ok(documents.remove(key))
    }

    async fn set(
        &self,
        key: &str,
        document: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut documents = self.load().await?;
        let existing = documents.remove(key);
        documents.insert(key.to_owned(), apply_write(existing, document, mode));
        self.persist(&documents).await?;
        Ok(())
    }
}
