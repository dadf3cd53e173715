use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use wiki_settings_sdk::{Document, DocumentStore, StorageError, WriteMode};

use super::apply_write;

/// Process-local document store.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with `value`. Non-object values are ignored.
    pub fn insert(&self, key: &str, value: Value) {
        if let Value::Object(document) = value {
            self.documents.write().insert(key.to_owned(), document);
        }
    }

    #[must_use]
    pub fn document(&self, key: &str) -> Option<Document> {
        self.documents.read().get(key).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError> {
        Ok(self.document(key))
    }

    async fn set(
        &self,
        key: &str,
        document: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let mut documents = self.documents.write();
        let existing = documents.remove(key);
        documents.insert(key.to_owned(), apply_write(existing, document, mode));
        Ok(())
    }
}
