mod json_file_repo;
mod local_repo;
mod memory_repo;

pub use json_file_repo::JsonFileDocumentStore;
pub use local_repo::{DirLocalStore, InMemoryLocalStore, LocalDocumentStore};
pub use memory_repo::InMemoryDocumentStore;

use wiki_settings_sdk::{Document, WriteMode};

/// Result of writing `document` over `existing`.
fn apply_write(existing: Option<Document>, document: Document, mode: WriteMode) -> Document {
    match (mode, existing) {
        (WriteMode::Merge, Some(mut existing)) => {
            existing.extend(document);
            existing
        }
        (WriteMode::Merge, None) | (WriteMode::Replace, _) => document,
    }
}
