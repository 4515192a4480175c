pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalDocumentStore;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("uploaded document is empty")]
    Empty,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata encoding failed: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub key: Uuid,
    pub path: PathBuf,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

impl StoredDocument {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, upload: Upload) -> Result<StoredDocument, DocumentError>;

    async fn discard(&self, document: &StoredDocument);
}
