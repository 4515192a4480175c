use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::documents::{DocumentError, DocumentStore, StoredDocument, Upload};

const MAX_EXTENSION_LEN: usize = 8;

/// Keeps uploads on local disk as `<uuid>[.<ext>]`, with a `<uuid>.meta.json`
/// sidecar recording the original filename.
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_path(&self, key: &Uuid) -> PathBuf {
        self.root.join(format!("{key}.meta.json"))
    }
}

fn extension_of(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());

    valid.then(|| ext.to_ascii_lowercase())
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(&self, upload: Upload) -> Result<StoredDocument, DocumentError> {
        if upload.bytes.is_empty() {
            return Err(DocumentError::Empty);
        }

        let key = Uuid::new_v4();
        let file_name = match extension_of(&upload.original_name) {
            Some(ext) => format!("{key}.{ext}"),
            None => key.to_string(),
        };
        let path = self.root.join(file_name);

        fs::write(&path, &upload.bytes).await?;

        let document = StoredDocument {
            key,
            path,
            original_name: upload.original_name,
            content_type: upload.content_type,
            size: upload.bytes.len() as u64,
        };

        let metadata = serde_json::to_vec_pretty(&document)?;
        if let Err(err) = fs::write(self.metadata_path(&key), metadata).await {
            let _ = fs::remove_file(&document.path).await;
            return Err(err.into());
        }

        Ok(document)
    }

    async fn discard(&self, document: &StoredDocument) {
        for path in [document.path.clone(), self.metadata_path(&document.key)] {
            if let Err(err) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %err, "failed to discard document");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use uuid::Uuid;

    use super::{extension_of, LocalDocumentStore};
    use crate::documents::{DocumentError, DocumentStore, StoredDocument, Upload};

    async fn scratch_store() -> LocalDocumentStore {
        let root = std::env::temp_dir().join(format!("rider-docs-{}", Uuid::new_v4()));
        LocalDocumentStore::open(root).await.unwrap()
    }

    fn upload(name: &str, body: &'static [u8]) -> Upload {
        Upload {
            original_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn extension_is_kept_only_when_plain() {
        assert_eq!(extension_of("licence.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("no_extension"), None);
        assert_eq!(extension_of("../../etc/passwd"), None);
        assert_eq!(extension_of("weird.p d f"), None);
    }

    #[tokio::test]
    async fn same_original_name_never_collides() {
        let store = scratch_store().await;

        let first = store.save(upload("papers.pdf", b"first")).await.unwrap();
        let second = store.save(upload("papers.pdf", b"second")).await.unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"second");
        assert_eq!(first.original_name, "papers.pdf");
        assert!(first.path.starts_with(store.root()));

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn metadata_sidecar_records_original_name() {
        let store = scratch_store().await;
        let saved = store.save(upload("my licence.pdf", b"%PDF")).await.unwrap();

        let raw = tokio::fs::read(store.metadata_path(&saved.key)).await.unwrap();
        let metadata: StoredDocument = serde_json::from_slice(&raw).unwrap();
        assert_eq!(metadata, saved);
        assert_eq!(metadata.size, 4);

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let store = scratch_store().await;
        let err = store.save(upload("papers.pdf", b"")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Empty));

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn discard_removes_file_and_metadata() {
        let store = scratch_store().await;
        let saved = store.save(upload("papers.pdf", b"%PDF")).await.unwrap();

        store.discard(&saved).await;

        assert!(!saved.path.exists());
        assert!(!store.metadata_path(&saved.key).exists());

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }
}
