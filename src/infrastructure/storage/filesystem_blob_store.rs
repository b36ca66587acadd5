use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::domain::invoice::{BlobStore, InvoiceError, StorageBackend, StoredBlob};

/// Keeps document bytes as plain files below a root directory
pub struct FileSystemBlobStore {
  root: PathBuf,
}

impl FileSystemBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Maps a storage key onto a path that cannot escape the root
  fn resolve(&self, key: &str) -> Result<PathBuf, InvoiceError> {
    let relative = Path::new(key);
    let is_safe = !key.is_empty()
      && relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));

    if !is_safe {
      return Err(InvoiceError::Storage(format!("Invalid storage key: {}", key)));
    }
    Ok(self.root.join(relative))
  }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
  fn backend(&self) -> StorageBackend {
    StorageBackend::Filesystem
  }

  async fn put(
    &self,
    key: &str,
    bytes: Vec<u8>,
    _content_type: &str,
  ) -> Result<StoredBlob, InvoiceError> {
    let path = self.resolve(key)?;
    let size_bytes = bytes.len() as i64;

    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await.map_err(|e| {
        InvoiceError::Storage(format!("Failed to create {}: {}", parent.display(), e))
      })?;
    }

    // Write then rename so readers never observe a half-written file
    let partial = path.with_extension("partial");
    tokio::fs::write(&partial, &bytes)
      .await
      .map_err(|e| InvoiceError::Storage(format!("Failed to write {}: {}", partial.display(), e)))?;
    tokio::fs::rename(&partial, &path)
      .await
      .map_err(|e| InvoiceError::Storage(format!("Failed to move {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), size_bytes, "Blob stored on filesystem");

    Ok(StoredBlob {
      key: key.to_string(),
      size_bytes,
    })
  }

  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, InvoiceError> {
    let path = self.resolve(key)?;

    match tokio::fs::read(&path).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(InvoiceError::Storage(format!(
        "Failed to read {}: {}",
        path.display(),
        e
      ))),
    }
  }

  async fn delete(&self, key: &str) -> Result<(), InvoiceError> {
    let path = self.resolve(key)?;

    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(InvoiceError::Storage(format!(
        "Failed to delete {}: {}",
        path.display(),
        e
      ))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_put_get_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSystemBlobStore::new(dir.path());
    let key = "invoices/org-1/INV-000001.pdf";

    let stored = store
      .put(key, b"%PDF-1.4".to_vec(), "application/pdf")
      .await
      .unwrap();
    assert_eq!(stored.size_bytes, 8);
    assert!(dir.path().join(key).exists());
    assert!(!dir.path().join("invoices/org-1/INV-000001.partial").exists());

    assert_eq!(store.get(key).await.unwrap().as_deref(), Some(&b"%PDF-1.4"[..]));

    store.delete(key).await.unwrap();
    assert!(store.get(key).await.unwrap().is_none());
    // Deleting twice is fine
    store.delete(key).await.unwrap();
  }

  #[tokio::test]
  async fn test_keys_cannot_escape_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSystemBlobStore::new(dir.path());

    for key in ["../outside.pdf", "/etc/passwd", "invoices/../../x", ""] {
      let result = store.put(key, b"x".to_vec(), "application/pdf").await;
      assert!(
        matches!(result, Err(InvoiceError::Storage(_))),
        "key {:?} should be rejected",
        key
      );
    }
  }
}
