use sqlx::PgPool;
use std::sync::Arc;

use super::{DatabaseBlobStore, FileSystemBlobStore};
use crate::domain::invoice::{BlobStore, StorageBackend};
use crate::infrastructure::config::StorageConfig;

pub struct BlobStoreFactory;

impl BlobStoreFactory {
  /// Picks the document store named in configuration; there is no runtime fallback
  pub fn create(config: &StorageConfig, pool: PgPool) -> Arc<dyn BlobStore> {
    match config.backend {
      StorageBackend::Database => {
        tracing::info!("Storing invoice documents in the database");
        Arc::new(DatabaseBlobStore::new(pool))
      }
      StorageBackend::Filesystem => {
        tracing::info!(
          root = %config.filesystem_root,
          "Storing invoice documents on the filesystem"
        );
        Arc::new(FileSystemBlobStore::new(&config.filesystem_root))
      }
    }
  }
}
