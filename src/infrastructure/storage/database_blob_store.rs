use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::invoice::{BlobStore, InvoiceError, StorageBackend, StoredBlob};

/// Keeps document bytes in the `document_blobs` table
pub struct DatabaseBlobStore {
  pool: PgPool,
}

impl DatabaseBlobStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl BlobStore for DatabaseBlobStore {
  fn backend(&self) -> StorageBackend {
    StorageBackend::Database
  }

  async fn put(
    &self,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
  ) -> Result<StoredBlob, InvoiceError> {
    let size_bytes = bytes.len() as i64;

    // Regenerating a document overwrites the previous blob under the same key
    sqlx::query(
      r#"
            INSERT INTO document_blobs (storage_key, content_type, content, size_bytes, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (storage_key) DO UPDATE
            SET content_type = EXCLUDED.content_type,
                content = EXCLUDED.content,
                size_bytes = EXCLUDED.size_bytes,
                created_at = EXCLUDED.created_at
            "#,
    )
    .bind(key)
    .bind(content_type)
    .bind(bytes)
    .bind(size_bytes)
    .execute(&self.pool)
    .await
    .map_err(|e| InvoiceError::Storage(format!("Failed to store blob {}: {}", key, e)))?;

    tracing::debug!(storage_key = %key, size_bytes, "Blob stored in database");

    Ok(StoredBlob {
      key: key.to_string(),
      size_bytes,
    })
  }

  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, InvoiceError> {
    let content: Option<Vec<u8>> =
      sqlx::query_scalar("SELECT content FROM document_blobs WHERE storage_key = $1")
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InvoiceError::Storage(format!("Failed to read blob {}: {}", key, e)))?;

    Ok(content)
  }

  async fn delete(&self, key: &str) -> Result<(), InvoiceError> {
    sqlx::query("DELETE FROM document_blobs WHERE storage_key = $1")
      .bind(key)
      .execute(&self.pool)
      .await
      .map_err(|e| InvoiceError::Storage(format!("Failed to delete blob {}: {}", key, e)))?;

    Ok(())
  }
}
