use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::value_objects::{InvoiceStatus, StorageBackend};
use crate::domain::contact::Contact;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
  pub status: Option<InvoiceStatus>,
  pub customer_id: Option<Uuid>,
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Persists the header and every line item, or nothing
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  /// Writes the header and replaces the line items if the stored version
  /// still equals `expected_version`; the returned invoice carries the new version
  async fn update(&self, invoice: Invoice, expected_version: i64) -> Result<Invoice, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  /// Newest invoice date first
  async fn find_by_organization(
    &self,
    organization_id: Uuid,
    filter: InvoiceFilter,
  ) -> Result<Vec<Invoice>, InvoiceError>;
  async fn exists_by_number(
    &self,
    invoice_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, InvoiceError>;
  async fn next_sequence_value(&self) -> Result<i64, InvoiceError>;
  /// Removes the invoice with its line items and payments
  async fn delete(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
}

/// Everything the PDF layout needs about one invoice
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
  pub invoice: Invoice,
  pub customer: Contact,
}

#[async_trait]
pub trait PdfGenerator: Send + Sync {
  async fn generate(&self, document: &InvoiceDocument) -> Result<Vec<u8>, InvoiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
  pub key: String,
  pub size_bytes: i64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
  fn backend(&self) -> StorageBackend;
  async fn put(
    &self,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
  ) -> Result<StoredBlob, InvoiceError>;
  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, InvoiceError>;
  async fn delete(&self, key: &str) -> Result<(), InvoiceError>;
}
