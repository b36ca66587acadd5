use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Invoice, PdfReference};
use super::errors::InvoiceError;
use super::ports::{BlobStore, InvoiceDocument, InvoiceRepository, PdfGenerator};
use crate::domain::contact::ContactRepository;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A stored PDF ready to be sent to the client
pub struct DownloadedDocument {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

pub struct InvoiceDocumentService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  contact_repo: Arc<dyn ContactRepository>,
  pdf_generator: Arc<dyn PdfGenerator>,
  blob_store: Arc<dyn BlobStore>,
}

impl InvoiceDocumentService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    contact_repo: Arc<dyn ContactRepository>,
    pdf_generator: Arc<dyn PdfGenerator>,
    blob_store: Arc<dyn BlobStore>,
  ) -> Self {
    Self {
      invoice_repo,
      contact_repo,
      pdf_generator,
      blob_store,
    }
  }

  /// `invoices/<organization>/<invoice id>/v<version>-<invoice number>.pdf`.
  /// The id and version make the key unique; the number is only there for humans.
  pub fn storage_key(invoice: &Invoice, version: i64) -> String {
    format!(
      "invoices/{}/{}/v{}-{}.pdf",
      invoice.organization_id,
      invoice.id,
      version,
      sanitize_file_stem(invoice.invoice_number.value())
    )
  }

  pub async fn generate_pdf(
    &self,
    invoice_id: Uuid,
    expected_version: Option<i64>,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

    let version = invoice.version;
    if let Some(expected) = expected_version {
      if expected != version {
        return Err(InvoiceError::StaleWrite {
          id: invoice_id,
          expected_version: expected,
        });
      }
    }

    let customer = self
      .contact_repo
      .find_by_id(invoice.customer_id)
      .await
      .map_err(|e| InvoiceError::Repository(format!("Failed to fetch customer: {}", e)))?
      .ok_or(InvoiceError::CustomerNotFound(invoice.customer_id))?;

    let document = InvoiceDocument {
      invoice: invoice.clone(),
      customer,
    };
    let bytes = self.pdf_generator.generate(&document).await?;

    // Keyed by the version being committed; a losing writer never touches a referenced blob
    let key = Self::storage_key(&invoice, version + 1);
    let stored = self.blob_store.put(&key, bytes, PDF_CONTENT_TYPE).await?;
    let previous = invoice.pdf.take();

    invoice.attach_pdf(PdfReference {
      storage_key: stored.key.clone(),
      backend: self.blob_store.backend(),
      size_bytes: stored.size_bytes,
      generated_at: Utc::now(),
    });

    let updated = match self.invoice_repo.update(invoice, version).await {
      Ok(updated) => updated,
      Err(e) => {
        self.remove_blob(invoice_id, &stored.key).await;
        return Err(e);
      }
    };

    let backend = self.blob_store.backend();
    if let Some(previous) = previous.filter(|p| p.backend == backend && p.storage_key != stored.key)
    {
      self.remove_blob(invoice_id, &previous.storage_key).await;
    }

    tracing::info!(
      invoice_id = %invoice_id,
      storage_key = %key,
      backend = self.blob_store.backend().as_str(),
      "Invoice PDF stored"
    );
    Ok(updated)
  }

  pub async fn download_pdf(&self, invoice_id: Uuid) -> Result<DownloadedDocument, InvoiceError> {
    let invoice = self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

    let pdf = invoice
      .pdf
      .as_ref()
      .ok_or(InvoiceError::DocumentNotFound(invoice_id))?;

    if pdf.backend != self.blob_store.backend() {
      tracing::warn!(
        invoice_id = %invoice_id,
        stored_in = pdf.backend.as_str(),
        configured = self.blob_store.backend().as_str(),
        "Invoice PDF was stored by another backend"
      );
    }

    let bytes = self
      .blob_store
      .get(&pdf.storage_key)
      .await?
      .ok_or(InvoiceError::DocumentNotFound(invoice_id))?;

    Ok(DownloadedDocument {
      file_name: format!("{}.pdf", sanitize_file_stem(invoice.invoice_number.value())),
      bytes,
    })
  }

  /// Removes the stored PDF of a deleted invoice; failures are only logged
  pub async fn discard(&self, invoice: &Invoice) {
    if let Some(pdf) = &invoice.pdf {
      self.remove_blob(invoice.id, &pdf.storage_key).await;
    }
  }

  async fn remove_blob(&self, invoice_id: Uuid, storage_key: &str) {
    if let Err(e) = self.blob_store.delete(storage_key).await {
      tracing::warn!(
        invoice_id = %invoice_id,
        storage_key = %storage_key,
        error = %e,
        "Failed to remove invoice PDF"
      );
    }
  }
}

/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`
fn sanitize_file_stem(value: &str) -> String {
  value
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
        c
      } else {
        '_'
      }
    })
    .collect()
}
