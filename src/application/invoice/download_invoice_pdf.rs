use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{DownloadedDocument, InvoiceDocumentService, InvoiceError};

pub struct DownloadInvoicePdfUseCase {
  document_service: Arc<InvoiceDocumentService>,
}

impl DownloadInvoicePdfUseCase {
  pub fn new(document_service: Arc<InvoiceDocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<DownloadedDocument, InvoiceError> {
    self.document_service.download_pdf(invoice_id).await
  }
}
