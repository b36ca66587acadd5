use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDto;
use crate::domain::invoice::{InvoiceDocumentService, InvoiceError, InvoiceService};

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  document_service: Arc<InvoiceDocumentService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(
    invoice_service: Arc<InvoiceService>,
    document_service: Arc<InvoiceDocumentService>,
  ) -> Self {
    Self {
      invoice_service,
      document_service,
    }
  }

  /// Deletes the invoice with its line items and payments, then its stored PDF
  pub async fn execute(&self, invoice_id: Uuid) -> Result<InvoiceDto, InvoiceError> {
    let deleted = self.invoice_service.delete_invoice(invoice_id).await?;
    self.document_service.discard(&deleted).await;
    Ok(deleted.into())
  }
}
