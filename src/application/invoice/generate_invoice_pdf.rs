use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDto;
use crate::domain::invoice::{InvoiceDocumentService, InvoiceError};
use crate::infrastructure::metrics::INVOICE_DOCUMENTS_GENERATED;

#[derive(Debug)]
pub struct GenerateInvoicePdfCommand {
  pub invoice_id: Uuid,
  pub expected_version: Option<i64>,
}

pub struct GenerateInvoicePdfUseCase {
  document_service: Arc<InvoiceDocumentService>,
}

impl GenerateInvoicePdfUseCase {
  pub fn new(document_service: Arc<InvoiceDocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(
    &self,
    command: GenerateInvoicePdfCommand,
  ) -> Result<InvoiceDto, InvoiceError> {
    let invoice = self
      .document_service
      .generate_pdf(command.invoice_id, command.expected_version)
      .await?;

    INVOICE_DOCUMENTS_GENERATED.inc();
    Ok(invoice.into())
  }
}
