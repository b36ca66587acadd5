use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use super::create_invoice::LineItemCommand;
use super::get_invoice_details::InvoiceDto;
use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceUpdateData};

/// Header fields left as `None` keep their stored value; `line_items`
/// replaces the whole list when present
#[derive(Debug, Default)]
pub struct UpdateInvoiceCommand {
  pub invoice_id: Uuid,
  pub customer_id: Option<Uuid>,
  pub invoice_number: Option<String>,
  pub invoice_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub notes: Option<String>,
  pub line_items: Option<Vec<LineItemCommand>>,
  pub expected_version: Option<i64>,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: UpdateInvoiceCommand) -> Result<InvoiceDto, InvoiceError> {
    let data = InvoiceUpdateData {
      customer_id: command.customer_id,
      invoice_number: command.invoice_number.filter(|n| !n.trim().is_empty()),
      invoice_date: command.invoice_date,
      due_date: command.due_date,
      notes: command.notes,
      line_items: command
        .line_items
        .map(|items| items.into_iter().map(Into::into).collect()),
      expected_version: command.expected_version,
    };

    let invoice = self
      .invoice_service
      .update_invoice(command.invoice_id, data)
      .await?;

    Ok(invoice.into())
  }
}
