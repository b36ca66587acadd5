use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDto;
use crate::domain::common::Currency;
use crate::domain::invoice::{InvoiceData, InvoiceError, InvoiceService, LineItemInput};
use crate::infrastructure::metrics::INVOICES_CREATED;

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemCommand {
  pub product_id: Option<Uuid>,
  pub product_name: Option<String>,
  pub quantity: i64,
  pub unit_price: Option<Decimal>,
  pub tax_id: Option<Uuid>,
}

impl From<LineItemCommand> for LineItemInput {
  fn from(item: LineItemCommand) -> Self {
    Self {
      product_id: item.product_id,
      product_name: item.product_name,
      quantity: item.quantity,
      unit_price: item.unit_price,
      tax_id: item.tax_id,
    }
  }
}

#[derive(Debug)]
pub struct CreateInvoiceCommand {
  pub organization_id: Uuid,
  pub customer_id: Uuid,
  pub invoice_number: Option<String>,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub currency: Option<String>,
  pub notes: Option<String>,
  pub line_items: Vec<LineItemCommand>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: CreateInvoiceCommand) -> Result<InvoiceDto, InvoiceError> {
    let currency = command
      .currency
      .as_deref()
      .map(Currency::from_str)
      .transpose()?;

    let data = InvoiceData {
      customer_id: command.customer_id,
      invoice_number: command.invoice_number.filter(|n| !n.trim().is_empty()),
      invoice_date: command.invoice_date,
      due_date: command.due_date,
      currency,
      notes: command.notes,
      line_items: command.line_items.into_iter().map(Into::into).collect(),
    };

    let invoice = self
      .invoice_service
      .create_invoice(command.organization_id, data)
      .await?;

    INVOICES_CREATED.inc();
    Ok(invoice.into())
  }
}
