use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::contact::Contact;
use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceLineItem, InvoiceService, PaymentDetails, TaxSnapshot,
};

#[derive(Debug, Serialize)]
pub struct InvoiceLineItemDto {
  pub id: Uuid,
  pub position: i32,
  pub product_id: Option<Uuid>,
  pub product_name: String,
  pub quantity: u32,
  pub unit_price: Decimal,
  pub tax: Option<TaxSnapshot>,
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
}

impl From<InvoiceLineItem> for InvoiceLineItemDto {
  fn from(item: InvoiceLineItem) -> Self {
    Self {
      id: item.id,
      position: item.position,
      product_id: item.product_id,
      product_name: item.product_name.into_inner(),
      quantity: item.quantity.value(),
      unit_price: item.unit_price.value(),
      tax: item.tax,
      subtotal: item.subtotal,
      tax_amount: item.tax_amount,
      total: item.total,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceTotalsDto {
  pub sub_total: Decimal,
  pub total_tax: Decimal,
  pub grand_total: Decimal,
  pub amount_paid: Decimal,
  pub balance_due: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PdfDocumentDto {
  pub storage_key: String,
  pub backend: String,
  pub size_bytes: i64,
  pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDto {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub customer_id: Uuid,
  pub invoice_number: String,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: String,
  pub currency: String,
  pub line_items: Vec<InvoiceLineItemDto>,
  pub totals: InvoiceTotalsDto,
  pub notes: Option<String>,
  pub pdf: Option<PdfDocumentDto>,
  pub payment_details: Option<PaymentDetails>,
  pub version: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDto {
  fn from(invoice: Invoice) -> Self {
    Self {
      id: invoice.id,
      organization_id: invoice.organization_id,
      customer_id: invoice.customer_id,
      invoice_number: invoice.invoice_number.into_inner(),
      invoice_date: invoice.invoice_date,
      due_date: invoice.due_date,
      status: invoice.status.as_str().to_string(),
      currency: invoice.currency.as_str().to_string(),
      line_items: invoice
        .line_items
        .into_iter()
        .map(InvoiceLineItemDto::from)
        .collect(),
      totals: InvoiceTotalsDto {
        sub_total: invoice.sub_total,
        total_tax: invoice.total_tax,
        grand_total: invoice.grand_total,
        amount_paid: invoice.amount_paid,
        balance_due: invoice.balance_due,
      },
      notes: invoice.notes,
      pdf: invoice.pdf.map(|pdf| PdfDocumentDto {
        storage_key: pdf.storage_key,
        backend: pdf.backend.as_str().to_string(),
        size_bytes: pdf.size_bytes,
        generated_at: pdf.generated_at,
      }),
      payment_details: invoice.payment_details,
      version: invoice.version,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CustomerSummaryDto {
  pub id: Uuid,
  pub name: String,
  pub email: Option<String>,
  pub phone: Option<String>,
}

impl From<Contact> for CustomerSummaryDto {
  fn from(contact: Contact) -> Self {
    Self {
      id: contact.id,
      name: contact.name.into_inner(),
      email: contact.email.map(|e| e.into_inner()),
      phone: contact.phone,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  #[serde(flatten)]
  pub invoice: InvoiceDto,
  pub customer: CustomerSummaryDto,
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let (invoice, customer) = self
      .invoice_service
      .get_invoice_with_customer(invoice_id)
      .await?;

    Ok(InvoiceDetailsResponse {
      invoice: invoice.into(),
      customer: customer.into(),
    })
  }
}
