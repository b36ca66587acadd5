use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::ValueObjectError;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Customer not found: {0}")]
  CustomerNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Tax not found: {0}")]
  TaxNotFound(Uuid),

  #[error("No document has been generated for invoice {0}")]
  DocumentNotFound(Uuid),

  #[error("Invoice number '{0}' already exists")]
  InvoiceNumberAlreadyExists(String),

  #[error("Invoice {id} was modified concurrently (expected version {expected_version})")]
  StaleWrite { id: Uuid, expected_version: i64 },

  #[error("Cannot edit invoice: {0}")]
  CannotEditInvoice(String),

  #[error("Invalid status transition: {0}")]
  InvalidStatusTransition(String),

  #[error("Payment not accepted: {0}")]
  PaymentNotAccepted(String),

  #[error("Grand total {grand_total} would fall below the amount already paid ({amount_paid})")]
  BalanceWouldBeNegative {
    grand_total: Decimal,
    amount_paid: Decimal,
  },

  #[error("Currency mismatch: expected {expected}, got {actual}")]
  CurrencyMismatch { expected: String, actual: String },

  #[error("No line items provided")]
  NoLineItems,

  #[error("Missing {field} for line item {position}")]
  IncompleteLineItem { position: usize, field: &'static str },

  #[error("PDF generation failed: {0}")]
  PdfGenerationFailed(String),

  #[error("Document storage failed: {0}")]
  Storage(String),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
