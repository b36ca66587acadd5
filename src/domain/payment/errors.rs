use thiserror::Error;

use crate::domain::common::ValueObjectError;
use crate::domain::invoice::InvoiceError;

#[derive(Debug, Error)]
pub enum PaymentError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error(transparent)]
  Invoice(#[from] InvoiceError),

  #[error("Payment signature verification failed")]
  InvalidSignature,

  #[error("Gateway order does not belong to this invoice: {0}")]
  OrderMismatch(String),

  #[error("Gateway payment '{0}' has already been recorded")]
  DuplicateGatewayPayment(String),

  #[error("Payment gateway is not configured")]
  GatewayNotConfigured,

  #[error("Payment gateway error: {0}")]
  Gateway(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
