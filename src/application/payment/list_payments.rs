use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::payment::{Payment, PaymentError, PaymentService};

#[derive(Debug, Serialize)]
pub struct PaymentDto {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub contact_id: Uuid,
  pub amount: Decimal,
  pub currency: String,
  pub method: String,
  pub reference: Option<String>,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub paid_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
  fn from(payment: Payment) -> Self {
    Self {
      id: payment.id,
      invoice_id: payment.invoice_id,
      contact_id: payment.contact_id,
      amount: payment.amount,
      currency: payment.currency.as_str().to_string(),
      method: payment.method.as_str().to_string(),
      reference: payment.reference,
      gateway_order_id: payment.gateway_order_id,
      gateway_payment_id: payment.gateway_payment_id,
      paid_at: payment.paid_at,
      created_at: payment.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
  pub payments: Vec<PaymentDto>,
  pub total_paid: Decimal,
}

pub struct ListPaymentsUseCase {
  payment_service: Arc<PaymentService>,
}

impl ListPaymentsUseCase {
  pub fn new(payment_service: Arc<PaymentService>) -> Self {
    Self { payment_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<ListPaymentsResponse, PaymentError> {
    let payments = self.payment_service.list_payments(invoice_id).await?;
    let total_paid = payments.iter().map(|p| p.amount).sum();

    Ok(ListPaymentsResponse {
      payments: payments.into_iter().map(PaymentDto::from).collect(),
      total_paid,
    })
  }
}
