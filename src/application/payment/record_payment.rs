use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::list_payments::PaymentDto;
use crate::application::invoice::InvoiceDto;
use crate::domain::payment::{PaymentError, PaymentMethod, PaymentService, RecordPaymentData};
use crate::infrastructure::metrics::PAYMENTS_RECORDED;

#[derive(Debug)]
pub struct RecordPaymentCommand {
  pub invoice_id: Uuid,
  pub amount: Decimal,
  pub method: Option<String>,
  pub reference: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub expected_version: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentReceiptResponse {
  pub payment: PaymentDto,
  pub invoice: InvoiceDto,
}

pub struct RecordPaymentUseCase {
  payment_service: Arc<PaymentService>,
}

impl RecordPaymentUseCase {
  pub fn new(payment_service: Arc<PaymentService>) -> Self {
    Self { payment_service }
  }

  /// Cash on delivery unless another method is named
  pub async fn execute(
    &self,
    command: RecordPaymentCommand,
  ) -> Result<PaymentReceiptResponse, PaymentError> {
    let method = match command.method.as_deref() {
      Some(method) => PaymentMethod::from_str(method)?,
      None => PaymentMethod::Cash,
    };

    let (payment, invoice) = self
      .payment_service
      .record_payment(
        command.invoice_id,
        RecordPaymentData {
          amount: command.amount,
          method,
          reference: command.reference,
          paid_at: command.paid_at,
          expected_version: command.expected_version,
        },
      )
      .await?;

    PAYMENTS_RECORDED
      .with_label_values(&[payment.method.as_str()])
      .inc();
    Ok(PaymentReceiptResponse {
      payment: payment.into(),
      invoice: invoice.into(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::payment::ListPaymentsUseCase;
  use crate::domain::invoice::{InvoiceError, InvoiceStatus};
  use crate::domain::testing::{InMemoryStore, sample_customer, sample_invoice};
  use rust_decimal_macros::dec;

  fn setup() -> (Arc<PaymentService>, Arc<InMemoryStore>, Uuid) {
    let store = Arc::new(InMemoryStore::default());
    let org_id = Uuid::new_v4();
    let customer = sample_customer(org_id);
    store.insert_contact(customer.clone());
    let mut invoice = sample_invoice(org_id, customer.id);
    invoice.status = InvoiceStatus::Sent;
    store.insert_invoice(invoice.clone());

    let service = Arc::new(PaymentService::new(store.clone(), store.clone(), None));
    (service, store, invoice.id)
  }

  fn command(invoice_id: Uuid, amount: Decimal) -> RecordPaymentCommand {
    RecordPaymentCommand {
      invoice_id,
      amount,
      method: None,
      reference: None,
      paid_at: None,
      expected_version: None,
    }
  }

  #[tokio::test]
  async fn test_partial_then_full_payment() {
    let (service, store, invoice_id) = setup();
    let use_case = RecordPaymentUseCase::new(service.clone());

    let first = use_case.execute(command(invoice_id, dec!(106))).await.unwrap();
    assert_eq!(first.payment.method, "cash");
    assert_eq!(first.invoice.status, "partially_paid");
    assert_eq!(first.invoice.totals.balance_due, dec!(300));

    let second = use_case
      .execute(RecordPaymentCommand {
        method: Some("bank_transfer".to_string()),
        reference: Some("TRX-42".to_string()),
        ..command(invoice_id, dec!(300))
      })
      .await
      .unwrap();
    assert_eq!(second.invoice.status, "paid");
    assert_eq!(second.invoice.totals.balance_due, dec!(0));
    assert_eq!(
      store.invoice(invoice_id).unwrap().status,
      InvoiceStatus::Paid
    );

    let listed = ListPaymentsUseCase::new(service).execute(invoice_id).await.unwrap();
    assert_eq!(listed.payments.len(), 2);
    assert_eq!(listed.total_paid, dec!(406));
  }

  #[tokio::test]
  async fn test_overpayment_is_rejected() {
    let (service, store, invoice_id) = setup();

    let result = RecordPaymentUseCase::new(service)
      .execute(command(invoice_id, dec!(406.01)))
      .await;

    assert!(matches!(
      result,
      Err(PaymentError::Invoice(InvoiceError::PaymentNotAccepted(_)))
    ));
    assert_eq!(store.invoice(invoice_id).unwrap().amount_paid, dec!(0));
  }

  #[tokio::test]
  async fn test_gateway_method_cannot_be_recorded_manually() {
    let (service, _store, invoice_id) = setup();

    let result = RecordPaymentUseCase::new(service)
      .execute(RecordPaymentCommand {
        method: Some("gateway".to_string()),
        ..command(invoice_id, dec!(10))
      })
      .await;

    assert!(matches!(result, Err(PaymentError::Validation(_))));
  }
}
