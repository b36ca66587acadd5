use std::sync::Arc;
use uuid::Uuid;

use super::record_payment::PaymentReceiptResponse;
use crate::domain::payment::{GatewayPaymentConfirmation, PaymentError, PaymentService};
use crate::infrastructure::metrics::PAYMENTS_RECORDED;

#[derive(Debug)]
pub struct VerifyGatewayPaymentCommand {
  pub invoice_id: Uuid,
  pub order_id: String,
  pub payment_id: String,
  pub signature: String,
}

pub struct VerifyGatewayPaymentUseCase {
  payment_service: Arc<PaymentService>,
}

impl VerifyGatewayPaymentUseCase {
  pub fn new(payment_service: Arc<PaymentService>) -> Self {
    Self { payment_service }
  }

  pub async fn execute(
    &self,
    command: VerifyGatewayPaymentCommand,
  ) -> Result<PaymentReceiptResponse, PaymentError> {
    let (payment, invoice) = self
      .payment_service
      .verify_gateway_payment(
        command.invoice_id,
        GatewayPaymentConfirmation {
          order_id: command.order_id,
          payment_id: command.payment_id,
          signature: command.signature,
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
  use crate::application::payment::CreatePaymentOrderUseCase;
  use crate::domain::invoice::InvoiceStatus;
  use crate::domain::payment::{GatewayIntegration, PaymentSignatureVerifier};
  use crate::domain::testing::{FakeGateway, InMemoryStore, sample_customer, sample_invoice};
  use rust_decimal_macros::dec;
  use secrecy::Secret;

  fn verifier() -> PaymentSignatureVerifier {
    PaymentSignatureVerifier::new(Secret::new("gateway-secret".to_string()))
  }

  fn setup() -> (Arc<PaymentService>, Arc<InMemoryStore>, Uuid) {
    let store = Arc::new(InMemoryStore::default());
    let org_id = Uuid::new_v4();
    let customer = sample_customer(org_id);
    store.insert_contact(customer.clone());
    let mut invoice = sample_invoice(org_id, customer.id);
    invoice.status = InvoiceStatus::Sent;
    store.insert_invoice(invoice.clone());

    let service = PaymentService::new(
      store.clone(),
      store.clone(),
      Some(GatewayIntegration {
        gateway: Arc::new(FakeGateway::default()),
        verifier: verifier(),
      }),
    );
    (Arc::new(service), store, invoice.id)
  }

  #[tokio::test]
  async fn test_signed_checkout_settles_invoice() {
    let (service, store, invoice_id) = setup();

    let checkout = CreatePaymentOrderUseCase::new(service.clone())
      .execute(invoice_id)
      .await
      .unwrap();
    assert_eq!(checkout.key_id, FakeGateway::KEY_ID);
    assert_eq!(checkout.order.amount, 40600);

    let payment_id = "pay_test_001".to_string();
    let signature = verifier().sign(&checkout.order.id, &payment_id).unwrap();

    let receipt = VerifyGatewayPaymentUseCase::new(service)
      .execute(VerifyGatewayPaymentCommand {
        invoice_id,
        order_id: checkout.order.id.clone(),
        payment_id: payment_id.clone(),
        signature,
      })
      .await
      .unwrap();

    assert_eq!(receipt.payment.method, "gateway");
    assert_eq!(receipt.payment.amount, dec!(406));
    assert_eq!(receipt.invoice.status, "paid");
    let stored = store.invoice(invoice_id).unwrap();
    let details = stored.payment_details.unwrap();
    assert_eq!(details.gateway_payment_id.as_deref(), Some(payment_id.as_str()));
    assert_eq!(details.gateway_order_id, Some(checkout.order.id));
  }

  #[tokio::test]
  async fn test_bad_signature_writes_nothing() {
    let (service, store, invoice_id) = setup();
    let checkout = CreatePaymentOrderUseCase::new(service.clone())
      .execute(invoice_id)
      .await
      .unwrap();

    let result = VerifyGatewayPaymentUseCase::new(service)
      .execute(VerifyGatewayPaymentCommand {
        invoice_id,
        order_id: checkout.order.id,
        payment_id: "pay_test_002".to_string(),
        signature: "00".repeat(32),
      })
      .await;

    assert!(matches!(result, Err(PaymentError::InvalidSignature)));
    let stored = store.invoice(invoice_id).unwrap();
    assert_eq!(stored.amount_paid, dec!(0));
    assert!(stored.payment_details.is_none());
  }

  #[tokio::test]
  async fn test_gateway_disabled() {
    let store = Arc::new(InMemoryStore::default());
    let service = Arc::new(PaymentService::new(store.clone(), store, None));

    let result = CreatePaymentOrderUseCase::new(service)
      .execute(Uuid::new_v4())
      .await;
    assert!(matches!(result, Err(PaymentError::GatewayNotConfigured)));
  }
}
