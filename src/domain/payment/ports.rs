use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{GatewayOrder, Payment};
use super::errors::PaymentError;
use crate::domain::invoice::Invoice;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
  /// Inserts the payment and writes the updated invoice in one transaction,
  /// provided the invoice is still at `expected_version`
  async fn record(
    &self,
    payment: Payment,
    invoice: Invoice,
    expected_version: i64,
  ) -> Result<(Payment, Invoice), PaymentError>;
  /// Oldest first
  async fn find_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<Payment>, PaymentError>;
  /// Oldest first
  async fn find_by_contact(&self, contact_id: Uuid) -> Result<Vec<Payment>, PaymentError>;
  async fn exists_by_gateway_payment_id(&self, gateway_payment_id: &str) -> Result<bool, PaymentError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Public key the checkout widget is opened with
  fn key_id(&self) -> &str;
  async fn create_order(
    &self,
    amount_minor: u64,
    currency: &str,
    receipt: &str,
  ) -> Result<GatewayOrder, PaymentError>;
  async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError>;
}
