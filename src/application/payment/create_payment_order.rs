use std::sync::Arc;
use uuid::Uuid;

use crate::domain::payment::{GatewayCheckout, PaymentError, PaymentService};

pub struct CreatePaymentOrderUseCase {
  payment_service: Arc<PaymentService>,
}

impl CreatePaymentOrderUseCase {
  pub fn new(payment_service: Arc<PaymentService>) -> Self {
    Self { payment_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<GatewayCheckout, PaymentError> {
    self.payment_service.create_gateway_order(invoice_id).await
  }
}
