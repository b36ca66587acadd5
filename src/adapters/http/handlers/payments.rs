use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, RecordPaymentRequest, VerifyPaymentRequest},
    errors::ApiError,
  },
  application::payment::*,
};

/// Record a manual (cash on delivery, transfer, card) payment
/// POST /api/v1/invoices/{id}/payments
pub async fn record_payment_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<RecordPaymentRequest>,
  use_case: web::Data<Arc<RecordPaymentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let receipt = use_case
    .execute(RecordPaymentCommand {
      invoice_id: invoice_id.into_inner(),
      amount: request.amount,
      method: request.method,
      reference: request.reference,
      paid_at: request.paid_at,
      expected_version: request.expected_version,
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Payment recorded", receipt)))
}

/// GET /api/v1/invoices/{id}/payments
pub async fn list_payments_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ListPaymentsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let payments = use_case.execute(invoice_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Payments retrieved", payments)))
}

/// POST /api/v1/invoices/{id}/payment-orders
pub async fn create_payment_order_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<CreatePaymentOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let checkout = use_case.execute(invoice_id.into_inner()).await?;
  Ok(HttpResponse::Created().json(ApiResponse::ok("Payment order created", checkout)))
}

/// POST /api/v1/invoices/{id}/payments/verify
pub async fn verify_payment_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<VerifyPaymentRequest>,
  use_case: web::Data<Arc<VerifyGatewayPaymentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let receipt = use_case
    .execute(VerifyGatewayPaymentCommand {
      invoice_id: invoice_id.into_inner(),
      order_id: request.order_id,
      payment_id: request.payment_id,
      signature: request.signature,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Payment verified", receipt)))
}
