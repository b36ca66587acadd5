use actix_web::{HttpResponse, http::header, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{
      ApiResponse, ChangeStatusRequest, CreateInvoiceRequest, ListInvoicesQuery,
      UpdateInvoiceRequest, VersionRequest,
    },
    errors::ApiError,
  },
  application::invoice::*,
  domain::invoice::PDF_CONTENT_TYPE,
};

/// POST /api/v1/invoices
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let invoice = use_case
    .execute(CreateInvoiceCommand {
      organization_id: request.organization_id,
      customer_id: request.customer_id,
      invoice_number: request.invoice_number,
      invoice_date: request.invoice_date,
      due_date: request.due_date,
      currency: request.currency,
      notes: request.notes,
      line_items: request.line_items.into_iter().map(Into::into).collect(),
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Invoice created", invoice)))
}

/// GET /api/v1/invoices?organization_id=..&status=..&customer_id=..
pub async fn list_invoices_handler(
  query: web::Query<ListInvoicesQuery>,
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let response = use_case
    .execute(ListInvoicesCommand {
      organization_id: query.organization_id,
      status_filter: query.status,
      customer_filter: query.customer_id,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoices retrieved", response)))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice = use_case.execute(invoice_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice retrieved", invoice)))
}

/// PUT /api/v1/invoices/{id}
pub async fn update_invoice_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<UpdateInvoiceRequest>,
  use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let invoice = use_case
    .execute(UpdateInvoiceCommand {
      invoice_id: invoice_id.into_inner(),
      customer_id: request.customer_id,
      invoice_number: request.invoice_number,
      invoice_date: request.invoice_date,
      due_date: request.due_date,
      notes: request.notes,
      line_items: request
        .line_items
        .map(|items| items.into_iter().map(Into::into).collect()),
      expected_version: request.expected_version,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice updated", invoice)))
}

/// PATCH /api/v1/invoices/{id}/status
pub async fn change_invoice_status_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<ChangeStatusRequest>,
  use_case: web::Data<Arc<ChangeInvoiceStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let invoice = use_case
    .execute(ChangeInvoiceStatusCommand {
      invoice_id: invoice_id.into_inner(),
      new_status: request.status,
      expected_version: request.expected_version,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice status updated", invoice)))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice = use_case.execute(invoice_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice deleted", invoice)))
}

/// Render, store and attach the invoice PDF
/// POST /api/v1/invoices/{id}/pdf
pub async fn generate_invoice_pdf_handler(
  invoice_id: web::Path<Uuid>,
  request: Option<web::Json<VersionRequest>>,
  use_case: web::Data<Arc<GenerateInvoicePdfUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let expected_version = request.and_then(|r| r.into_inner().expected_version);

  let invoice = use_case
    .execute(GenerateInvoicePdfCommand {
      invoice_id: invoice_id.into_inner(),
      expected_version,
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Invoice PDF generated", invoice)))
}

/// GET /api/v1/invoices/{id}/pdf
pub async fn download_invoice_pdf_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DownloadInvoicePdfUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let document = use_case.execute(invoice_id.into_inner()).await?;

  Ok(
    HttpResponse::Ok()
      .content_type(PDF_CONTENT_TYPE)
      .insert_header(header::ContentDisposition {
        disposition: header::DispositionType::Inline,
        parameters: vec![header::DispositionParam::Filename(document.file_name)],
      })
      .body(document.bytes),
  )
}
