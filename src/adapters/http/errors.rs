use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::catalog::CatalogError;
use crate::domain::contact::ContactError;
use crate::domain::invoice::InvoiceError;
use crate::domain::payment::PaymentError;
use crate::domain::report::ReportError;

use super::dtos::ApiResponse;

static EXPOSE_UPSTREAM_DETAILS: AtomicBool = AtomicBool::new(false);

/// Upstream failure text is only passed to clients in development
pub fn expose_upstream_details(enabled: bool) {
  EXPOSE_UPSTREAM_DETAILS.store(enabled, Ordering::Relaxed);
}

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// 400 Bad Request
  Validation(String),

  /// 404 Not Found
  NotFound(String),

  /// 409 Conflict (duplicates, references, stale writes)
  Conflict(String),

  /// 500, a collaborator outside the process failed
  Upstream(String),

  /// 500
  Internal(String),
}

impl ApiError {
  fn kind(&self) -> &'static str {
    match self {
      ApiError::Validation(_) => "validation_error",
      ApiError::NotFound(_) => "not_found",
      ApiError::Conflict(_) => "conflict",
      ApiError::Upstream(_) => "upstream_error",
      ApiError::Internal(_) => "internal_error",
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg.clone(),
      ApiError::Upstream(msg) => {
        tracing::error!("Upstream error: {}", msg);
        if EXPOSE_UPSTREAM_DETAILS.load(Ordering::Relaxed) {
          msg.clone()
        } else {
          "An upstream service failed".to_string()
        }
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        "An internal server error occurred".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ApiResponse::failure(message, self.kind()))
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    if messages.is_empty() {
      messages.push(errors.to_string());
    }
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

impl From<ContactError> for ApiError {
  fn from(error: ContactError) -> Self {
    match error {
      ContactError::Validation(e) => ApiError::Validation(e.to_string()),
      e @ ContactError::NotFound(_) => ApiError::NotFound(e.to_string()),
      e @ (ContactError::EmailAlreadyExists(_) | ContactError::InUse(_)) => {
        ApiError::Conflict(e.to_string())
      }
      ContactError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::Validation(e) => ApiError::Validation(e.to_string()),
      e @ (CatalogError::TaxNotFound(_) | CatalogError::ProductNotFound(_)) => {
        ApiError::NotFound(e.to_string())
      }
      e @ CatalogError::TaxInUse(_) => ApiError::Conflict(e.to_string()),
      CatalogError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(e) => ApiError::Validation(e.to_string()),
      e @ (InvoiceError::CannotEditInvoice(_)
      | InvoiceError::InvalidStatusTransition(_)
      | InvoiceError::PaymentNotAccepted(_)
      | InvoiceError::BalanceWouldBeNegative { .. }
      | InvoiceError::CurrencyMismatch { .. }
      | InvoiceError::NoLineItems
      | InvoiceError::IncompleteLineItem { .. }) => ApiError::Validation(e.to_string()),
      e @ (InvoiceError::CustomerNotFound(_)
      | InvoiceError::InvoiceNotFound(_)
      | InvoiceError::ProductNotFound(_)
      | InvoiceError::TaxNotFound(_)
      | InvoiceError::DocumentNotFound(_)) => ApiError::NotFound(e.to_string()),
      e @ (InvoiceError::InvoiceNumberAlreadyExists(_) | InvoiceError::StaleWrite { .. }) => {
        ApiError::Conflict(e.to_string())
      }
      e @ (InvoiceError::PdfGenerationFailed(_) | InvoiceError::Storage(_)) => {
        ApiError::Upstream(e.to_string())
      }
      InvoiceError::Repository(msg) => ApiError::Internal(msg),
      InvoiceError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<PaymentError> for ApiError {
  fn from(error: PaymentError) -> Self {
    match error {
      PaymentError::Validation(e) => ApiError::Validation(e.to_string()),
      PaymentError::Invoice(e) => ApiError::from(e),
      e @ (PaymentError::InvalidSignature
      | PaymentError::OrderMismatch(_)
      | PaymentError::GatewayNotConfigured) => ApiError::Validation(e.to_string()),
      e @ PaymentError::DuplicateGatewayPayment(_) => ApiError::Conflict(e.to_string()),
      e @ PaymentError::Gateway(_) => ApiError::Upstream(e.to_string()),
      PaymentError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<ReportError> for ApiError {
  fn from(error: ReportError) -> Self {
    match error {
      ReportError::Validation(e) => ApiError::Validation(e.to_string()),
      e @ ReportError::ContactNotFound(_) => ApiError::NotFound(e.to_string()),
      ReportError::Source(msg) | ReportError::Export(msg) => ApiError::Internal(msg),
    }
  }
}
