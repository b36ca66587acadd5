use actix_web::HttpResponse;

use crate::adapters::http::{
  dtos::{ApiResponse, HealthResponse},
  errors::ApiError,
};
use crate::infrastructure::metrics;

/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(ApiResponse::ok(
    "Service is healthy",
    HealthResponse {
      status: "ok",
      version: env!("CARGO_PKG_VERSION"),
    },
  ))
}

/// Prometheus text exposition
/// GET /metrics
pub async fn metrics_handler() -> Result<HttpResponse, ApiError> {
  let body = metrics::gather().map_err(|e| ApiError::Internal(format!("Metrics error: {}", e)))?;

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; version=0.0.4")
      .body(body),
  )
}
