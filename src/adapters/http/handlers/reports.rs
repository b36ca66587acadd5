use actix_web::{HttpResponse, http::header, web};
use std::sync::Arc;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, PartnerLedgerQuery},
    errors::ApiError,
  },
  application::report::*,
};

/// JSON ledger, or a CSV attachment with `format=csv`
/// GET /api/v1/reports/partner-ledger
pub async fn partner_ledger_handler(
  query: web::Query<PartnerLedgerQuery>,
  ledger_use_case: web::Data<Arc<GetPartnerLedgerUseCase>>,
  export_use_case: web::Data<Arc<ExportPartnerLedgerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();
  let command = GetPartnerLedgerCommand {
    organization_id: query.organization_id,
    contact_id: query.contact_id,
    from: query.from,
    to: query.to,
    currency: query.currency,
  };

  match query.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
    Some("csv") => {
      let export = export_use_case.execute(command).await?;
      Ok(
        HttpResponse::Ok()
          .content_type(CSV_CONTENT_TYPE)
          .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
          ))
          .body(export.content),
      )
    }
    None | Some("json") => {
      let ledger = ledger_use_case.execute(command).await?;
      Ok(HttpResponse::Ok().json(ApiResponse::ok("Partner ledger built", ledger)))
    }
    Some(other) => Err(ApiError::Validation(format!(
      "Unsupported report format: {}",
      other
    ))),
  }
}
