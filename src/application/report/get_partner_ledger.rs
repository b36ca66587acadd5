use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::Currency;
use crate::domain::report::{PartnerLedger, PartnerLedgerQuery, ReportError, ReportService};

#[derive(Debug, Clone)]
pub struct GetPartnerLedgerCommand {
  pub organization_id: Uuid,
  pub contact_id: Uuid,
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  pub currency: Option<String>,
}

pub struct GetPartnerLedgerUseCase {
  report_service: Arc<ReportService>,
}

impl GetPartnerLedgerUseCase {
  pub fn new(report_service: Arc<ReportService>) -> Self {
    Self { report_service }
  }

  pub async fn execute(&self, command: GetPartnerLedgerCommand) -> Result<PartnerLedger, ReportError> {
    let currency = command
      .currency
      .as_deref()
      .map(Currency::from_str)
      .transpose()?;

    self
      .report_service
      .partner_ledger(PartnerLedgerQuery {
        organization_id: command.organization_id,
        contact_id: command.contact_id,
        from: command.from,
        to: command.to,
        currency,
      })
      .await
  }
}
