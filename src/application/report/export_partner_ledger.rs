use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use super::get_partner_ledger::{GetPartnerLedgerCommand, GetPartnerLedgerUseCase};
use crate::domain::report::{PartnerLedger, ReportError, ReportService};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Serialize)]
struct LedgerCsvRow<'a> {
  date: Option<NaiveDate>,
  kind: &'a str,
  document_number: &'a str,
  description: &'a str,
  debit: Decimal,
  credit: Decimal,
  balance: Decimal,
}

pub struct LedgerExport {
  pub file_name: String,
  pub content: Vec<u8>,
}

/// Opening balance row, one row per entry, closing totals row
pub fn ledger_to_csv(ledger: &PartnerLedger) -> Result<Vec<u8>, ReportError> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  let export_err = |e: csv::Error| ReportError::Export(e.to_string());

  writer
    .serialize(LedgerCsvRow {
      date: ledger.from,
      kind: "opening",
      document_number: "",
      description: "Opening balance",
      debit: Decimal::ZERO,
      credit: Decimal::ZERO,
      balance: ledger.opening_balance,
    })
    .map_err(export_err)?;

  for entry in &ledger.entries {
    writer
      .serialize(LedgerCsvRow {
        date: Some(entry.date),
        kind: entry.kind.as_str(),
        document_number: &entry.document_number,
        description: &entry.description,
        debit: entry.debit,
        credit: entry.credit,
        balance: entry.balance,
      })
      .map_err(export_err)?;
  }

  writer
    .serialize(LedgerCsvRow {
      date: ledger.to,
      kind: "closing",
      document_number: "",
      description: "Closing balance",
      debit: ledger.total_debit,
      credit: ledger.total_credit,
      balance: ledger.closing_balance,
    })
    .map_err(export_err)?;

  writer
    .into_inner()
    .map_err(|e| ReportError::Export(e.to_string()))
}

pub struct ExportPartnerLedgerUseCase {
  ledger: GetPartnerLedgerUseCase,
}

impl ExportPartnerLedgerUseCase {
  pub fn new(report_service: Arc<ReportService>) -> Self {
    Self {
      ledger: GetPartnerLedgerUseCase::new(report_service),
    }
  }

  pub async fn execute(&self, command: GetPartnerLedgerCommand) -> Result<LedgerExport, ReportError> {
    let ledger = self.ledger.execute(command).await?;
    let content = ledger_to_csv(&ledger)?;

    Ok(LedgerExport {
      file_name: format!("ledger-{}.csv", ledger.contact_id),
      content,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::common::Currency;
  use crate::domain::invoice::InvoiceStatus;
  use crate::domain::testing::{InMemoryStore, sample_customer, sample_invoice};
  use uuid::Uuid;

  fn service(store: &Arc<InMemoryStore>) -> Arc<ReportService> {
    Arc::new(ReportService::new(
      store.clone(),
      store.clone(),
      store.clone(),
      Currency::INR,
    ))
  }

  #[tokio::test]
  async fn test_export_writes_header_entries_and_totals() {
    let store = Arc::new(InMemoryStore::default());
    let org_id = Uuid::new_v4();
    let contact = sample_customer(org_id);
    let mut invoice = sample_invoice(org_id, contact.id);
    invoice.change_status(InvoiceStatus::Sent).unwrap();
    store.insert_contact(contact.clone());
    store.insert_invoice(invoice.clone());

    let export = ExportPartnerLedgerUseCase::new(service(&store))
      .execute(GetPartnerLedgerCommand {
        organization_id: org_id,
        contact_id: contact.id,
        from: None,
        to: None,
        currency: None,
      })
      .await
      .unwrap();

    let text = String::from_utf8(export.content).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
      lines[0],
      "date,kind,document_number,description,debit,credit,balance"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with("2024-03-01,invoice,"));
    assert!(lines[2].contains(invoice.invoice_number.value()));
    assert!(lines[3].starts_with(",closing,"));
    assert!(export.file_name.ends_with(".csv"));
  }

  #[tokio::test]
  async fn test_unknown_currency_is_rejected() {
    let store = Arc::new(InMemoryStore::default());

    let result = GetPartnerLedgerUseCase::new(service(&store))
      .execute(GetPartnerLedgerCommand {
        organization_id: Uuid::new_v4(),
        contact_id: Uuid::new_v4(),
        from: None,
        to: None,
        currency: Some("XYZ".to_string()),
      })
      .await;

    assert!(matches!(result, Err(ReportError::Validation(_))));
  }
}
