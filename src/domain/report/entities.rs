use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::common::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerDocumentKind {
  Invoice,
  Payment,
}

impl LedgerDocumentKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      LedgerDocumentKind::Invoice => "invoice",
      LedgerDocumentKind::Payment => "payment",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
  pub date: NaiveDate,
  pub kind: LedgerDocumentKind,
  pub document_id: Uuid,
  pub document_number: String,
  pub description: String,
  pub debit: Decimal,
  pub credit: Decimal,
  pub balance: Decimal,
}

/// Inclusive date window; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerPeriod {
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
}

impl LedgerPeriod {
  pub fn is_before(&self, date: NaiveDate) -> bool {
    self.from.is_some_and(|from| date < from)
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    !self.is_before(date) && self.to.is_none_or(|to| date <= to)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerLedger {
  pub contact_id: Uuid,
  pub contact_name: String,
  pub currency: Currency,
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  pub opening_balance: Decimal,
  pub entries: Vec<LedgerEntry>,
  pub total_debit: Decimal,
  pub total_credit: Decimal,
  pub closing_balance: Decimal,
}
