use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{LedgerPeriod, PartnerLedger};
use super::errors::ReportError;
use super::ledger::build_partner_ledger;
use crate::domain::common::{Currency, ValueObjectError};
use crate::domain::contact::ContactRepository;
use crate::domain::invoice::{InvoiceFilter, InvoiceRepository};
use crate::domain::payment::PaymentRepository;

pub struct PartnerLedgerQuery {
  pub organization_id: Uuid,
  pub contact_id: Uuid,
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  pub currency: Option<Currency>,
}

pub struct ReportService {
  contact_repo: Arc<dyn ContactRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
  payment_repo: Arc<dyn PaymentRepository>,
  default_currency: Currency,
}

impl ReportService {
  pub fn new(
    contact_repo: Arc<dyn ContactRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    default_currency: Currency,
  ) -> Self {
    Self {
      contact_repo,
      invoice_repo,
      payment_repo,
      default_currency,
    }
  }

  pub async fn partner_ledger(&self, query: PartnerLedgerQuery) -> Result<PartnerLedger, ReportError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
      if from > to {
        return Err(
          ValueObjectError::InvalidDateRange(format!("from {} is after to {}", from, to)).into(),
        );
      }
    }

    let contact = self
      .contact_repo
      .find_by_id(query.contact_id)
      .await
      .map_err(|e| ReportError::Source(e.to_string()))?
      .filter(|c| c.organization_id == query.organization_id)
      .ok_or(ReportError::ContactNotFound(query.contact_id))?;

    let invoices = self
      .invoice_repo
      .find_by_organization(
        query.organization_id,
        InvoiceFilter {
          status: None,
          customer_id: Some(contact.id),
        },
      )
      .await
      .map_err(|e| ReportError::Source(e.to_string()))?;

    let payments = self
      .payment_repo
      .find_by_contact(contact.id)
      .await
      .map_err(|e| ReportError::Source(e.to_string()))?;

    let ledger = build_partner_ledger(
      &contact,
      query.currency.unwrap_or(self.default_currency),
      &invoices,
      &payments,
      LedgerPeriod {
        from: query.from,
        to: query.to,
      },
    );

    tracing::debug!(
      contact_id = %contact.id,
      entries = ledger.entries.len(),
      closing_balance = %ledger.closing_balance,
      "Partner ledger built"
    );
    Ok(ledger)
  }
}
