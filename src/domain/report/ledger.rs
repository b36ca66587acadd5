//! Partner ledger: a contact's posted invoices (debits) and payments
//! (credits) merged by date with a running balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use uuid::Uuid;

use super::entities::{LedgerDocumentKind, LedgerEntry, LedgerPeriod, PartnerLedger};
use crate::domain::common::{Currency, round_money};
use crate::domain::contact::Contact;
use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;

struct Movement {
  date: NaiveDate,
  kind: LedgerDocumentKind,
  document_id: Uuid,
  document_number: String,
  description: String,
  debit: Decimal,
  credit: Decimal,
  sequence: chrono::DateTime<chrono::Utc>,
}

impl Movement {
  // Same date: invoices before payments, then by document number and creation time
  fn ordering(&self, other: &Self) -> Ordering {
    self
      .date
      .cmp(&other.date)
      .then(self.kind.cmp(&other.kind))
      .then_with(|| self.document_number.cmp(&other.document_number))
      .then(self.sequence.cmp(&other.sequence))
  }
}

pub fn build_partner_ledger(
  contact: &Contact,
  currency: Currency,
  invoices: &[Invoice],
  payments: &[Payment],
  period: LedgerPeriod,
) -> PartnerLedger {
  let mut movements: Vec<Movement> = Vec::with_capacity(invoices.len() + payments.len());

  movements.extend(
    invoices
      .iter()
      .filter(|inv| inv.customer_id == contact.id && inv.currency == currency)
      .filter(|inv| inv.status.is_posted())
      .map(|inv| Movement {
        date: inv.invoice_date,
        kind: LedgerDocumentKind::Invoice,
        document_id: inv.id,
        document_number: inv.invoice_number.value().to_string(),
        description: format!("Invoice {}", inv.invoice_number),
        debit: inv.grand_total,
        credit: Decimal::ZERO,
        sequence: inv.created_at,
      }),
  );

  // A payment is identified in the ledger by the invoice it settled
  movements.extend(
    payments
      .iter()
      .filter(|p| p.contact_id == contact.id && p.currency == currency)
      .map(|p| {
        let number = invoices
          .iter()
          .find(|inv| inv.id == p.invoice_id)
          .map(|inv| inv.invoice_number.value().to_string())
          .unwrap_or_else(|| p.invoice_id.to_string());
        Movement {
          date: p.paid_at.date_naive(),
          kind: LedgerDocumentKind::Payment,
          document_id: p.id,
          description: format!("Payment ({}) for {}", p.method, number),
          document_number: number,
          debit: Decimal::ZERO,
          credit: p.amount,
          sequence: p.created_at,
        }
      }),
  );

  movements.sort_by(Movement::ordering);

  let mut opening_balance = Decimal::ZERO;
  let mut running = Decimal::ZERO;
  let mut total_debit = Decimal::ZERO;
  let mut total_credit = Decimal::ZERO;
  let mut entries = Vec::new();

  for movement in movements {
    if period.is_before(movement.date) {
      opening_balance += movement.debit - movement.credit;
      running = opening_balance;
      continue;
    }
    if !period.contains(movement.date) {
      continue;
    }

    running += movement.debit - movement.credit;
    total_debit += movement.debit;
    total_credit += movement.credit;
    entries.push(LedgerEntry {
      date: movement.date,
      kind: movement.kind,
      document_id: movement.document_id,
      document_number: movement.document_number,
      description: movement.description,
      debit: round_money(movement.debit),
      credit: round_money(movement.credit),
      balance: round_money(running),
    });
  }

  PartnerLedger {
    contact_id: contact.id,
    contact_name: contact.name.value().to_string(),
    currency,
    from: period.from,
    to: period.to,
    opening_balance: round_money(opening_balance),
    entries,
    total_debit: round_money(total_debit),
    total_credit: round_money(total_credit),
    closing_balance: round_money(running),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::common::Money;
  use crate::domain::invoice::InvoiceStatus;
  use crate::domain::payment::PaymentMethod;
  use crate::domain::testing::{sample_customer, sample_invoice};
  use chrono::{TimeZone, Utc};
  use rust_decimal_macros::dec;

  fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
  }

  // 406.00 INR invoice, sent
  fn invoice(contact: &Contact, number: &str, on: NaiveDate) -> Invoice {
    let mut invoice = sample_invoice(contact.organization_id, contact.id);
    invoice.invoice_number = crate::domain::invoice::InvoiceNumber::new(number.to_string()).unwrap();
    invoice.invoice_date = on;
    invoice.due_date = on;
    invoice.change_status(InvoiceStatus::Sent).unwrap();
    invoice
  }

  fn payment(invoice: &mut Invoice, amount: Decimal, on: NaiveDate) -> Payment {
    invoice
      .apply_payment(&Money::new(amount, invoice.currency).unwrap())
      .unwrap();
    let paid_at = Utc.from_utc_datetime(&on.and_hms_opt(10, 0, 0).unwrap());
    Payment {
      id: Uuid::new_v4(),
      invoice_id: invoice.id,
      organization_id: invoice.organization_id,
      contact_id: invoice.customer_id,
      amount,
      currency: invoice.currency,
      method: PaymentMethod::Cash,
      reference: None,
      gateway_order_id: None,
      gateway_payment_id: None,
      paid_at,
      created_at: paid_at,
    }
  }

  #[test]
  fn test_running_balance_and_ordering() {
    let contact = sample_customer(Uuid::new_v4());
    let mut first = invoice(&contact, "INV-1", date(1, 10));
    let second = invoice(&contact, "INV-2", date(1, 20));
    let pay = payment(&mut first, dec!(100), date(1, 20));

    let ledger = build_partner_ledger(
      &contact,
      Currency::INR,
      &[second.clone(), first.clone()],
      &[pay],
      LedgerPeriod::default(),
    );

    let kinds: Vec<_> = ledger.entries.iter().map(|e| (e.document_number.as_str(), e.kind)).collect();
    assert_eq!(
      kinds,
      vec![
        ("INV-1", LedgerDocumentKind::Invoice),
        ("INV-2", LedgerDocumentKind::Invoice),
        ("INV-1", LedgerDocumentKind::Payment),
      ]
    );
    let balances: Vec<_> = ledger.entries.iter().map(|e| e.balance).collect();
    assert_eq!(balances, vec![dec!(406), dec!(812), dec!(712)]);
    assert_eq!(ledger.total_debit, dec!(812));
    assert_eq!(ledger.total_credit, dec!(100));
    assert_eq!(ledger.opening_balance, dec!(0));
    assert_eq!(ledger.closing_balance, dec!(712));
  }

  #[test]
  fn test_opening_balance_nets_earlier_activity() {
    let contact = sample_customer(Uuid::new_v4());
    let mut old = invoice(&contact, "INV-1", date(1, 5));
    let old_payment = payment(&mut old, dec!(6), date(1, 25));
    let current = invoice(&contact, "INV-2", date(2, 3));

    let ledger = build_partner_ledger(
      &contact,
      Currency::INR,
      &[old, current],
      &[old_payment],
      LedgerPeriod {
        from: Some(date(2, 1)),
        to: Some(date(2, 28)),
      },
    );

    assert_eq!(ledger.opening_balance, dec!(400));
    assert_eq!(ledger.entries.len(), 1);
    assert_eq!(ledger.entries[0].balance, dec!(806));
    assert_eq!(ledger.closing_balance, dec!(806));
  }

  #[test]
  fn test_drafts_void_and_later_activity_are_excluded() {
    let contact = sample_customer(Uuid::new_v4());
    let draft = sample_invoice(contact.organization_id, contact.id);
    let mut void = invoice(&contact, "INV-V", date(3, 1));
    void.change_status(InvoiceStatus::Void).unwrap();
    let later = invoice(&contact, "INV-L", date(4, 1));

    let ledger = build_partner_ledger(
      &contact,
      Currency::INR,
      &[draft, void, later],
      &[],
      LedgerPeriod {
        from: None,
        to: Some(date(3, 31)),
      },
    );

    assert!(ledger.entries.is_empty());
    assert_eq!(ledger.closing_balance, dec!(0));
  }

  #[test]
  fn test_other_currency_is_ignored() {
    let contact = sample_customer(Uuid::new_v4());
    let mut usd = invoice(&contact, "INV-USD", date(1, 1));
    usd.currency = Currency::USD;

    let ledger = build_partner_ledger(
      &contact,
      Currency::INR,
      &[usd],
      &[],
      LedgerPeriod::default(),
    );
    assert!(ledger.entries.is_empty());
  }

  #[test]
  fn test_period_bounds_are_inclusive() {
    let period = LedgerPeriod {
      from: Some(date(1, 1)),
      to: Some(date(1, 31)),
    };
    assert!(period.contains(date(1, 1)));
    assert!(period.contains(date(1, 31)));
    assert!(!period.contains(date(2, 1)));
    assert!(period.is_before(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
  }
}
