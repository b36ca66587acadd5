use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculation::{LineAmounts, TaxCalculator};
use super::errors::InvoiceError;
use super::value_objects::{InvoiceNumber, InvoiceStatus, Quantity, StorageBackend, TaxSnapshot};
use crate::domain::common::{
  Currency, Money, Name, UnitPrice, ValueObjectError, max_money, round_money,
};

/// A line item whose product, price and tax have been resolved, ready to be priced
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
  pub product_id: Option<Uuid>,
  pub product_name: Name,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  pub tax: Option<TaxSnapshot>,
}

// Invoice Line Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub position: i32,
  pub product_id: Option<Uuid>,
  pub product_name: Name,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  pub tax: Option<TaxSnapshot>,
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
}

impl InvoiceLineItem {
  pub fn new(
    invoice_id: Uuid,
    position: i32,
    draft: LineItemDraft,
    calculator: &TaxCalculator,
  ) -> Result<Self, InvoiceError> {
    let amounts = calculator.compute(draft.quantity, draft.unit_price, draft.tax.as_ref())?;
    Ok(Self {
      id: Uuid::new_v4(),
      invoice_id,
      position,
      product_id: draft.product_id,
      product_name: draft.product_name,
      quantity: draft.quantity,
      unit_price: draft.unit_price,
      tax: draft.tax,
      subtotal: amounts.subtotal,
      tax_amount: amounts.tax_amount,
      total: amounts.total,
    })
  }

  pub fn amounts(&self) -> LineAmounts {
    LineAmounts {
      subtotal: self.subtotal,
      tax_amount: self.tax_amount,
      total: self.total,
    }
  }

  /// Whether the stored amounts still match a recomputation from the line's own fields
  pub fn is_consistent(&self, calculator: &TaxCalculator) -> bool {
    calculator
      .compute(self.quantity, self.unit_price, self.tax.as_ref())
      .is_ok_and(|amounts| amounts == self.amounts())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub sub_total: Decimal,
  pub total_tax: Decimal,
  pub grand_total: Decimal,
}

impl InvoiceTotals {
  pub fn calculate(line_items: &[InvoiceLineItem]) -> Self {
    let sub_total: Decimal = line_items.iter().map(|item| item.subtotal).sum();
    let total_tax: Decimal = line_items.iter().map(|item| item.tax_amount).sum();

    Self {
      sub_total: round_money(sub_total),
      total_tax: round_money(total_tax),
      grand_total: round_money(sub_total + total_tax),
    }
  }
}

/// Location of the last generated PDF for an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfReference {
  pub storage_key: String,
  pub backend: StorageBackend,
  pub size_bytes: i64,
  pub generated_at: DateTime<Utc>,
}

/// How the invoice was last paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
  pub method: String,
  pub reference: Option<String>,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub recorded_at: DateTime<Utc>,
}

/// Header fields of an invoice; a `None` leaves the current value in place
#[derive(Debug, Clone, Default)]
pub struct InvoiceHeaderUpdate {
  pub customer_id: Option<Uuid>,
  pub invoice_number: Option<InvoiceNumber>,
  pub invoice_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub notes: Option<String>,
}

// Invoice aggregate: header, owned line items and money fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub customer_id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub currency: Currency,
  pub line_items: Vec<InvoiceLineItem>,
  pub sub_total: Decimal,
  pub total_tax: Decimal,
  pub grand_total: Decimal,
  pub amount_paid: Decimal,
  pub balance_due: Decimal,
  pub notes: Option<String>,
  pub pdf: Option<PdfReference>,
  pub payment_details: Option<PaymentDetails>,
  pub version: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct NewInvoice {
  pub organization_id: Uuid,
  pub customer_id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub currency: Currency,
  pub notes: Option<String>,
  pub line_items: Vec<LineItemDraft>,
}

impl Invoice {
  pub fn new(data: NewInvoice, calculator: &TaxCalculator) -> Result<Self, InvoiceError> {
    validate_dates(data.invoice_date, data.due_date)?;
    if data.line_items.is_empty() {
      return Err(InvoiceError::NoLineItems);
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let zero = round_money(Decimal::ZERO);
    let mut invoice = Self {
      id,
      organization_id: data.organization_id,
      customer_id: data.customer_id,
      invoice_number: data.invoice_number,
      invoice_date: data.invoice_date,
      due_date: data.due_date,
      status: InvoiceStatus::Draft,
      currency: data.currency,
      line_items: Vec::new(),
      sub_total: zero,
      total_tax: zero,
      grand_total: zero,
      amount_paid: zero,
      balance_due: zero,
      notes: normalize_notes(data.notes),
      pdf: None,
      payment_details: None,
      version: 1,
      created_at: now,
      updated_at: now,
    };
    invoice.set_line_items(data.line_items, calculator)?;
    Ok(invoice)
  }

  /// Discards every existing line and prices the new list from scratch
  pub fn replace_line_items(
    &mut self,
    drafts: Vec<LineItemDraft>,
    calculator: &TaxCalculator,
  ) -> Result<(), InvoiceError> {
    self.ensure_editable()?;
    if drafts.is_empty() {
      return Err(InvoiceError::NoLineItems);
    }

    let previous = std::mem::take(&mut self.line_items);
    if let Err(e) = self.set_line_items(drafts, calculator) {
      self.set_line_items_from(previous);
      return Err(e);
    }

    if self.grand_total < self.amount_paid {
      let grand_total = self.grand_total;
      self.set_line_items_from(previous);
      return Err(InvoiceError::BalanceWouldBeNegative {
        grand_total,
        amount_paid: self.amount_paid,
      });
    }

    self.updated_at = Utc::now();
    Ok(())
  }

  pub fn update_header(&mut self, update: InvoiceHeaderUpdate) -> Result<(), InvoiceError> {
    self.ensure_editable()?;

    let invoice_date = update.invoice_date.unwrap_or(self.invoice_date);
    let due_date = update.due_date.unwrap_or(self.due_date);
    validate_dates(invoice_date, due_date)?;

    if let Some(customer_id) = update.customer_id {
      if customer_id != self.customer_id && !self.amount_paid.is_zero() {
        return Err(InvoiceError::CannotEditInvoice(
          "Customer cannot change once payments are recorded".to_string(),
        ));
      }
      self.customer_id = customer_id;
    }
    if let Some(invoice_number) = update.invoice_number {
      self.invoice_number = invoice_number;
    }
    if update.notes.is_some() {
      self.notes = normalize_notes(update.notes);
    }
    self.invoice_date = invoice_date;
    self.due_date = due_date;
    self.updated_at = Utc::now();
    Ok(())
  }

  pub fn change_status(&mut self, new_status: InvoiceStatus) -> Result<(), InvoiceError> {
    if !self.status.can_transition_to(new_status) {
      return Err(InvoiceError::InvalidStatusTransition(format!(
        "Cannot transition from {} to {}",
        self.status, new_status
      )));
    }

    match new_status {
      InvoiceStatus::Paid if !self.balance_due.is_zero() => {
        return Err(InvoiceError::InvalidStatusTransition(format!(
          "Invoice still has a balance due of {}",
          self.money(self.balance_due)
        )));
      }
      InvoiceStatus::PartiallyPaid
        if self.amount_paid.is_zero() || self.amount_paid >= self.grand_total =>
      {
        return Err(InvoiceError::InvalidStatusTransition(
          "Partially paid requires a payment smaller than the grand total".to_string(),
        ));
      }
      _ => {}
    }

    self.status = new_status;
    self.updated_at = Utc::now();
    Ok(())
  }

  /// Adds a payment and derives the resulting status
  pub fn apply_payment(&mut self, amount: &Money) -> Result<InvoiceStatus, InvoiceError> {
    if !self.status.accepts_payments() {
      return Err(InvoiceError::PaymentNotAccepted(format!(
        "Invoice is {}",
        self.status
      )));
    }
    if amount.currency != self.currency {
      return Err(InvoiceError::CurrencyMismatch {
        expected: self.currency.as_str().to_string(),
        actual: amount.currency.as_str().to_string(),
      });
    }
    if amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount("Payment amount must be positive".to_string()).into());
    }

    let balance = self
      .money(self.balance_due)
      .subtract(amount)
      .map_err(|_| InvoiceError::PaymentNotAccepted(format!(
        "Payment of {} exceeds the balance due of {}",
        amount,
        self.money(self.balance_due)
      )))?;

    self.amount_paid = round_money(self.amount_paid + amount.amount);
    self.balance_due = balance.amount;
    self.status = if self.balance_due.is_zero() {
      InvoiceStatus::Paid
    } else {
      InvoiceStatus::PartiallyPaid
    };
    self.updated_at = Utc::now();
    Ok(self.status)
  }

  pub fn attach_pdf(&mut self, pdf: PdfReference) {
    self.pdf = Some(pdf);
    self.updated_at = Utc::now();
  }

  pub fn record_payment_details(&mut self, details: PaymentDetails) {
    self.payment_details = Some(details);
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals {
      sub_total: self.sub_total,
      total_tax: self.total_tax,
      grand_total: self.grand_total,
    }
  }

  pub fn is_editable(&self) -> bool {
    self.status.is_editable()
  }

  pub fn money(&self, amount: Decimal) -> Money {
    Money {
      amount,
      currency: self.currency,
    }
  }

  fn ensure_editable(&self) -> Result<(), InvoiceError> {
    if !self.is_editable() {
      return Err(InvoiceError::CannotEditInvoice(format!(
        "Invoice is {}",
        self.status
      )));
    }
    Ok(())
  }

  fn set_line_items(
    &mut self,
    drafts: Vec<LineItemDraft>,
    calculator: &TaxCalculator,
  ) -> Result<(), InvoiceError> {
    let items = drafts
      .into_iter()
      .enumerate()
      .map(|(i, draft)| InvoiceLineItem::new(self.id, (i + 1) as i32, draft, calculator))
      .collect::<Result<Vec<_>, _>>()?;
    let totals = InvoiceTotals::calculate(&items);
    if totals.grand_total > max_money() {
      return Err(InvoiceError::Validation(ValueObjectError::InvalidAmount(
        format!("Invoice total exceeds {}", max_money()),
      )));
    }
    self.set_line_items_from(items);
    Ok(())
  }

  fn set_line_items_from(&mut self, items: Vec<InvoiceLineItem>) {
    self.line_items = items;
    let totals = InvoiceTotals::calculate(&self.line_items);
    self.sub_total = totals.sub_total;
    self.total_tax = totals.total_tax;
    self.grand_total = totals.grand_total;
    self.balance_due = round_money(self.grand_total - self.amount_paid);
  }
}

fn validate_dates(invoice_date: NaiveDate, due_date: NaiveDate) -> Result<(), ValueObjectError> {
  if due_date < invoice_date {
    return Err(ValueObjectError::InvalidDateRange(format!(
      "Due date {} is before invoice date {}",
      due_date, invoice_date
    )));
  }
  Ok(())
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
  notes
    .map(|n| n.trim().to_string())
    .filter(|n| !n.is_empty())
}
