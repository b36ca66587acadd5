use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::catalog::{Tax, TaxComputation};
use crate::domain::common::ValueObjectError;

// Invoice Number - supplied by the caller or generated from a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot be empty".to_string(),
      ));
    }
    if trimmed.chars().count() > 100 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot exceed 100 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// `INV-` + 42 with width 6 gives `INV-000042`
  pub fn from_sequence(prefix: &str, sequence: i64, width: usize) -> Result<Self, ValueObjectError> {
    Self::new(format!("{}{:0width$}", prefix, sequence, width = width))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
  Draft,
  Sent,
  Paid,
  PartiallyPaid,
  Void,
}

impl InvoiceStatus {
  pub fn can_transition_to(&self, new_status: InvoiceStatus) -> bool {
    match (self, new_status) {
      // From Draft
      (InvoiceStatus::Draft, InvoiceStatus::Sent) => true,
      (InvoiceStatus::Draft, InvoiceStatus::Void) => true,
      // From Sent
      (InvoiceStatus::Sent, InvoiceStatus::Paid) => true,
      (InvoiceStatus::Sent, InvoiceStatus::PartiallyPaid) => true,
      (InvoiceStatus::Sent, InvoiceStatus::Void) => true,
      // From PartiallyPaid
      (InvoiceStatus::PartiallyPaid, InvoiceStatus::Paid) => true,
      (InvoiceStatus::PartiallyPaid, InvoiceStatus::Void) => true,
      // From Paid
      (InvoiceStatus::Paid, InvoiceStatus::Void) => true,
      // Void is terminal
      _ => false,
    }
  }

  pub fn is_editable(&self) -> bool {
    matches!(
      self,
      InvoiceStatus::Draft | InvoiceStatus::Sent | InvoiceStatus::PartiallyPaid
    )
  }

  pub fn accepts_payments(&self) -> bool {
    matches!(self, InvoiceStatus::Sent | InvoiceStatus::PartiallyPaid)
  }

  /// Statuses that represent money owed, as reported in ledgers
  pub fn is_posted(&self) -> bool {
    !matches!(self, InvoiceStatus::Draft | InvoiceStatus::Void)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "draft",
      InvoiceStatus::Sent => "sent",
      InvoiceStatus::Paid => "paid",
      InvoiceStatus::PartiallyPaid => "partially_paid",
      InvoiceStatus::Void => "void",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "draft" => Ok(InvoiceStatus::Draft),
      "sent" => Ok(InvoiceStatus::Sent),
      "paid" => Ok(InvoiceStatus::Paid),
      "partially_paid" => Ok(InvoiceStatus::PartiallyPaid),
      "void" => Ok(InvoiceStatus::Void),
      _ => Err(ValueObjectError::InvalidStatus(s.to_string())),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Quantity - whole units, zero allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
  pub fn new(value: i64) -> Result<Self, ValueObjectError> {
    u32::try_from(value).map(Self).map_err(|_| {
      ValueObjectError::InvalidQuantity(format!(
        "Quantity must be a whole number between 0 and {}",
        u32::MAX
      ))
    })
  }

  pub fn value(&self) -> u32 {
    self.0
  }

  pub fn as_decimal(&self) -> Decimal {
    Decimal::from(self.0)
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0
  }
}

/// Whether a fixed tax is charged once per line or once per unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedTaxMode {
  #[default]
  PerLine,
  PerUnit,
}

impl FromStr for FixedTaxMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "per_line" => Ok(FixedTaxMode::PerLine),
      "per_unit" => Ok(FixedTaxMode::PerUnit),
      _ => Err(format!("Unknown fixed tax mode: {}", s)),
    }
  }
}

/// Copy of the tax applied to a line, frozen at invoicing time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSnapshot {
  pub tax_id: Uuid,
  pub name: String,
  pub rate: Decimal,
  pub computation: TaxComputation,
}

impl From<&Tax> for TaxSnapshot {
  fn from(tax: &Tax) -> Self {
    Self {
      tax_id: tax.id,
      name: tax.name.value().to_string(),
      rate: tax.rate.value(),
      computation: tax.computation,
    }
  }
}

/// Where generated documents are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
  #[default]
  Database,
  Filesystem,
}

impl StorageBackend {
  pub fn as_str(&self) -> &'static str {
    match self {
      StorageBackend::Database => "database",
      StorageBackend::Filesystem => "filesystem",
    }
  }
}

impl FromStr for StorageBackend {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "database" => Ok(StorageBackend::Database),
      "filesystem" => Ok(StorageBackend::Filesystem),
      _ => Err(format!("Unknown storage backend: {}", s)),
    }
  }
}
