//! Line-item arithmetic.
//!
//! Every amount is rounded to cents per line, before anything is summed, so
//! invoice aggregates always equal the sum of the stored line values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::InvoiceError;
use super::value_objects::{FixedTaxMode, Quantity, TaxSnapshot};
use crate::domain::catalog::TaxComputation;
use crate::domain::common::{UnitPrice, ValueObjectError, max_money, round_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
}

impl LineAmounts {
  pub fn zero() -> Self {
    Self {
      subtotal: round_money(Decimal::ZERO),
      tax_amount: round_money(Decimal::ZERO),
      total: round_money(Decimal::ZERO),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxCalculator {
  fixed_tax_mode: FixedTaxMode,
}

impl TaxCalculator {
  pub fn new(fixed_tax_mode: FixedTaxMode) -> Self {
    Self { fixed_tax_mode }
  }

  pub fn fixed_tax_mode(&self) -> FixedTaxMode {
    self.fixed_tax_mode
  }

  /// Prices one line. Fails when any amount would not fit a money column.
  pub fn compute(
    &self,
    quantity: Quantity,
    unit_price: UnitPrice,
    tax: Option<&TaxSnapshot>,
  ) -> Result<LineAmounts, InvoiceError> {
    if quantity.is_zero() {
      return Ok(LineAmounts::zero());
    }

    let quantity = quantity.as_decimal();
    let subtotal = checked_money(quantity.checked_mul(unit_price.value()), "Line subtotal")?;
    let tax_amount = match tax {
      None => round_money(Decimal::ZERO),
      Some(tax) => {
        let raw = match (tax.computation, self.fixed_tax_mode) {
          (TaxComputation::Percentage, _) => subtotal
            .checked_mul(tax.rate)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED)),
          (TaxComputation::Fixed, FixedTaxMode::PerLine) => Some(tax.rate),
          (TaxComputation::Fixed, FixedTaxMode::PerUnit) => tax.rate.checked_mul(quantity),
        };
        checked_money(raw, "Line tax")?
      }
    };
    let total = checked_money(subtotal.checked_add(tax_amount), "Line total")?;

    Ok(LineAmounts {
      subtotal,
      tax_amount,
      total,
    })
  }
}

fn checked_money(value: Option<Decimal>, what: &str) -> Result<Decimal, InvoiceError> {
  match value.map(round_money) {
    Some(amount) if amount <= max_money() => Ok(amount),
    _ => Err(InvoiceError::Validation(ValueObjectError::InvalidAmount(
      format!("{} exceeds {}", what, max_money()),
    ))),
  }
}
