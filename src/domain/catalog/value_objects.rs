use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::common::ValueObjectError;

/// How a tax rate turns into a tax amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxComputation {
  /// `rate` percent of the line subtotal
  Percentage,
  /// `rate` is a flat amount in the invoice currency
  Fixed,
}

impl TaxComputation {
  pub fn as_str(&self) -> &'static str {
    match self {
      TaxComputation::Percentage => "percentage",
      TaxComputation::Fixed => "fixed",
    }
  }
}

impl FromStr for TaxComputation {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "percentage" => Ok(TaxComputation::Percentage),
      "fixed" => Ok(TaxComputation::Fixed),
      _ => Err(ValueObjectError::InvalidTaxComputation(s.to_string())),
    }
  }
}

impl fmt::Display for TaxComputation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Tax rate, validated against its computation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal, computation: TaxComputation) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate cannot be negative".to_string(),
      ));
    }
    if computation == TaxComputation::Percentage && value > Decimal::ONE_HUNDRED {
      return Err(ValueObjectError::InvalidTaxRate(
        "Percentage tax rate cannot exceed 100".to_string(),
      ));
    }
    if value.normalize().scale() > 4 {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate cannot have more than 4 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_percentage_rate_bounds() {
    assert!(TaxRate::new(dec!(18), TaxComputation::Percentage).is_ok());
    assert!(TaxRate::new(dec!(100), TaxComputation::Percentage).is_ok());
    assert!(TaxRate::new(dec!(100.01), TaxComputation::Percentage).is_err());
    assert!(TaxRate::new(dec!(-1), TaxComputation::Percentage).is_err());
  }

  #[test]
  fn test_fixed_rate_has_no_upper_bound() {
    assert!(TaxRate::new(dec!(250), TaxComputation::Fixed).is_ok());
    assert!(TaxRate::new(dec!(-0.5), TaxComputation::Fixed).is_err());
  }

  #[test]
  fn test_rate_precision() {
    assert!(TaxRate::new(dec!(12.3456), TaxComputation::Percentage).is_ok());
    assert!(TaxRate::new(dec!(12.34567), TaxComputation::Percentage).is_err());
    assert!(TaxRate::new(dec!(5.50000), TaxComputation::Percentage).is_ok());
  }

  #[test]
  fn test_computation_parse() {
    assert_eq!(
      TaxComputation::from_str("Fixed").unwrap(),
      TaxComputation::Fixed
    );
    assert!(TaxComputation::from_str("compound").is_err());
  }
}
