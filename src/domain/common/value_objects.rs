use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Missing required field: {0}")]
  MissingField(&'static str),
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid name: {0}")]
  InvalidName(String),
  #[error("Invalid email address: {0}")]
  InvalidEmail(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid tax computation method: {0}")]
  InvalidTaxComputation(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
  #[error("Invalid contact kind: {0}")]
  InvalidContactKind(String),
  #[error("Invalid payment method: {0}")]
  InvalidPaymentMethod(String),
  #[error("Invalid date range: {0}")]
  InvalidDateRange(String),
}

/// Rounds a monetary amount to cents and pins the scale to 2 so that values
/// read back from `NUMERIC(14,2)` columns compare and serialize identically.
pub fn round_money(value: Decimal) -> Decimal {
  let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  rounded.rescale(2);
  rounded
}

/// Largest amount a `NUMERIC(14,2)` money column can hold
pub fn max_money() -> Decimal {
  Decimal::new(99_999_999_999_999, 2)
}

// Currency - ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
  USD,
  EUR,
  GBP,
  INR,
  DKK,
  SEK,
  NOK,
}

impl Currency {
  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::USD => "USD",
      Currency::EUR => "EUR",
      Currency::GBP => "GBP",
      Currency::INR => "INR",
      Currency::DKK => "DKK",
      Currency::SEK => "SEK",
      Currency::NOK => "NOK",
    }
  }

  pub fn symbol(&self) -> &'static str {
    match self {
      Currency::USD => "$",
      Currency::EUR => "€",
      Currency::GBP => "£",
      Currency::INR => "₹",
      Currency::DKK => "kr",
      Currency::SEK => "kr",
      Currency::NOK => "kr",
    }
  }

  /// Number of minor units per major unit (cents, paise, øre)
  pub fn minor_unit_factor(&self) -> Decimal {
    Decimal::from(100)
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "USD" => Ok(Currency::USD),
      "EUR" => Ok(Currency::EUR),
      "GBP" => Ok(Currency::GBP),
      "INR" => Ok(Currency::INR),
      "DKK" => Ok(Currency::DKK),
      "SEK" => Ok(Currency::SEK),
      "NOK" => Ok(Currency::NOK),
      _ => Err(ValueObjectError::InvalidCurrency(format!(
        "Unsupported currency: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Money - non-negative amount with currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
  pub amount: Decimal,
  pub currency: Currency,
}

impl Money {
  pub fn new(amount: Decimal, currency: Currency) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot be negative".to_string(),
      ));
    }
    Ok(Self { amount, currency })
  }

  /// Like `new`, but additionally rejects sub-cent precision.
  pub fn from_price(amount: Decimal, currency: Currency) -> Result<Self, ValueObjectError> {
    if amount.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot have more than 2 decimal places".to_string(),
      ));
    }
    Self::new(round_money(amount), currency)
  }

  pub fn zero(currency: Currency) -> Self {
    Self {
      amount: round_money(Decimal::ZERO),
      currency,
    }
  }

  pub fn is_zero(&self) -> bool {
    self.amount.is_zero()
  }

  pub fn add(&self, other: &Money) -> Result<Money, ValueObjectError> {
    self.ensure_same_currency(other)?;
    Ok(Money {
      amount: round_money(self.amount + other.amount),
      currency: self.currency,
    })
  }

  /// Subtraction that refuses to produce a negative amount.
  pub fn subtract(&self, other: &Money) -> Result<Money, ValueObjectError> {
    self.ensure_same_currency(other)?;
    let amount = self.amount - other.amount;
    if amount < Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(format!(
        "{} exceeds {}",
        other, self
      )));
    }
    Ok(Money {
      amount: round_money(amount),
      currency: self.currency,
    })
  }

  pub fn multiply(&self, factor: Decimal) -> Money {
    Money {
      amount: round_money(self.amount * factor),
      currency: self.currency,
    }
  }

  /// Amount in the smallest currency unit, as payment gateways expect it.
  pub fn to_minor_units(&self) -> Result<u64, ValueObjectError> {
    let minor = (self.amount * self.currency.minor_unit_factor()).round();
    u64::try_from(minor.mantissa() / 10i128.pow(minor.scale())).map_err(|_| {
      ValueObjectError::InvalidAmount(format!("{} cannot be expressed in minor units", self))
    })
  }

  pub fn from_minor_units(minor: u64, currency: Currency) -> Money {
    Money {
      amount: round_money(Decimal::from(minor) / currency.minor_unit_factor()),
      currency,
    }
  }

  fn ensure_same_currency(&self, other: &Money) -> Result<(), ValueObjectError> {
    if self.currency != other.currency {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Cannot combine amounts in {} and {}",
        self.currency, other.currency
      )));
    }
    Ok(())
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{:.2}", self.currency.symbol(), self.amount)
  }
}

// Short human-entered names (contacts, taxes, products, line items)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidName(
        "Name cannot be empty".to_string(),
      ));
    }
    if trimmed.chars().count() > 255 {
      return Err(ValueObjectError::InvalidName(
        "Name cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// Unit price - non-negative, at most 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Unit price cannot be negative".to_string(),
      ));
    }
    if value.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidAmount(
        "Unit price cannot have more than 2 decimal places".to_string(),
      ));
    }
    if value > max_money() {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Unit price cannot exceed {}",
        max_money()
      )));
    }
    Ok(Self(round_money(value)))
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
  fn test_currency() {
    assert_eq!(Currency::INR.as_str(), "INR");
    assert_eq!(Currency::EUR.symbol(), "€");
    assert_eq!(Currency::from_str("usd").unwrap(), Currency::USD);
    assert!(Currency::from_str("JPY").is_err());
  }

  #[test]
  fn test_round_money_pins_scale() {
    assert_eq!(round_money(dec!(200)).to_string(), "200.00");
    assert_eq!(round_money(dec!(1.005)).to_string(), "1.01");
    assert_eq!(round_money(dec!(36.0)).to_string(), "36.00");
  }

  #[test]
  fn test_money() {
    let money = Money::new(dec!(100.50), Currency::USD).unwrap();
    assert_eq!(money.amount, dec!(100.50));
    assert!(Money::new(dec!(-10), Currency::USD).is_err());
    assert!(Money::from_price(dec!(1.999), Currency::USD).is_err());
    assert!(Money::from_price(dec!(1.990), Currency::USD).is_ok());
  }

  #[test]
  fn test_money_add_and_subtract() {
    let m1 = Money::new(dec!(100), Currency::USD).unwrap();
    let m2 = Money::new(dec!(50), Currency::USD).unwrap();
    let m3 = Money::new(dec!(50), Currency::EUR).unwrap();

    assert_eq!(m1.add(&m2).unwrap().amount, dec!(150));
    assert!(m1.add(&m3).is_err());
    assert_eq!(m1.subtract(&m2).unwrap().amount, dec!(50));
    assert!(m2.subtract(&m1).is_err());
  }

  #[test]
  fn test_minor_units() {
    let money = Money::new(dec!(406.50), Currency::INR).unwrap();
    assert_eq!(money.to_minor_units().unwrap(), 40650);
    assert_eq!(
      Money::from_minor_units(40650, Currency::INR).amount,
      dec!(406.50)
    );
  }

  #[test]
  fn test_unit_price() {
    assert_eq!(UnitPrice::new(dec!(12.5)).unwrap().value().to_string(), "12.50");
    assert!(UnitPrice::new(dec!(-0.01)).is_err());
    assert!(UnitPrice::new(dec!(0.001)).is_err());
    assert!(UnitPrice::new(Decimal::ZERO).is_ok());
  }

  #[test]
  fn test_unit_price_is_capped_at_column_width() {
    assert_eq!(
      UnitPrice::new(dec!(999999999999.99)).unwrap().value(),
      max_money()
    );
    assert!(matches!(
      UnitPrice::new(dec!(1000000000000.00)),
      Err(ValueObjectError::InvalidAmount(_))
    ));
  }

  #[test]
  fn test_name() {
    assert_eq!(Name::new("  Acme  ".to_string()).unwrap().value(), "Acme");
    assert!(Name::new("   ".to_string()).is_err());
    assert!(Name::new("x".repeat(256)).is_err());
  }
}
