use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::ValidateEmail;

use crate::domain::common::ValueObjectError;

// ============================================================================
// Email Address
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
  /// Validates and lowercases the address
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into().trim().to_string();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for EmailAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ============================================================================
// Contact Kind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
  Customer,
  Vendor,
  Both,
}

impl ContactKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ContactKind::Customer => "customer",
      ContactKind::Vendor => "vendor",
      ContactKind::Both => "both",
    }
  }

  /// Whether a contact of this kind shows up under the requested filter
  pub fn matches(&self, filter: ContactKind) -> bool {
    *self == filter || *self == ContactKind::Both
  }
}

impl FromStr for ContactKind {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "customer" => Ok(ContactKind::Customer),
      "vendor" => Ok(ContactKind::Vendor),
      "both" => Ok(ContactKind::Both),
      _ => Err(ValueObjectError::InvalidContactKind(s.to_string())),
    }
  }
}

// ============================================================================
// Postal Address
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAddress {
  pub street: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub postal_code: Option<String>,
  pub country: Option<String>,
}

impl ContactAddress {
  /// Returns `None` when every part is blank
  pub fn new(
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
  ) -> Option<Self> {
    let address = Self {
      street: non_blank(street),
      city: non_blank(city),
      state: non_blank(state),
      postal_code: non_blank(postal_code),
      country: non_blank(country),
    };

    if address == Self::default() {
      None
    } else {
      Some(address)
    }
  }

  /// Street, then "city, state, postal code", then country, one per line
  pub fn format_multiline(&self) -> String {
    let locality: Vec<&str> = [&self.city, &self.state, &self.postal_code]
      .into_iter()
      .flatten()
      .map(String::as_str)
      .collect();

    let mut lines: Vec<String> = Vec::new();
    if let Some(street) = &self.street {
      lines.push(street.clone());
    }
    if !locality.is_empty() {
      lines.push(locality.join(", "));
    }
    if let Some(country) = &self.country {
      lines.push(country.clone());
    }
    lines.join("\n")
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}
