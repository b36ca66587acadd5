use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::common::{Currency, ValueObjectError};
use crate::domain::invoice::PaymentDetails;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  Cash,
  BankTransfer,
  Card,
  Gateway,
  Other,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Cash => "cash",
      PaymentMethod::BankTransfer => "bank_transfer",
      PaymentMethod::Card => "card",
      PaymentMethod::Gateway => "gateway",
      PaymentMethod::Other => "other",
    }
  }
}

impl FromStr for PaymentMethod {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "cash" => Ok(PaymentMethod::Cash),
      "bank_transfer" => Ok(PaymentMethod::BankTransfer),
      "card" => Ok(PaymentMethod::Card),
      "gateway" => Ok(PaymentMethod::Gateway),
      "other" => Ok(PaymentMethod::Other),
      _ => Err(ValueObjectError::InvalidPaymentMethod(s.to_string())),
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub organization_id: Uuid,
  pub contact_id: Uuid,
  pub amount: Decimal,
  pub currency: Currency,
  pub method: PaymentMethod,
  pub reference: Option<String>,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub paid_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Payment {
  /// Invoice-level summary of this payment
  pub fn details(&self) -> PaymentDetails {
    PaymentDetails {
      method: self.method.as_str().to_string(),
      reference: self.reference.clone(),
      gateway_order_id: self.gateway_order_id.clone(),
      gateway_payment_id: self.gateway_payment_id.clone(),
      recorded_at: self.created_at,
    }
  }
}

/// Order created at the payment gateway; amounts are in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
  pub id: String,
  pub amount: u64,
  pub currency: String,
  pub receipt: Option<String>,
  pub status: String,
}

/// What a client needs to open the gateway checkout for an invoice
#[derive(Debug, Clone, Serialize)]
pub struct GatewayCheckout {
  pub invoice_id: Uuid,
  pub key_id: String,
  pub order: GatewayOrder,
}
