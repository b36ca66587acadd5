use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::contact::{ContactAddressInput, ContactFields};
use crate::application::catalog::{ProductFields, TaxFields};
use crate::application::invoice::LineItemCommand;

/// Envelope shared by every JSON response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: message.into(),
      data: Some(data),
      error: None,
    }
  }
}

impl ApiResponse<()> {
  pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
    Self {
      success: false,
      message: message.into(),
      data: None,
      error: Some(error.into()),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationQuery {
  pub organization_id: Uuid,
}

/// Optimistic concurrency token accepted by state-changing invoice endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionRequest {
  pub expected_version: Option<i64>,
}

// Contacts

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
  pub phone: Option<String>,

  pub address: Option<ContactAddressInput>,

  /// customer | vendor | both
  pub kind: Option<String>,
}

impl From<ContactRequest> for ContactFields {
  fn from(request: ContactRequest) -> Self {
    Self {
      name: request.name,
      email: request.email,
      phone: request.phone,
      address: request.address,
      kind: request.kind,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactRequest {
  pub organization_id: Uuid,

  #[serde(flatten)]
  #[validate(nested)]
  pub contact: ContactRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListContactsQuery {
  pub organization_id: Uuid,
  pub kind: Option<String>,
}

// Catalog

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaxRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: String,

  pub rate: Decimal,

  /// percentage | fixed
  #[serde(default = "default_tax_computation")]
  pub computation: String,
}

fn default_tax_computation() -> String {
  "percentage".to_string()
}

impl From<TaxRequest> for TaxFields {
  fn from(request: TaxRequest) -> Self {
    Self {
      name: request.name,
      rate: request.rate,
      computation: request.computation,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaxRequest {
  pub organization_id: Uuid,

  #[serde(flatten)]
  #[validate(nested)]
  pub tax: TaxRequest,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: String,

  pub unit_price: Decimal,

  pub tax_id: Option<Uuid>,

  #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
  pub description: Option<String>,
}

impl From<ProductRequest> for ProductFields {
  fn from(request: ProductRequest) -> Self {
    Self {
      name: request.name,
      unit_price: request.unit_price,
      tax_id: request.tax_id,
      description: request.description,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
  pub organization_id: Uuid,

  #[serde(flatten)]
  #[validate(nested)]
  pub product: ProductRequest,
}

// Invoices

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemRequest {
  pub product_id: Option<Uuid>,

  #[validate(length(
    min = 1,
    max = 255,
    message = "Product name must be between 1 and 255 characters"
  ))]
  pub product_name: Option<String>,

  #[validate(range(min = 0, max = 4_294_967_295_i64, message = "Quantity must be between 0 and 4294967295"))]
  pub quantity: i64,

  pub unit_price: Option<Decimal>,

  pub tax_id: Option<Uuid>,
}

impl From<LineItemRequest> for LineItemCommand {
  fn from(request: LineItemRequest) -> Self {
    Self {
      product_id: request.product_id,
      product_name: request.product_name,
      quantity: request.quantity,
      unit_price: request.unit_price,
      tax_id: request.tax_id,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  pub organization_id: Uuid,

  pub customer_id: Uuid,

  #[validate(length(max = 100, message = "Invoice number must be at most 100 characters"))]
  pub invoice_number: Option<String>,

  pub invoice_date: NaiveDate,

  pub due_date: NaiveDate,

  pub currency: Option<String>,

  pub notes: Option<String>,

  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
  pub customer_id: Option<Uuid>,

  #[validate(length(
    min = 1,
    max = 100,
    message = "Invoice number must be between 1 and 100 characters"
  ))]
  pub invoice_number: Option<String>,

  pub invoice_date: Option<NaiveDate>,

  pub due_date: Option<NaiveDate>,

  pub notes: Option<String>,

  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub line_items: Option<Vec<LineItemRequest>>,

  pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListInvoicesQuery {
  pub organization_id: Uuid,
  pub status: Option<String>,
  pub customer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeStatusRequest {
  #[validate(length(min = 1, message = "Status is required"))]
  pub status: String,

  pub expected_version: Option<i64>,
}

// Payments

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPaymentRequest {
  pub amount: Decimal,

  /// cash | bank_transfer | card | other; defaults to cash
  pub method: Option<String>,

  #[validate(length(max = 255, message = "Reference must be at most 255 characters"))]
  pub reference: Option<String>,

  pub paid_at: Option<DateTime<Utc>>,

  pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
  #[validate(length(min = 1, message = "Order id is required"))]
  pub order_id: String,

  #[validate(length(min = 1, message = "Payment id is required"))]
  pub payment_id: String,

  #[validate(length(min = 1, message = "Signature is required"))]
  pub signature: String,
}

// Reports

#[derive(Debug, Clone, Deserialize)]
pub struct PartnerLedgerQuery {
  pub organization_id: Uuid,
  pub contact_id: Uuid,
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  pub currency: Option<String>,
  /// `csv` for a CSV download, JSON otherwise
  pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  pub version: &'static str,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_contact_request_validation() {
    let valid = ContactRequest {
      name: "Acme".to_string(),
      email: Some("billing@acme.test".to_string()),
      phone: None,
      address: None,
      kind: None,
    };
    assert!(valid.validate().is_ok());

    let invalid = ContactRequest {
      name: String::new(),
      email: Some("not-an-email".to_string()),
      ..valid
    };
    let errors = invalid.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("name"));
    assert!(errors.field_errors().contains_key("email"));
  }

  #[test]
  fn test_create_invoice_request_requires_line_items() {
    let request: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
      "organization_id": Uuid::new_v4(),
      "customer_id": Uuid::new_v4(),
      "invoice_date": "2024-03-01",
      "due_date": "2024-03-31",
      "line_items": []
    }))
    .unwrap();

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_invalid_line_item_fails_the_whole_request() {
    let line_items = serde_json::json!([
      { "product_name": "Widget", "quantity": 1, "unit_price": "10" },
      { "product_name": "", "quantity": -1 }
    ]);
    let create: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
      "organization_id": Uuid::new_v4(),
      "customer_id": Uuid::new_v4(),
      "invoice_date": "2024-03-01",
      "due_date": "2024-03-31",
      "line_items": line_items.clone()
    }))
    .unwrap();
    let errors = create.validate().unwrap_err();
    assert!(errors.errors().contains_key("line_items"));

    let update: UpdateInvoiceRequest = serde_json::from_value(serde_json::json!({
      "line_items": line_items
    }))
    .unwrap();
    let errors = update.validate().unwrap_err();
    assert!(errors.errors().contains_key("line_items"));
  }

  #[test]
  fn test_negative_quantity_is_rejected() {
    let item = LineItemRequest {
      product_id: None,
      product_name: Some("Widget".to_string()),
      quantity: -1,
      unit_price: None,
      tax_id: None,
    };
    assert!(item.validate().is_err());
  }

  #[test]
  fn test_failure_envelope_omits_data() {
    let body = serde_json::to_value(ApiResponse::failure("Not found", "not_found")).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not_found");
    assert!(body.get("data").is_none());
  }
}
