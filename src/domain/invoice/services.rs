use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::calculation::TaxCalculator;
use super::entities::{Invoice, InvoiceHeaderUpdate, LineItemDraft, NewInvoice};
use super::errors::InvoiceError;
use super::ports::{InvoiceFilter, InvoiceRepository};
use super::value_objects::{InvoiceNumber, InvoiceStatus, Quantity, TaxSnapshot};
use crate::domain::catalog::{ProductRepository, TaxRepository};
use crate::domain::common::{Currency, Name, UnitPrice};
use crate::domain::contact::{Contact, ContactRepository};

/// Raw line-item input; missing fields are filled from the referenced product
#[derive(Debug, Clone, Default)]
pub struct LineItemInput {
  pub product_id: Option<Uuid>,
  pub product_name: Option<String>,
  pub quantity: i64,
  pub unit_price: Option<Decimal>,
  pub tax_id: Option<Uuid>,
}

/// Invoice creation data
pub struct InvoiceData {
  pub customer_id: Uuid,
  pub invoice_number: Option<String>,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub currency: Option<Currency>,
  pub notes: Option<String>,
  pub line_items: Vec<LineItemInput>,
}

/// Invoice update data; `line_items`, when present, replaces every line
#[derive(Default)]
pub struct InvoiceUpdateData {
  pub customer_id: Option<Uuid>,
  pub invoice_number: Option<String>,
  pub invoice_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub notes: Option<String>,
  pub line_items: Option<Vec<LineItemInput>>,
  pub expected_version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InvoicingPolicy {
  pub number_prefix: String,
  pub number_width: usize,
  pub default_currency: Currency,
  pub calculator: TaxCalculator,
}

impl Default for InvoicingPolicy {
  fn default() -> Self {
    Self {
      number_prefix: "INV-".to_string(),
      number_width: 6,
      default_currency: Currency::USD,
      calculator: TaxCalculator::default(),
    }
  }
}

pub struct InvoiceServiceDependencies {
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub contact_repo: Arc<dyn ContactRepository>,
  pub tax_repo: Arc<dyn TaxRepository>,
  pub product_repo: Arc<dyn ProductRepository>,
  pub policy: InvoicingPolicy,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  contact_repo: Arc<dyn ContactRepository>,
  tax_repo: Arc<dyn TaxRepository>,
  product_repo: Arc<dyn ProductRepository>,
  policy: InvoicingPolicy,
}

const MAX_NUMBER_ATTEMPTS: usize = 5;

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies) -> Self {
    Self {
      invoice_repo: deps.invoice_repo,
      contact_repo: deps.contact_repo,
      tax_repo: deps.tax_repo,
      product_repo: deps.product_repo,
      policy: deps.policy,
    }
  }

  pub fn policy(&self) -> &InvoicingPolicy {
    &self.policy
  }

  pub async fn create_invoice(
    &self,
    organization_id: Uuid,
    data: InvoiceData,
  ) -> Result<Invoice, InvoiceError> {
    self.get_customer(organization_id, data.customer_id).await?;

    if data.line_items.is_empty() {
      return Err(InvoiceError::NoLineItems);
    }
    let line_items = self
      .resolve_line_items(organization_id, data.line_items)
      .await?;

    let invoice_number = match data.invoice_number {
      Some(number) => self.claim_number(InvoiceNumber::new(number)?, None).await?,
      None => self.generate_number().await?,
    };

    let invoice = Invoice::new(
      NewInvoice {
        organization_id,
        customer_id: data.customer_id,
        invoice_number,
        invoice_date: data.invoice_date,
        due_date: data.due_date,
        currency: data.currency.unwrap_or(self.policy.default_currency),
        notes: data.notes,
        line_items,
      },
      &self.policy.calculator,
    )?;

    let created = self.invoice_repo.create(invoice).await?;
    tracing::info!(
      invoice_id = %created.id,
      invoice_number = %created.invoice_number,
      grand_total = %created.grand_total,
      "Invoice created"
    );
    Ok(created)
  }

  pub async fn update_invoice(
    &self,
    invoice_id: Uuid,
    data: InvoiceUpdateData,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self.get_invoice(invoice_id).await?;
    let version = Self::check_version(&invoice, data.expected_version)?;

    if let Some(customer_id) = data.customer_id {
      self.get_customer(invoice.organization_id, customer_id).await?;
    }

    let invoice_number = match data.invoice_number {
      Some(number) => {
        let number = InvoiceNumber::new(number)?;
        if number != invoice.invoice_number {
          Some(self.claim_number(number, Some(invoice_id)).await?)
        } else {
          None
        }
      }
      None => None,
    };

    invoice.update_header(InvoiceHeaderUpdate {
      customer_id: data.customer_id,
      invoice_number,
      invoice_date: data.invoice_date,
      due_date: data.due_date,
      notes: data.notes,
    })?;

    if let Some(inputs) = data.line_items {
      if inputs.is_empty() {
        return Err(InvoiceError::NoLineItems);
      }
      let drafts = self
        .resolve_line_items(invoice.organization_id, inputs)
        .await?;
      invoice.replace_line_items(drafts, &self.policy.calculator)?;
    }

    self.invoice_repo.update(invoice, version).await
  }

  pub async fn change_invoice_status(
    &self,
    invoice_id: Uuid,
    new_status: InvoiceStatus,
    expected_version: Option<i64>,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self.get_invoice(invoice_id).await?;
    let version = Self::check_version(&invoice, expected_version)?;
    let previous = invoice.status;

    invoice.change_status(new_status)?;
    let updated = self.invoice_repo.update(invoice, version).await?;

    tracing::info!(
      invoice_id = %invoice_id,
      from = %previous,
      to = %new_status,
      "Invoice status changed"
    );
    Ok(updated)
  }

  pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))
  }

  pub async fn get_invoice_with_customer(
    &self,
    invoice_id: Uuid,
  ) -> Result<(Invoice, Contact), InvoiceError> {
    let invoice = self.get_invoice(invoice_id).await?;
    let customer = self
      .get_customer(invoice.organization_id, invoice.customer_id)
      .await?;
    Ok((invoice, customer))
  }

  pub async fn list_invoices(
    &self,
    organization_id: Uuid,
    filter: InvoiceFilter,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    self
      .invoice_repo
      .find_by_organization(organization_id, filter)
      .await
  }

  pub async fn delete_invoice(&self, invoice_id: Uuid) -> Result<Invoice, InvoiceError> {
    let deleted = self
      .invoice_repo
      .delete(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

    tracing::info!(invoice_id = %invoice_id, "Invoice deleted");
    Ok(deleted)
  }

  fn check_version(invoice: &Invoice, expected_version: Option<i64>) -> Result<i64, InvoiceError> {
    match expected_version {
      Some(expected) if expected != invoice.version => Err(InvoiceError::StaleWrite {
        id: invoice.id,
        expected_version: expected,
      }),
      _ => Ok(invoice.version),
    }
  }

  async fn get_customer(
    &self,
    organization_id: Uuid,
    customer_id: Uuid,
  ) -> Result<Contact, InvoiceError> {
    let customer = self
      .contact_repo
      .find_by_id(customer_id)
      .await
      .map_err(|e| InvoiceError::Repository(format!("Failed to fetch customer: {}", e)))?
      .ok_or(InvoiceError::CustomerNotFound(customer_id))?;

    // Contacts of other organizations are invisible here
    if customer.organization_id != organization_id {
      return Err(InvoiceError::CustomerNotFound(customer_id));
    }
    Ok(customer)
  }

  async fn claim_number(
    &self,
    number: InvoiceNumber,
    exclude_id: Option<Uuid>,
  ) -> Result<InvoiceNumber, InvoiceError> {
    if self
      .invoice_repo
      .exists_by_number(number.value(), exclude_id)
      .await?
    {
      return Err(InvoiceError::InvoiceNumberAlreadyExists(number.into_inner()));
    }
    Ok(number)
  }

  // Skips sequence values already taken by manually numbered invoices
  async fn generate_number(&self) -> Result<InvoiceNumber, InvoiceError> {
    for _ in 0..MAX_NUMBER_ATTEMPTS {
      let sequence = self.invoice_repo.next_sequence_value().await?;
      let number = InvoiceNumber::from_sequence(
        &self.policy.number_prefix,
        sequence,
        self.policy.number_width,
      )?;
      if !self.invoice_repo.exists_by_number(number.value(), None).await? {
        return Ok(number);
      }
      tracing::debug!(invoice_number = %number, "Generated invoice number already taken");
    }
    Err(InvoiceError::Repository(
      "Could not allocate a free invoice number".to_string(),
    ))
  }

  async fn resolve_line_items(
    &self,
    organization_id: Uuid,
    inputs: Vec<LineItemInput>,
  ) -> Result<Vec<LineItemDraft>, InvoiceError> {
    let mut drafts = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
      drafts.push(
        self
          .resolve_line_item(organization_id, index + 1, input)
          .await?,
      );
    }
    Ok(drafts)
  }

  async fn resolve_line_item(
    &self,
    organization_id: Uuid,
    position: usize,
    input: LineItemInput,
  ) -> Result<LineItemDraft, InvoiceError> {
    let quantity = Quantity::new(input.quantity)?;

    let product = match input.product_id {
      Some(product_id) => {
        let product = self
          .product_repo
          .find_by_id(product_id)
          .await
          .map_err(|e| InvoiceError::Repository(format!("Failed to fetch product: {}", e)))?
          .filter(|p| p.organization_id == organization_id)
          .ok_or(InvoiceError::ProductNotFound(product_id))?;
        Some(product)
      }
      None => None,
    };

    let product_name = match (input.product_name, &product) {
      (Some(name), _) => Name::new(name)?,
      (None, Some(product)) => product.name.clone(),
      (None, None) => {
        return Err(InvoiceError::IncompleteLineItem {
          position,
          field: "product_name",
        });
      }
    };

    let unit_price = match (input.unit_price, &product) {
      (Some(price), _) => UnitPrice::new(price)?,
      (None, Some(product)) => product.unit_price,
      (None, None) => {
        return Err(InvoiceError::IncompleteLineItem {
          position,
          field: "unit_price",
        });
      }
    };

    let tax_id = input
      .tax_id
      .or_else(|| product.as_ref().and_then(|p| p.tax_id));
    let tax = match tax_id {
      Some(tax_id) => {
        let tax = self
          .tax_repo
          .find_by_id(tax_id)
          .await
          .map_err(|e| InvoiceError::Repository(format!("Failed to fetch tax: {}", e)))?
          .filter(|t| t.organization_id == organization_id)
          .ok_or(InvoiceError::TaxNotFound(tax_id))?;
        Some(TaxSnapshot::from(&tax))
      }
      None => None,
    };

    Ok(LineItemDraft {
      product_id: input.product_id,
      product_name,
      quantity,
      unit_price,
      tax,
    })
  }
}
