use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceFilter, InvoiceService, InvoiceStatus};

#[derive(Debug)]
pub struct ListInvoicesCommand {
  pub organization_id: Uuid,
  pub status_filter: Option<String>,
  pub customer_filter: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub invoice_number: String,
  pub customer_id: Uuid,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub currency: String,
  pub status: String,
  pub grand_total: Decimal,
  pub balance_due: Decimal,
  pub version: i64,
}

impl From<Invoice> for InvoiceListItemDto {
  fn from(invoice: Invoice) -> Self {
    Self {
      id: invoice.id,
      invoice_number: invoice.invoice_number.into_inner(),
      customer_id: invoice.customer_id,
      invoice_date: invoice.invoice_date,
      due_date: invoice.due_date,
      currency: invoice.currency.as_str().to_string(),
      status: invoice.status.as_str().to_string(),
      grand_total: invoice.grand_total,
      balance_due: invoice.balance_due,
      version: invoice.version,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
  pub total: usize,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let status = command
      .status_filter
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .map(InvoiceStatus::from_str)
      .transpose()?;

    let invoices = self
      .invoice_service
      .list_invoices(
        command.organization_id,
        InvoiceFilter {
          status,
          customer_id: command.customer_filter,
        },
      )
      .await?;

    let invoices: Vec<InvoiceListItemDto> =
      invoices.into_iter().map(InvoiceListItemDto::from).collect();
    let total = invoices.len();

    Ok(ListInvoicesResponse { invoices, total })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::testing::{InMemoryStore, invoice_service, sample_customer, sample_invoice};

  #[tokio::test]
  async fn test_filters_by_status_and_customer() {
    let store = Arc::new(InMemoryStore::default());
    let org_id = Uuid::new_v4();
    let customer = sample_customer(org_id);
    let other = sample_customer(org_id);
    let mut sent = sample_invoice(org_id, customer.id);
    sent.change_status(InvoiceStatus::Sent).unwrap();
    store.insert_invoice(sent.clone());
    store.insert_invoice(sample_invoice(org_id, customer.id));
    store.insert_invoice(sample_invoice(org_id, other.id));
    store.insert_invoice(sample_invoice(Uuid::new_v4(), customer.id));

    let use_case = ListInvoicesUseCase::new(Arc::new(invoice_service(&store)));

    let all = use_case
      .execute(ListInvoicesCommand {
        organization_id: org_id,
        status_filter: Some(" ".to_string()),
        customer_filter: None,
      })
      .await
      .unwrap();
    assert_eq!(all.total, 3);

    let sent_only = use_case
      .execute(ListInvoicesCommand {
        organization_id: org_id,
        status_filter: Some("sent".to_string()),
        customer_filter: Some(customer.id),
      })
      .await
      .unwrap();
    assert_eq!(sent_only.total, 1);
    assert_eq!(sent_only.invoices[0].id, sent.id);
    assert_eq!(sent_only.invoices[0].status, "sent");
  }

  #[tokio::test]
  async fn test_unknown_status_is_rejected() {
    let store = Arc::new(InMemoryStore::default());
    let use_case = ListInvoicesUseCase::new(Arc::new(invoice_service(&store)));

    let result = use_case
      .execute(ListInvoicesCommand {
        organization_id: Uuid::new_v4(),
        status_filter: Some("archived".to_string()),
        customer_filter: None,
      })
      .await;
    assert!(matches!(result, Err(InvoiceError::Validation(_))));
  }
}
