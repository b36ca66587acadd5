use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDto;
use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus};
use crate::infrastructure::metrics::INVOICE_STATUS_TRANSITIONS;

#[derive(Debug)]
pub struct ChangeInvoiceStatusCommand {
  pub invoice_id: Uuid,
  pub new_status: String,
  pub expected_version: Option<i64>,
}

pub struct ChangeInvoiceStatusUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ChangeInvoiceStatusUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ChangeInvoiceStatusCommand,
  ) -> Result<InvoiceDto, InvoiceError> {
    let new_status = InvoiceStatus::from_str(&command.new_status)?;

    let invoice = self
      .invoice_service
      .change_invoice_status(command.invoice_id, new_status, command.expected_version)
      .await?;

    INVOICE_STATUS_TRANSITIONS
      .with_label_values(&[new_status.as_str()])
      .inc();
    Ok(invoice.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::testing::{InMemoryStore, invoice_service, sample_customer, sample_invoice};

  fn setup() -> (ChangeInvoiceStatusUseCase, Arc<InMemoryStore>, Uuid) {
    let store = Arc::new(InMemoryStore::default());
    let org_id = Uuid::new_v4();
    let customer = sample_customer(org_id);
    store.insert_contact(customer.clone());
    let invoice = sample_invoice(org_id, customer.id);
    store.insert_invoice(invoice.clone());
    let use_case = ChangeInvoiceStatusUseCase::new(Arc::new(invoice_service(&store)));
    (use_case, store, invoice.id)
  }

  #[tokio::test]
  async fn test_draft_can_be_sent() {
    let (use_case, store, invoice_id) = setup();

    let dto = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id,
        new_status: "sent".to_string(),
        expected_version: None,
      })
      .await
      .unwrap();

    assert_eq!(dto.status, "sent");
    assert_eq!(
      store.invoice(invoice_id).unwrap().status,
      InvoiceStatus::Sent
    );
  }

  #[tokio::test]
  async fn test_draft_cannot_be_marked_paid() {
    let (use_case, _store, invoice_id) = setup();

    let result = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id,
        new_status: "paid".to_string(),
        expected_version: None,
      })
      .await;

    assert!(matches!(result, Err(InvoiceError::InvalidStatusTransition(_))));
  }

  #[tokio::test]
  async fn test_unknown_status_is_a_validation_error() {
    let (use_case, _store, invoice_id) = setup();

    let result = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id,
        new_status: "archived".to_string(),
        expected_version: None,
      })
      .await;

    assert!(matches!(result, Err(InvoiceError::Validation(_))));
  }
}
