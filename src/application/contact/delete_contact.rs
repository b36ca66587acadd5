use std::sync::Arc;
use uuid::Uuid;

use super::get_contact::ContactDto;
use crate::domain::contact::{ContactError, ContactService};

pub struct DeleteContactUseCase {
  contact_service: Arc<ContactService>,
}

impl DeleteContactUseCase {
  pub fn new(contact_service: Arc<ContactService>) -> Self {
    Self { contact_service }
  }

  pub async fn execute(&self, contact_id: Uuid) -> Result<ContactDto, ContactError> {
    let contact = self.contact_service.delete_contact(contact_id).await?;
    Ok(contact.into())
  }
}
