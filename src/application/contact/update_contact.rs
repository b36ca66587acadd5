use std::sync::Arc;
use uuid::Uuid;

use super::create_contact::ContactFields;
use super::get_contact::ContactDto;
use crate::domain::contact::{ContactError, ContactService};

#[derive(Debug)]
pub struct UpdateContactCommand {
  pub contact_id: Uuid,
  pub fields: ContactFields,
}

pub struct UpdateContactUseCase {
  contact_service: Arc<ContactService>,
}

impl UpdateContactUseCase {
  pub fn new(contact_service: Arc<ContactService>) -> Self {
    Self { contact_service }
  }

  pub async fn execute(&self, command: UpdateContactCommand) -> Result<ContactDto, ContactError> {
    let details = command.fields.into_details()?;

    let contact = self
      .contact_service
      .update_contact(command.contact_id, details)
      .await?;

    Ok(contact.into())
  }
}
