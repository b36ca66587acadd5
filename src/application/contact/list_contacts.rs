use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_contact::ContactDto;
use crate::domain::contact::{ContactError, ContactKind, ContactService};

#[derive(Debug)]
pub struct ListContactsCommand {
  pub organization_id: Uuid,
  pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListContactsResponse {
  pub contacts: Vec<ContactDto>,
  pub total: usize,
}

pub struct ListContactsUseCase {
  contact_service: Arc<ContactService>,
}

impl ListContactsUseCase {
  pub fn new(contact_service: Arc<ContactService>) -> Self {
    Self { contact_service }
  }

  pub async fn execute(
    &self,
    command: ListContactsCommand,
  ) -> Result<ListContactsResponse, ContactError> {
    let kind = command
      .kind
      .as_deref()
      .map(ContactKind::from_str)
      .transpose()?;

    let contacts: Vec<ContactDto> = self
      .contact_service
      .list_contacts(command.organization_id, kind)
      .await?
      .into_iter()
      .map(ContactDto::from)
      .collect();

    Ok(ListContactsResponse {
      total: contacts.len(),
      contacts,
    })
  }
}
