use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::contact::{Contact, ContactAddress, ContactError, ContactService};

#[derive(Debug, Serialize)]
pub struct ContactDto {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<ContactAddress>,
  pub kind: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactDto {
  fn from(contact: Contact) -> Self {
    Self {
      id: contact.id,
      organization_id: contact.organization_id,
      name: contact.name.into_inner(),
      email: contact.email.map(|e| e.into_inner()),
      phone: contact.phone,
      address: contact.address,
      kind: contact.kind.as_str().to_string(),
      created_at: contact.created_at,
      updated_at: contact.updated_at,
    }
  }
}

pub struct GetContactUseCase {
  contact_service: Arc<ContactService>,
}

impl GetContactUseCase {
  pub fn new(contact_service: Arc<ContactService>) -> Self {
    Self { contact_service }
  }

  pub async fn execute(&self, contact_id: Uuid) -> Result<ContactDto, ContactError> {
    let contact = self.contact_service.get_contact(contact_id).await?;
    Ok(contact.into())
  }
}
