use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_contact::ContactDto;
use crate::domain::common::Name;
use crate::domain::contact::{
  ContactAddress, ContactDetails, ContactError, ContactKind, ContactService, EmailAddress,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactAddressInput {
  pub street: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub postal_code: Option<String>,
  pub country: Option<String>,
}

/// Raw editable contact fields shared by create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ContactFields {
  pub name: String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<ContactAddressInput>,
  pub kind: Option<String>,
}

impl ContactFields {
  pub(crate) fn into_details(self) -> Result<ContactDetails, ContactError> {
    let email = self
      .email
      .filter(|e| !e.trim().is_empty())
      .map(EmailAddress::new)
      .transpose()?;
    let kind = self
      .kind
      .as_deref()
      .map(ContactKind::from_str)
      .transpose()?
      .unwrap_or(ContactKind::Customer);
    let address = self.address.and_then(|a| {
      ContactAddress::new(a.street, a.city, a.state, a.postal_code, a.country)
    });

    Ok(ContactDetails {
      name: Name::new(self.name)?,
      email,
      phone: self.phone,
      address,
      kind,
    })
  }
}

#[derive(Debug)]
pub struct CreateContactCommand {
  pub organization_id: Uuid,
  pub fields: ContactFields,
}

pub struct CreateContactUseCase {
  contact_service: Arc<ContactService>,
}

impl CreateContactUseCase {
  pub fn new(contact_service: Arc<ContactService>) -> Self {
    Self { contact_service }
  }

  pub async fn execute(&self, command: CreateContactCommand) -> Result<ContactDto, ContactError> {
    let details = command.fields.into_details()?;

    let contact = self
      .contact_service
      .create_contact(command.organization_id, details)
      .await?;

    Ok(contact.into())
  }
}
