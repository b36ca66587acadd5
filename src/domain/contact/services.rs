use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Contact, ContactDetails};
use super::errors::ContactError;
use super::ports::ContactRepository;
use super::value_objects::ContactKind;

pub struct ContactService {
  contact_repo: Arc<dyn ContactRepository>,
}

impl ContactService {
  pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
    Self { contact_repo }
  }

  pub async fn create_contact(
    &self,
    organization_id: Uuid,
    details: ContactDetails,
  ) -> Result<Contact, ContactError> {
    self
      .ensure_email_available(organization_id, &details, None)
      .await?;

    let contact = Contact::new(organization_id, details);
    let created = self.contact_repo.create(contact).await?;

    tracing::info!(contact_id = %created.id, organization_id = %organization_id, "Contact created");
    Ok(created)
  }

  pub async fn update_contact(
    &self,
    contact_id: Uuid,
    details: ContactDetails,
  ) -> Result<Contact, ContactError> {
    let mut contact = self.get_contact(contact_id).await?;

    self
      .ensure_email_available(contact.organization_id, &details, Some(contact_id))
      .await?;

    contact.update(details);
    self.contact_repo.update(contact).await
  }

  pub async fn get_contact(&self, contact_id: Uuid) -> Result<Contact, ContactError> {
    self
      .contact_repo
      .find_by_id(contact_id)
      .await?
      .ok_or(ContactError::NotFound(contact_id))
  }

  pub async fn contact_exists(&self, contact_id: Uuid) -> Result<bool, ContactError> {
    Ok(self.contact_repo.find_by_id(contact_id).await?.is_some())
  }

  pub async fn list_contacts(
    &self,
    organization_id: Uuid,
    kind: Option<ContactKind>,
  ) -> Result<Vec<Contact>, ContactError> {
    self
      .contact_repo
      .find_by_organization(organization_id, kind)
      .await
  }

  pub async fn delete_contact(&self, contact_id: Uuid) -> Result<Contact, ContactError> {
    let contact = self.get_contact(contact_id).await?;

    if self.contact_repo.has_invoices(contact_id).await? {
      return Err(ContactError::InUse(contact_id));
    }

    self.contact_repo.delete(contact_id).await?;
    tracing::info!(contact_id = %contact_id, "Contact deleted");
    Ok(contact)
  }

  async fn ensure_email_available(
    &self,
    organization_id: Uuid,
    details: &ContactDetails,
    exclude_id: Option<Uuid>,
  ) -> Result<(), ContactError> {
    if let Some(email) = &details.email {
      if self
        .contact_repo
        .exists_by_email(organization_id, email.as_str(), exclude_id)
        .await?
      {
        return Err(ContactError::EmailAlreadyExists(email.to_string()));
      }
    }
    Ok(())
  }
}
