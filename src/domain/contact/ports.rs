use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Contact;
use super::errors::ContactError;
use super::value_objects::ContactKind;

#[async_trait]
pub trait ContactRepository: Send + Sync {
  async fn create(&self, contact: Contact) -> Result<Contact, ContactError>;
  async fn update(&self, contact: Contact) -> Result<Contact, ContactError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, ContactError>;
  async fn find_by_organization(
    &self,
    organization_id: Uuid,
    kind: Option<ContactKind>,
  ) -> Result<Vec<Contact>, ContactError>;
  async fn exists_by_email(
    &self,
    organization_id: Uuid,
    email: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ContactError>;
  async fn has_invoices(&self, id: Uuid) -> Result<bool, ContactError>;
  async fn delete(&self, id: Uuid) -> Result<(), ContactError>;
}
