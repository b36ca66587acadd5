use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ContactAddress, ContactKind, EmailAddress};
use crate::domain::common::Name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: Name,
  pub email: Option<EmailAddress>,
  pub phone: Option<String>,
  pub address: Option<ContactAddress>,
  pub kind: ContactKind,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Editable fields of a contact, used for both create and full-replace update
#[derive(Debug, Clone)]
pub struct ContactDetails {
  pub name: Name,
  pub email: Option<EmailAddress>,
  pub phone: Option<String>,
  pub address: Option<ContactAddress>,
  pub kind: ContactKind,
}

impl Contact {
  pub fn new(organization_id: Uuid, details: ContactDetails) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      organization_id,
      name: details.name,
      email: details.email,
      phone: normalize_phone(details.phone),
      address: details.address,
      kind: details.kind,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(&mut self, details: ContactDetails) {
    self.name = details.name;
    self.email = details.email;
    self.phone = normalize_phone(details.phone);
    self.address = details.address;
    self.kind = details.kind;
    self.updated_at = Utc::now();
  }
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
  phone
    .map(|p| p.trim().to_string())
    .filter(|p| !p.is_empty())
}
