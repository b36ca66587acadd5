use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::ValueObjectError;

#[derive(Debug, Error)]
pub enum ContactError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Contact not found: {0}")]
  NotFound(Uuid),

  #[error("A contact with email '{0}' already exists")]
  EmailAlreadyExists(String),

  #[error("Contact {0} is referenced by invoices and cannot be deleted")]
  InUse(Uuid),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
