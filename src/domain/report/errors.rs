use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::ValueObjectError;

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Contact not found: {0}")]
  ContactNotFound(Uuid),

  #[error("Failed to load report data: {0}")]
  Source(String),

  #[error("Failed to export report: {0}")]
  Export(String),
}
