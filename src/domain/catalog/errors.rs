use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::ValueObjectError;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Tax not found: {0}")]
  TaxNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Tax {0} is the default tax of at least one product")]
  TaxInUse(Uuid),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
