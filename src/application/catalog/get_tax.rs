use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Tax};

#[derive(Debug, Serialize)]
pub struct TaxDto {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: String,
  pub rate: Decimal,
  pub computation: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Tax> for TaxDto {
  fn from(tax: Tax) -> Self {
    Self {
      id: tax.id,
      organization_id: tax.organization_id,
      name: tax.name.into_inner(),
      rate: tax.rate.value(),
      computation: tax.computation.as_str().to_string(),
      created_at: tax.created_at,
      updated_at: tax.updated_at,
    }
  }
}

pub struct GetTaxUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetTaxUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, tax_id: Uuid) -> Result<TaxDto, CatalogError> {
    Ok(self.catalog_service.get_tax(tax_id).await?.into())
  }
}
