use std::sync::Arc;
use uuid::Uuid;

use super::get_tax::TaxDto;
use crate::domain::catalog::{CatalogError, CatalogService};

pub struct DeleteTaxUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteTaxUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, tax_id: Uuid) -> Result<TaxDto, CatalogError> {
    Ok(self.catalog_service.delete_tax(tax_id).await?.into())
  }
}
