use std::sync::Arc;
use uuid::Uuid;

use super::get_tax::TaxDto;
use crate::domain::catalog::{CatalogError, CatalogService};

pub struct ListTaxesUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListTaxesUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, organization_id: Uuid) -> Result<Vec<TaxDto>, CatalogError> {
    let taxes = self.catalog_service.list_taxes(organization_id).await?;
    Ok(taxes.into_iter().map(TaxDto::from).collect())
  }
}
