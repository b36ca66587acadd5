use std::sync::Arc;
use uuid::Uuid;

use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService};

pub struct ListProductsUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListProductsUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, organization_id: Uuid) -> Result<Vec<ProductDto>, CatalogError> {
    let products = self.catalog_service.list_products(organization_id).await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
  }
}
