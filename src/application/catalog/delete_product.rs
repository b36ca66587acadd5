use std::sync::Arc;
use uuid::Uuid;

use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService};

pub struct DeleteProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, product_id: Uuid) -> Result<ProductDto, CatalogError> {
    Ok(self.catalog_service.delete_product(product_id).await?.into())
  }
}
