use std::sync::Arc;
use uuid::Uuid;

use super::create_product::ProductFields;
use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService};

#[derive(Debug)]
pub struct UpdateProductCommand {
  pub product_id: Uuid,
  pub fields: ProductFields,
}

pub struct UpdateProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl UpdateProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: UpdateProductCommand) -> Result<ProductDto, CatalogError> {
    let details = command.fields.into_details()?;

    let product = self
      .catalog_service
      .update_product(command.product_id, details)
      .await?;

    Ok(product.into())
  }
}
