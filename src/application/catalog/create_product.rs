use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService, ProductDetails};
use crate::domain::common::{Name, UnitPrice};

#[derive(Debug, Clone)]
pub struct ProductFields {
  pub name: String,
  pub unit_price: Decimal,
  pub tax_id: Option<Uuid>,
  pub description: Option<String>,
}

impl ProductFields {
  pub(crate) fn into_details(self) -> Result<ProductDetails, CatalogError> {
    Ok(ProductDetails {
      name: Name::new(self.name)?,
      unit_price: UnitPrice::new(self.unit_price)?,
      tax_id: self.tax_id,
      description: self
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty()),
    })
  }
}

#[derive(Debug)]
pub struct CreateProductCommand {
  pub organization_id: Uuid,
  pub fields: ProductFields,
}

pub struct CreateProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateProductCommand) -> Result<ProductDto, CatalogError> {
    let details = command.fields.into_details()?;

    let product = self
      .catalog_service
      .create_product(command.organization_id, details)
      .await?;

    Ok(product.into())
  }
}
