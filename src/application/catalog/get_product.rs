use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Product};

#[derive(Debug, Serialize)]
pub struct ProductDto {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: String,
  pub unit_price: Decimal,
  pub tax_id: Option<Uuid>,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
  fn from(product: Product) -> Self {
    Self {
      id: product.id,
      organization_id: product.organization_id,
      name: product.name.into_inner(),
      unit_price: product.unit_price.value(),
      tax_id: product.tax_id,
      description: product.description,
      created_at: product.created_at,
      updated_at: product.updated_at,
    }
  }
}

pub struct GetProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, product_id: Uuid) -> Result<ProductDto, CatalogError> {
    Ok(self.catalog_service.get_product(product_id).await?.into())
  }
}
