use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Product, Tax};
use super::errors::CatalogError;

#[async_trait]
pub trait TaxRepository: Send + Sync {
  async fn create(&self, tax: Tax) -> Result<Tax, CatalogError>;
  async fn update(&self, tax: Tax) -> Result<Tax, CatalogError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Tax>, CatalogError>;
  async fn find_by_organization(&self, organization_id: Uuid) -> Result<Vec<Tax>, CatalogError>;
  async fn delete(&self, id: Uuid) -> Result<(), CatalogError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn create(&self, product: Product) -> Result<Product, CatalogError>;
  async fn update(&self, product: Product) -> Result<Product, CatalogError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;
  async fn find_by_organization(
    &self,
    organization_id: Uuid,
  ) -> Result<Vec<Product>, CatalogError>;
  async fn exists_with_tax(&self, tax_id: Uuid) -> Result<bool, CatalogError>;
  async fn delete(&self, id: Uuid) -> Result<(), CatalogError>;
}
