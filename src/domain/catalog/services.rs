use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Product, ProductDetails, Tax};
use super::errors::CatalogError;
use super::ports::{ProductRepository, TaxRepository};
use super::value_objects::{TaxComputation, TaxRate};
use crate::domain::common::Name;

pub struct CatalogService {
  tax_repo: Arc<dyn TaxRepository>,
  product_repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
  pub fn new(tax_repo: Arc<dyn TaxRepository>, product_repo: Arc<dyn ProductRepository>) -> Self {
    Self {
      tax_repo,
      product_repo,
    }
  }

  // Tax operations
  pub async fn create_tax(
    &self,
    organization_id: Uuid,
    name: Name,
    rate: TaxRate,
    computation: TaxComputation,
  ) -> Result<Tax, CatalogError> {
    let tax = Tax::new(organization_id, name, rate, computation);
    self.tax_repo.create(tax).await
  }

  pub async fn update_tax(
    &self,
    tax_id: Uuid,
    name: Name,
    rate: TaxRate,
    computation: TaxComputation,
  ) -> Result<Tax, CatalogError> {
    let mut tax = self.get_tax(tax_id).await?;
    tax.update(name, rate, computation);
    self.tax_repo.update(tax).await
  }

  /// Tax lookup used by invoice assembly
  pub async fn get_tax(&self, tax_id: Uuid) -> Result<Tax, CatalogError> {
    self
      .tax_repo
      .find_by_id(tax_id)
      .await?
      .ok_or(CatalogError::TaxNotFound(tax_id))
  }

  pub async fn list_taxes(&self, organization_id: Uuid) -> Result<Vec<Tax>, CatalogError> {
    self.tax_repo.find_by_organization(organization_id).await
  }

  pub async fn delete_tax(&self, tax_id: Uuid) -> Result<Tax, CatalogError> {
    let tax = self.get_tax(tax_id).await?;

    if self.product_repo.exists_with_tax(tax_id).await? {
      return Err(CatalogError::TaxInUse(tax_id));
    }

    self.tax_repo.delete(tax_id).await?;
    Ok(tax)
  }

  // Product operations
  pub async fn create_product(
    &self,
    organization_id: Uuid,
    details: ProductDetails,
  ) -> Result<Product, CatalogError> {
    self
      .verify_default_tax(organization_id, details.tax_id)
      .await?;

    let product = Product::new(organization_id, details);
    self.product_repo.create(product).await
  }

  pub async fn update_product(
    &self,
    product_id: Uuid,
    details: ProductDetails,
  ) -> Result<Product, CatalogError> {
    let mut product = self.get_product(product_id).await?;

    self
      .verify_default_tax(product.organization_id, details.tax_id)
      .await?;

    product.update(details);
    self.product_repo.update(product).await
  }

  pub async fn get_product(&self, product_id: Uuid) -> Result<Product, CatalogError> {
    self
      .product_repo
      .find_by_id(product_id)
      .await?
      .ok_or(CatalogError::ProductNotFound(product_id))
  }

  pub async fn list_products(&self, organization_id: Uuid) -> Result<Vec<Product>, CatalogError> {
    self
      .product_repo
      .find_by_organization(organization_id)
      .await
  }

  pub async fn delete_product(&self, product_id: Uuid) -> Result<Product, CatalogError> {
    let product = self.get_product(product_id).await?;
    self.product_repo.delete(product_id).await?;
    Ok(product)
  }

  // A default tax must belong to the product's organization
  async fn verify_default_tax(
    &self,
    organization_id: Uuid,
    tax_id: Option<Uuid>,
  ) -> Result<(), CatalogError> {
    if let Some(tax_id) = tax_id {
      let tax = self.get_tax(tax_id).await?;
      if tax.organization_id != organization_id {
        return Err(CatalogError::TaxNotFound(tax_id));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::common::UnitPrice;
  use crate::domain::testing::InMemoryStore;
  use rust_decimal_macros::dec;

  fn service() -> CatalogService {
    let store = Arc::new(InMemoryStore::default());
    CatalogService::new(store.clone(), store)
  }

  async fn gst(service: &CatalogService, org_id: Uuid) -> Tax {
    service
      .create_tax(
        org_id,
        Name::new("GST 18%".to_string()).unwrap(),
        TaxRate::new(dec!(18), TaxComputation::Percentage).unwrap(),
        TaxComputation::Percentage,
      )
      .await
      .unwrap()
  }

  fn widget(tax_id: Option<Uuid>) -> ProductDetails {
    ProductDetails {
      name: Name::new("Widget".to_string()).unwrap(),
      unit_price: UnitPrice::new(dec!(100)).unwrap(),
      tax_id,
      description: None,
    }
  }

  #[tokio::test]
  async fn test_product_with_foreign_tax_is_rejected() {
    let service = service();
    let tax = gst(&service, Uuid::new_v4()).await;

    let result = service
      .create_product(Uuid::new_v4(), widget(Some(tax.id)))
      .await;
    assert!(matches!(result, Err(CatalogError::TaxNotFound(id)) if id == tax.id));
  }

  #[tokio::test]
  async fn test_product_with_unknown_tax_is_rejected() {
    let service = service();
    let result = service
      .create_product(Uuid::new_v4(), widget(Some(Uuid::new_v4())))
      .await;
    assert!(matches!(result, Err(CatalogError::TaxNotFound(_))));
  }

  #[tokio::test]
  async fn test_tax_in_use_cannot_be_deleted() {
    let service = service();
    let org_id = Uuid::new_v4();
    let tax = gst(&service, org_id).await;
    let product = service
      .create_product(org_id, widget(Some(tax.id)))
      .await
      .unwrap();

    assert!(matches!(
      service.delete_tax(tax.id).await,
      Err(CatalogError::TaxInUse(_))
    ));

    service.delete_product(product.id).await.unwrap();
    assert_eq!(service.delete_tax(tax.id).await.unwrap().id, tax.id);
    assert!(service.list_taxes(org_id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_update_tax() {
    let service = service();
    let tax = gst(&service, Uuid::new_v4()).await;

    let updated = service
      .update_tax(
        tax.id,
        Name::new("Eco levy".to_string()).unwrap(),
        TaxRate::new(dec!(20), TaxComputation::Fixed).unwrap(),
        TaxComputation::Fixed,
      )
      .await
      .unwrap();

    assert_eq!(updated.computation, TaxComputation::Fixed);
    assert_eq!(service.get_tax(tax.id).await.unwrap().rate.value(), dec!(20));
  }
}
