use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, Product, ProductRepository};
use crate::domain::common::{Name, UnitPrice};

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  organization_id: Uuid,
  name: String,
  unit_price: Decimal,
  tax_id: Option<Uuid>,
  description: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = CatalogError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    Ok(Product {
      id: row.id,
      organization_id: row.organization_id,
      name: Name::new(row.name)?,
      unit_price: UnitPrice::new(row.unit_price)?,
      tax_id: row.tax_id,
      description: row.description,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn map_write_error(e: sqlx::Error, tax_id: Option<Uuid>) -> CatalogError {
  match (&e, tax_id) {
    (sqlx::Error::Database(db_err), Some(tax_id)) if db_err.code().as_deref() == Some("23503") => {
      CatalogError::TaxNotFound(tax_id)
    }
    _ => CatalogError::Database(e),
  }
}

pub struct PostgresProductRepository {
  pool: PgPool,
}

impl PostgresProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
  async fn create(&self, product: Product) -> Result<Product, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(
      r#"
            INSERT INTO products (
                id, organization_id, name, unit_price, tax_id, description, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, organization_id, name, unit_price, tax_id, description,
                      created_at, updated_at
            "#,
    )
    .bind(product.id)
    .bind(product.organization_id)
    .bind(product.name.value())
    .bind(product.unit_price.value())
    .bind(product.tax_id)
    .bind(&product.description)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_write_error(e, product.tax_id))?;

    row.try_into()
  }

  async fn update(&self, product: Product) -> Result<Product, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(
      r#"
            UPDATE products
            SET name = $2, unit_price = $3, tax_id = $4, description = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, organization_id, name, unit_price, tax_id, description,
                      created_at, updated_at
            "#,
    )
    .bind(product.id)
    .bind(product.name.value())
    .bind(product.unit_price.value())
    .bind(product.tax_id)
    .bind(&product.description)
    .bind(product.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| map_write_error(e, product.tax_id))?
    .ok_or(CatalogError::ProductNotFound(product.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(
      r#"
            SELECT id, organization_id, name, unit_price, tax_id, description,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_by_organization(
    &self,
    organization_id: Uuid,
  ) -> Result<Vec<Product>, CatalogError> {
    let rows = sqlx::query_as::<_, ProductRow>(
      r#"
            SELECT id, organization_id, name, unit_price, tax_id, description,
                   created_at, updated_at
            FROM products
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
    )
    .bind(organization_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn exists_with_tax(&self, tax_id: Uuid) -> Result<bool, CatalogError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE tax_id = $1)")
      .bind(tax_id)
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }

  async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
    sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(())
  }
}
