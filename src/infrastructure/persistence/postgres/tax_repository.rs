use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, Tax, TaxComputation, TaxRate, TaxRepository};
use crate::domain::common::Name;

#[derive(Debug, FromRow)]
struct TaxRow {
  id: Uuid,
  organization_id: Uuid,
  name: String,
  rate: Decimal,
  computation: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<TaxRow> for Tax {
  type Error = CatalogError;

  fn try_from(row: TaxRow) -> Result<Self, Self::Error> {
    let computation = TaxComputation::from_str(&row.computation)?;

    Ok(Tax {
      id: row.id,
      organization_id: row.organization_id,
      name: Name::new(row.name)?,
      rate: TaxRate::new(row.rate.normalize(), computation)?,
      computation,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresTaxRepository {
  pool: PgPool,
}

impl PostgresTaxRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TaxRepository for PostgresTaxRepository {
  async fn create(&self, tax: Tax) -> Result<Tax, CatalogError> {
    let row = sqlx::query_as::<_, TaxRow>(
      r#"
            INSERT INTO taxes (id, organization_id, name, rate, computation, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, name, rate, computation, created_at, updated_at
            "#,
    )
    .bind(tax.id)
    .bind(tax.organization_id)
    .bind(tax.name.value())
    .bind(tax.rate.value())
    .bind(tax.computation.as_str())
    .bind(tax.created_at)
    .bind(tax.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, tax: Tax) -> Result<Tax, CatalogError> {
    let row = sqlx::query_as::<_, TaxRow>(
      r#"
            UPDATE taxes
            SET name = $2, rate = $3, computation = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, organization_id, name, rate, computation, created_at, updated_at
            "#,
    )
    .bind(tax.id)
    .bind(tax.name.value())
    .bind(tax.rate.value())
    .bind(tax.computation.as_str())
    .bind(tax.updated_at)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(CatalogError::TaxNotFound(tax.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Tax>, CatalogError> {
    let row = sqlx::query_as::<_, TaxRow>(
      r#"
            SELECT id, organization_id, name, rate, computation, created_at, updated_at
            FROM taxes
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_by_organization(&self, organization_id: Uuid) -> Result<Vec<Tax>, CatalogError> {
    let rows = sqlx::query_as::<_, TaxRow>(
      r#"
            SELECT id, organization_id, name, rate, computation, created_at, updated_at
            FROM taxes
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
    )
    .bind(organization_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
    sqlx::query("DELETE FROM taxes WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
          CatalogError::TaxInUse(id)
        }
        _ => CatalogError::Database(e),
      })?;

    Ok(())
  }
}
