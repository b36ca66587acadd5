use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::catalog::TaxComputation;
use crate::domain::common::{Currency, Name, UnitPrice};
use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceFilter, InvoiceLineItem, InvoiceNumber, InvoiceRepository,
  InvoiceStatus, PaymentDetails, PdfReference, Quantity, StorageBackend, TaxSnapshot,
};

const NUMBER_UNIQUE_CONSTRAINT: &str = "invoices_number_unique";

const INVOICE_COLUMNS: &str = "id, organization_id, customer_id, invoice_number, invoice_date, \
  due_date, status, currency, sub_total, total_tax, grand_total, amount_paid, balance_due, notes, \
  pdf_storage_key, pdf_backend, pdf_size_bytes, pdf_generated_at, payment_details, version, \
  created_at, updated_at";

const LINE_ITEM_COLUMNS: &str = "id, invoice_id, position, product_id, product_name, quantity, \
  unit_price, tax_id, tax_name, tax_rate, tax_computation, subtotal, tax_amount, total";

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRow {
  id: Uuid,
  organization_id: Uuid,
  customer_id: Uuid,
  invoice_number: String,
  invoice_date: NaiveDate,
  due_date: NaiveDate,
  status: String,
  currency: String,
  sub_total: Decimal,
  total_tax: Decimal,
  grand_total: Decimal,
  amount_paid: Decimal,
  balance_due: Decimal,
  notes: Option<String>,
  pdf_storage_key: Option<String>,
  pdf_backend: Option<String>,
  pdf_size_bytes: Option<i64>,
  pdf_generated_at: Option<DateTime<Utc>>,
  payment_details: Option<Json<PaymentDetails>>,
  version: i64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
  id: Uuid,
  invoice_id: Uuid,
  position: i32,
  product_id: Option<Uuid>,
  product_name: String,
  quantity: i64,
  unit_price: Decimal,
  tax_id: Option<Uuid>,
  tax_name: Option<String>,
  tax_rate: Option<Decimal>,
  tax_computation: Option<String>,
  subtotal: Decimal,
  tax_amount: Decimal,
  total: Decimal,
}

impl TryFrom<LineItemRow> for InvoiceLineItem {
  type Error = InvoiceError;

  fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
    let tax = match (row.tax_id, row.tax_name, row.tax_rate, row.tax_computation) {
      (Some(tax_id), Some(name), Some(rate), Some(computation)) => Some(TaxSnapshot {
        tax_id,
        name,
        rate: rate.normalize(),
        computation: TaxComputation::from_str(&computation)?,
      }),
      (None, _, _, _) => None,
      _ => {
        return Err(InvoiceError::Repository(format!(
          "Incomplete tax snapshot on line item {}",
          row.id
        )));
      }
    };

    Ok(InvoiceLineItem {
      id: row.id,
      invoice_id: row.invoice_id,
      position: row.position,
      product_id: row.product_id,
      product_name: Name::new(row.product_name)?,
      quantity: Quantity::new(row.quantity)?,
      unit_price: UnitPrice::new(row.unit_price)?,
      tax,
      subtotal: row.subtotal,
      tax_amount: row.tax_amount,
      total: row.total,
    })
  }
}

impl InvoiceRow {
  fn into_invoice(self, line_items: Vec<InvoiceLineItem>) -> Result<Invoice, InvoiceError> {
    let pdf = match (
      self.pdf_storage_key,
      self.pdf_backend,
      self.pdf_size_bytes,
      self.pdf_generated_at,
    ) {
      (Some(storage_key), Some(backend), Some(size_bytes), Some(generated_at)) => {
        Some(PdfReference {
          storage_key,
          backend: StorageBackend::from_str(&backend).map_err(InvoiceError::Repository)?,
          size_bytes,
          generated_at,
        })
      }
      _ => None,
    };

    Ok(Invoice {
      id: self.id,
      organization_id: self.organization_id,
      customer_id: self.customer_id,
      invoice_number: InvoiceNumber::new(self.invoice_number)?,
      invoice_date: self.invoice_date,
      due_date: self.due_date,
      status: InvoiceStatus::from_str(&self.status)?,
      currency: Currency::from_str(&self.currency)?,
      line_items,
      sub_total: self.sub_total,
      total_tax: self.total_tax,
      grand_total: self.grand_total,
      amount_paid: self.amount_paid,
      balance_due: self.balance_due,
      notes: self.notes,
      pdf,
      payment_details: self.payment_details.map(|Json(details)| details),
      version: self.version,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

fn map_write_error(e: sqlx::Error, invoice: &Invoice) -> InvoiceError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some("23505")
      && db_err.constraint() == Some(NUMBER_UNIQUE_CONSTRAINT)
    {
      return InvoiceError::InvoiceNumberAlreadyExists(invoice.invoice_number.value().to_string());
    }
    if db_err.code().as_deref() == Some("23503") {
      return InvoiceError::CustomerNotFound(invoice.customer_id);
    }
  }
  InvoiceError::Database(e)
}

async fn insert_line_items(
  conn: &mut PgConnection,
  line_items: &[InvoiceLineItem],
) -> Result<(), InvoiceError> {
  for item in line_items {
    let tax = item.tax.as_ref();
    sqlx::query(
      r#"
            INSERT INTO invoice_line_items (
                id, invoice_id, position, product_id, product_name, quantity, unit_price,
                tax_id, tax_name, tax_rate, tax_computation, subtotal, tax_amount, total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
    )
    .bind(item.id)
    .bind(item.invoice_id)
    .bind(item.position)
    .bind(item.product_id)
    .bind(item.product_name.value())
    .bind(i64::from(item.quantity.value()))
    .bind(item.unit_price.value())
    .bind(tax.map(|t| t.tax_id))
    .bind(tax.map(|t| t.name.as_str()))
    .bind(tax.map(|t| t.rate))
    .bind(tax.map(|t| t.computation.as_str()))
    .bind(item.subtotal)
    .bind(item.tax_amount)
    .bind(item.total)
    .execute(&mut *conn)
    .await?;
  }

  Ok(())
}

async fn load_line_items(
  conn: &mut PgConnection,
  invoice_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<InvoiceLineItem>>, InvoiceError> {
  let rows = sqlx::query_as::<_, LineItemRow>(&format!(
    "SELECT {} FROM invoice_line_items WHERE invoice_id = ANY($1) ORDER BY invoice_id, position",
    LINE_ITEM_COLUMNS
  ))
  .bind(invoice_ids)
  .fetch_all(&mut *conn)
  .await?;

  let mut grouped: HashMap<Uuid, Vec<InvoiceLineItem>> = HashMap::new();
  for row in rows {
    grouped
      .entry(row.invoice_id)
      .or_default()
      .push(row.try_into()?);
  }
  Ok(grouped)
}

/// Attaches the line items of an already fetched header row
pub(crate) async fn load_invoice(
  conn: &mut PgConnection,
  row: InvoiceRow,
) -> Result<Invoice, InvoiceError> {
  let mut items = load_line_items(&mut *conn, &[row.id]).await?;
  let line_items = items.remove(&row.id).unwrap_or_default();
  row.into_invoice(line_items)
}

/// Compare-and-swap write of the invoice header. Bumps `version` on success.
pub(crate) async fn write_invoice_header(
  conn: &mut PgConnection,
  invoice: &Invoice,
  expected_version: i64,
) -> Result<InvoiceRow, InvoiceError> {
  let pdf = invoice.pdf.as_ref();

  let row = sqlx::query_as::<_, InvoiceRow>(&format!(
    r#"
            UPDATE invoices
            SET customer_id = $3, invoice_number = $4, invoice_date = $5, due_date = $6,
                status = $7, sub_total = $8, total_tax = $9, grand_total = $10,
                amount_paid = $11, balance_due = $12, notes = $13, pdf_storage_key = $14,
                pdf_backend = $15, pdf_size_bytes = $16, pdf_generated_at = $17,
                payment_details = $18, updated_at = $19, version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {}
            "#,
    INVOICE_COLUMNS
  ))
  .bind(invoice.id)
  .bind(expected_version)
  .bind(invoice.customer_id)
  .bind(invoice.invoice_number.value())
  .bind(invoice.invoice_date)
  .bind(invoice.due_date)
  .bind(invoice.status.as_str())
  .bind(invoice.sub_total)
  .bind(invoice.total_tax)
  .bind(invoice.grand_total)
  .bind(invoice.amount_paid)
  .bind(invoice.balance_due)
  .bind(&invoice.notes)
  .bind(pdf.map(|p| p.storage_key.as_str()))
  .bind(pdf.map(|p| p.backend.as_str()))
  .bind(pdf.map(|p| p.size_bytes))
  .bind(pdf.map(|p| p.generated_at))
  .bind(invoice.payment_details.as_ref().map(Json))
  .bind(invoice.updated_at)
  .fetch_optional(&mut *conn)
  .await
  .map_err(|e| map_write_error(e, invoice))?;

  match row {
    Some(row) => Ok(row),
    None => {
      let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
        .bind(invoice.id)
        .fetch_one(&mut *conn)
        .await?;
      if exists {
        Err(InvoiceError::StaleWrite {
          id: invoice.id,
          expected_version,
        })
      } else {
        Err(InvoiceError::InvoiceNotFound(invoice.id))
      }
    }
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let pdf = invoice.pdf.as_ref();
    let mut tx = self.pool.begin().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            INSERT INTO invoices (
                id, organization_id, customer_id, invoice_number, invoice_date, due_date,
                status, currency, sub_total, total_tax, grand_total, amount_paid, balance_due,
                notes, pdf_storage_key, pdf_backend, pdf_size_bytes, pdf_generated_at,
                payment_details, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22)
            RETURNING {}
            "#,
      INVOICE_COLUMNS
    ))
    .bind(invoice.id)
    .bind(invoice.organization_id)
    .bind(invoice.customer_id)
    .bind(invoice.invoice_number.value())
    .bind(invoice.invoice_date)
    .bind(invoice.due_date)
    .bind(invoice.status.as_str())
    .bind(invoice.currency.as_str())
    .bind(invoice.sub_total)
    .bind(invoice.total_tax)
    .bind(invoice.grand_total)
    .bind(invoice.amount_paid)
    .bind(invoice.balance_due)
    .bind(&invoice.notes)
    .bind(pdf.map(|p| p.storage_key.as_str()))
    .bind(pdf.map(|p| p.backend.as_str()))
    .bind(pdf.map(|p| p.size_bytes))
    .bind(pdf.map(|p| p.generated_at))
    .bind(invoice.payment_details.as_ref().map(Json))
    .bind(invoice.version)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_write_error(e, &invoice))?;

    insert_line_items(&mut tx, &invoice.line_items).await?;
    let created = load_invoice(&mut tx, row).await?;
    tx.commit().await?;

    tracing::debug!(invoice_id = %created.id, "Invoice persisted");
    Ok(created)
  }

  async fn update(&self, invoice: Invoice, expected_version: i64) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    let row = write_invoice_header(&mut tx, &invoice, expected_version).await?;

    // Line items are always replaced wholesale
    sqlx::query("DELETE FROM invoice_line_items WHERE invoice_id = $1")
      .bind(invoice.id)
      .execute(&mut *tx)
      .await?;
    insert_line_items(&mut tx, &invoice.line_items).await?;

    let updated = load_invoice(&mut tx, row).await?;
    tx.commit().await?;

    Ok(updated)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let mut conn = self.pool.acquire().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {} FROM invoices WHERE id = $1",
      INVOICE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
      Some(row) => Ok(Some(load_invoice(&mut conn, row).await?)),
      None => Ok(None),
    }
  }

  async fn find_by_organization(
    &self,
    organization_id: Uuid,
    filter: InvoiceFilter,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    let mut conn = self.pool.acquire().await?;

    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            SELECT {}
            FROM invoices
            WHERE organization_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR customer_id = $3)
            ORDER BY invoice_date DESC, created_at DESC
            "#,
      INVOICE_COLUMNS
    ))
    .bind(organization_id)
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.customer_id)
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut items = load_line_items(&mut conn, &ids).await?;

    rows
      .into_iter()
      .map(|row| {
        let line_items = items.remove(&row.id).unwrap_or_default();
        row.into_invoice(line_items)
      })
      .collect()
  }

  async fn exists_by_number(
    &self,
    invoice_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, InvoiceError> {
    let exists: bool = sqlx::query_scalar(
      r#"
            SELECT EXISTS(
                SELECT 1 FROM invoices
                WHERE invoice_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
    )
    .bind(invoice_number)
    .bind(exclude_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(exists)
  }

  async fn next_sequence_value(&self) -> Result<i64, InvoiceError> {
    let value: i64 = sqlx::query_scalar("SELECT nextval('invoice_number_seq')")
      .fetch_one(&self.pool)
      .await?;

    Ok(value)
  }

  async fn delete(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {} FROM invoices WHERE id = $1 FOR UPDATE",
      INVOICE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
      return Ok(None);
    };
    let invoice = load_invoice(&mut tx, row).await?;

    // Line items and payments cascade
    sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    Ok(Some(invoice))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::contact::ContactRepository;
  use crate::domain::invoice::{InvoiceHeaderUpdate, TaxCalculator};
  use crate::domain::testing::{sample_customer, sample_invoice};
  use crate::infrastructure::persistence::postgres::PostgresContactRepository;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;
  use rust_decimal_macros::dec;

  async fn seeded(pool: &PgPool) -> (Uuid, Uuid) {
    let org_id = Uuid::new_v4();
    let customer = PostgresContactRepository::new(pool.clone())
      .create(sample_customer(org_id))
      .await
      .unwrap();
    (org_id, customer.id)
  }

  #[tokio::test]
  async fn test_create_and_refetch_keeps_financials() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool.clone());
    let (org_id, customer_id) = seeded(&pool).await;

    let invoice = sample_invoice(org_id, customer_id);
    let created = repo.create(invoice.clone()).await.unwrap();
    let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.totals(), invoice.totals());
    assert_eq!(fetched.grand_total, dec!(406.00));
    assert_eq!(fetched.balance_due, dec!(406.00));
    assert_eq!(fetched.version, 1);
    assert_eq!(fetched.line_items.len(), 2);
    assert_eq!(fetched.line_items[0].position, invoice.line_items[0].position);
    let calculator = TaxCalculator::default();
    assert!(fetched.line_items.iter().all(|i| i.is_consistent(&calculator)));
  }

  #[tokio::test]
  async fn test_update_is_compare_and_swap() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool.clone());
    let (org_id, customer_id) = seeded(&pool).await;

    let created = repo
      .create(sample_invoice(org_id, customer_id))
      .await
      .unwrap();

    let mut edited = created.clone();
    edited
      .update_header(InvoiceHeaderUpdate {
        notes: Some("Thanks".to_string()),
        ..Default::default()
      })
      .unwrap();
    let updated = repo.update(edited.clone(), 1).await.unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.notes.as_deref(), Some("Thanks"));
    assert_eq!(updated.line_items.len(), 2);

    let stale = repo.update(edited, 1).await;
    assert!(matches!(
      stale,
      Err(InvoiceError::StaleWrite { expected_version: 1, .. })
    ));
  }

  #[tokio::test]
  async fn test_duplicate_number_is_rejected() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool.clone());
    let (org_id, customer_id) = seeded(&pool).await;

    let first = repo
      .create(sample_invoice(org_id, customer_id))
      .await
      .unwrap();
    let mut second = sample_invoice(org_id, customer_id);
    second.invoice_number = first.invoice_number.clone();

    let result = repo.create(second).await;
    assert!(matches!(result, Err(InvoiceError::InvoiceNumberAlreadyExists(_))));
    assert!(
      repo
        .exists_by_number(first.invoice_number.value(), None)
        .await
        .unwrap()
    );
    assert!(
      !repo
        .exists_by_number(first.invoice_number.value(), Some(first.id))
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  async fn test_filters_sequence_and_delete() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool.clone());
    let (org_id, customer_id) = seeded(&pool).await;

    let older = sample_invoice(org_id, customer_id);
    let mut newer = sample_invoice(org_id, customer_id);
    newer.invoice_date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    newer.status = InvoiceStatus::Sent;
    repo.create(older.clone()).await.unwrap();
    repo.create(newer.clone()).await.unwrap();

    let all = repo
      .find_by_organization(org_id, InvoiceFilter::default())
      .await
      .unwrap();
    assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), vec![newer.id, older.id]);
    assert!(all.iter().all(|i| i.line_items.len() == 2));

    let sent = repo
      .find_by_organization(
        org_id,
        InvoiceFilter {
          status: Some(InvoiceStatus::Sent),
          customer_id: None,
        },
      )
      .await
      .unwrap();
    assert_eq!(sent.len(), 1);

    let first = repo.next_sequence_value().await.unwrap();
    assert_eq!(repo.next_sequence_value().await.unwrap(), first + 1);

    let deleted = repo.delete(older.id).await.unwrap().unwrap();
    assert_eq!(deleted.id, older.id);
    assert!(repo.find_by_id(older.id).await.unwrap().is_none());
    assert!(repo.delete(older.id).await.unwrap().is_none());
  }
}
