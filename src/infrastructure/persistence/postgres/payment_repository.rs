use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use super::invoice_repository::{load_invoice, write_invoice_header};
use crate::domain::common::Currency;
use crate::domain::invoice::Invoice;
use crate::domain::payment::{Payment, PaymentError, PaymentMethod, PaymentRepository};

const GATEWAY_PAYMENT_UNIQUE_INDEX: &str = "payments_gateway_payment_unique";

#[derive(Debug, FromRow)]
struct PaymentRow {
  id: Uuid,
  invoice_id: Uuid,
  organization_id: Uuid,
  contact_id: Uuid,
  amount: Decimal,
  currency: String,
  method: String,
  reference: Option<String>,
  gateway_order_id: Option<String>,
  gateway_payment_id: Option<String>,
  paid_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
  type Error = PaymentError;

  fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
    Ok(Payment {
      id: row.id,
      invoice_id: row.invoice_id,
      organization_id: row.organization_id,
      contact_id: row.contact_id,
      amount: row.amount,
      currency: Currency::from_str(&row.currency)?,
      method: PaymentMethod::from_str(&row.method)?,
      reference: row.reference,
      gateway_order_id: row.gateway_order_id,
      gateway_payment_id: row.gateway_payment_id,
      paid_at: row.paid_at,
      created_at: row.created_at,
    })
  }
}

pub struct PostgresPaymentRepository {
  pool: PgPool,
}

impl PostgresPaymentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
  async fn record(
    &self,
    payment: Payment,
    invoice: Invoice,
    expected_version: i64,
  ) -> Result<(Payment, Invoice), PaymentError> {
    let mut tx = self.pool.begin().await?;

    let invoice_row = write_invoice_header(&mut tx, &invoice, expected_version).await?;
    let invoice = load_invoice(&mut tx, invoice_row).await?;

    let row = sqlx::query_as::<_, PaymentRow>(
      r#"
            INSERT INTO payments (
                id, invoice_id, organization_id, contact_id, amount, currency, method,
                reference, gateway_order_id, gateway_payment_id, paid_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, invoice_id, organization_id, contact_id, amount, currency, method,
                      reference, gateway_order_id, gateway_payment_id, paid_at, created_at
            "#,
    )
    .bind(payment.id)
    .bind(payment.invoice_id)
    .bind(payment.organization_id)
    .bind(payment.contact_id)
    .bind(payment.amount)
    .bind(payment.currency.as_str())
    .bind(payment.method.as_str())
    .bind(&payment.reference)
    .bind(&payment.gateway_order_id)
    .bind(&payment.gateway_payment_id)
    .bind(payment.paid_at)
    .bind(payment.created_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
      sqlx::Error::Database(db_err)
        if db_err.code().as_deref() == Some("23505")
          && db_err.constraint() == Some(GATEWAY_PAYMENT_UNIQUE_INDEX) =>
      {
        PaymentError::DuplicateGatewayPayment(payment.gateway_payment_id.clone().unwrap_or_default())
      }
      _ => PaymentError::Database(e),
    })?;

    tx.commit().await?;

    tracing::debug!(
      payment_id = %row.id,
      invoice_id = %invoice.id,
      "Payment persisted"
    );
    Ok((row.try_into()?, invoice))
  }

  async fn find_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<Payment>, PaymentError> {
    let rows = sqlx::query_as::<_, PaymentRow>(
      r#"
            SELECT id, invoice_id, organization_id, contact_id, amount, currency, method,
                   reference, gateway_order_id, gateway_payment_id, paid_at, created_at
            FROM payments
            WHERE invoice_id = $1
            ORDER BY paid_at ASC, created_at ASC
            "#,
    )
    .bind(invoice_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn find_by_contact(&self, contact_id: Uuid) -> Result<Vec<Payment>, PaymentError> {
    let rows = sqlx::query_as::<_, PaymentRow>(
      r#"
            SELECT id, invoice_id, organization_id, contact_id, amount, currency, method,
                   reference, gateway_order_id, gateway_payment_id, paid_at, created_at
            FROM payments
            WHERE contact_id = $1
            ORDER BY paid_at ASC, created_at ASC
            "#,
    )
    .bind(contact_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn exists_by_gateway_payment_id(&self, gateway_payment_id: &str) -> Result<bool, PaymentError> {
    let exists: bool =
      sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE gateway_payment_id = $1)")
        .bind(gateway_payment_id)
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::common::Money;
  use crate::domain::contact::ContactRepository;
  use crate::domain::invoice::{InvoiceError, InvoiceRepository, InvoiceStatus};
  use crate::domain::testing::{sample_customer, sample_invoice};
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;
  use crate::infrastructure::persistence::postgres::{
    PostgresContactRepository, PostgresInvoiceRepository,
  };
  use rust_decimal_macros::dec;

  async fn sent_invoice(pool: &PgPool) -> Invoice {
    let org_id = Uuid::new_v4();
    let customer = PostgresContactRepository::new(pool.clone())
      .create(sample_customer(org_id))
      .await
      .unwrap();
    let mut invoice = sample_invoice(org_id, customer.id);
    invoice.change_status(InvoiceStatus::Sent).unwrap();
    PostgresInvoiceRepository::new(pool.clone())
      .create(invoice)
      .await
      .unwrap()
  }

  fn payment_for(invoice: &Invoice, amount: Decimal, gateway_payment_id: Option<&str>) -> Payment {
    let now = Utc::now();
    Payment {
      id: Uuid::new_v4(),
      invoice_id: invoice.id,
      organization_id: invoice.organization_id,
      contact_id: invoice.customer_id,
      amount,
      currency: invoice.currency,
      method: if gateway_payment_id.is_some() {
        PaymentMethod::Gateway
      } else {
        PaymentMethod::Cash
      },
      reference: None,
      gateway_order_id: gateway_payment_id.map(|_| "order_1".to_string()),
      gateway_payment_id: gateway_payment_id.map(str::to_string),
      paid_at: now,
      created_at: now,
    }
  }

  #[tokio::test]
  async fn test_record_updates_invoice_atomically() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresPaymentRepository::new(pool.clone());
    let invoice = sent_invoice(&pool).await;

    let mut paid = invoice.clone();
    let status = paid
      .apply_payment(&Money::new(dec!(406), paid.currency).unwrap())
      .unwrap();
    assert_eq!(status, InvoiceStatus::Paid);

    let (payment, stored) = repo
      .record(payment_for(&invoice, dec!(406), None), paid, invoice.version)
      .await
      .unwrap();

    assert_eq!(payment.amount, dec!(406.00));
    assert_eq!(stored.balance_due, dec!(0.00));
    assert_eq!(stored.status, InvoiceStatus::Paid);
    assert_eq!(stored.version, invoice.version + 1);
    assert_eq!(repo.find_by_invoice(invoice.id).await.unwrap().len(), 1);
    assert_eq!(
      repo.find_by_contact(invoice.customer_id).await.unwrap().len(),
      1
    );
  }

  #[tokio::test]
  async fn test_stale_invoice_writes_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresPaymentRepository::new(pool.clone());
    let invoice = sent_invoice(&pool).await;

    let mut partially = invoice.clone();
    partially
      .apply_payment(&Money::new(dec!(100), partially.currency).unwrap())
      .unwrap();

    let result = repo
      .record(
        payment_for(&invoice, dec!(100), None),
        partially,
        invoice.version + 5,
      )
      .await;

    assert!(matches!(
      result,
      Err(PaymentError::Invoice(InvoiceError::StaleWrite { .. }))
    ));
    assert!(repo.find_by_invoice(invoice.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_gateway_payment_id_is_unique() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresPaymentRepository::new(pool.clone());
    let invoice = sent_invoice(&pool).await;

    let mut first = invoice.clone();
    first
      .apply_payment(&Money::new(dec!(100), first.currency).unwrap())
      .unwrap();
    let (_, stored) = repo
      .record(
        payment_for(&invoice, dec!(100), Some("pay_1")),
        first,
        invoice.version,
      )
      .await
      .unwrap();
    assert!(repo.exists_by_gateway_payment_id("pay_1").await.unwrap());

    let mut second = stored.clone();
    second
      .apply_payment(&Money::new(dec!(100), second.currency).unwrap())
      .unwrap();
    let result = repo
      .record(
        payment_for(&stored, dec!(100), Some("pay_1")),
        second,
        stored.version,
      )
      .await;

    assert!(matches!(result, Err(PaymentError::DuplicateGatewayPayment(_))));
    // The invoice write rolled back with the payment
    let reloaded = PostgresInvoiceRepository::new(pool)
      .find_by_id(invoice.id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(reloaded.amount_paid, dec!(100.00));
  }
}
