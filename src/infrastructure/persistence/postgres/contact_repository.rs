use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::common::Name;
use crate::domain::contact::{
  Contact, ContactAddress, ContactError, ContactKind, ContactRepository, EmailAddress,
};

const EMAIL_UNIQUE_INDEX: &str = "contacts_organization_email_unique";

#[derive(Debug, FromRow)]
struct ContactRow {
  id: Uuid,
  organization_id: Uuid,
  name: String,
  email: Option<String>,
  phone: Option<String>,
  street: Option<String>,
  city: Option<String>,
  state: Option<String>,
  postal_code: Option<String>,
  country: Option<String>,
  kind: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
  type Error = ContactError;

  fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
    Ok(Contact {
      id: row.id,
      organization_id: row.organization_id,
      name: Name::new(row.name)?,
      email: row.email.map(EmailAddress::new).transpose()?,
      phone: row.phone,
      address: ContactAddress::new(
        row.street,
        row.city,
        row.state,
        row.postal_code,
        row.country,
      ),
      kind: ContactKind::from_str(&row.kind)?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn map_write_error(e: sqlx::Error, email: Option<&str>) -> ContactError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(EMAIL_UNIQUE_INDEX)
    {
      return ContactError::EmailAlreadyExists(email.unwrap_or_default().to_string());
    }
  }
  ContactError::Database(e)
}

pub struct PostgresContactRepository {
  pool: PgPool,
}

impl PostgresContactRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
  async fn create(&self, contact: Contact) -> Result<Contact, ContactError> {
    let email = contact.email.as_ref().map(|e| e.as_str().to_string());
    let address = contact.address.clone().unwrap_or_default();

    let row = sqlx::query_as::<_, ContactRow>(
      r#"
            INSERT INTO contacts (
                id, organization_id, name, email, phone, street, city, state,
                postal_code, country, kind, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, organization_id, name, email, phone, street, city, state,
                      postal_code, country, kind, created_at, updated_at
            "#,
    )
    .bind(contact.id)
    .bind(contact.organization_id)
    .bind(contact.name.value())
    .bind(&email)
    .bind(&contact.phone)
    .bind(address.street)
    .bind(address.city)
    .bind(address.state)
    .bind(address.postal_code)
    .bind(address.country)
    .bind(contact.kind.as_str())
    .bind(contact.created_at)
    .bind(contact.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_write_error(e, email.as_deref()))?;

    row.try_into()
  }

  async fn update(&self, contact: Contact) -> Result<Contact, ContactError> {
    let email = contact.email.as_ref().map(|e| e.as_str().to_string());
    let address = contact.address.clone().unwrap_or_default();

    let row = sqlx::query_as::<_, ContactRow>(
      r#"
            UPDATE contacts
            SET name = $2, email = $3, phone = $4, street = $5, city = $6, state = $7,
                postal_code = $8, country = $9, kind = $10, updated_at = $11
            WHERE id = $1
            RETURNING id, organization_id, name, email, phone, street, city, state,
                      postal_code, country, kind, created_at, updated_at
            "#,
    )
    .bind(contact.id)
    .bind(contact.name.value())
    .bind(&email)
    .bind(&contact.phone)
    .bind(address.street)
    .bind(address.city)
    .bind(address.state)
    .bind(address.postal_code)
    .bind(address.country)
    .bind(contact.kind.as_str())
    .bind(contact.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| map_write_error(e, email.as_deref()))?
    .ok_or(ContactError::NotFound(contact.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, ContactError> {
    let row = sqlx::query_as::<_, ContactRow>(
      r#"
            SELECT id, organization_id, name, email, phone, street, city, state,
                   postal_code, country, kind, created_at, updated_at
            FROM contacts
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
    kind: Option<ContactKind>,
  ) -> Result<Vec<Contact>, ContactError> {
    // "both" contacts show up under either filter
    let rows = sqlx::query_as::<_, ContactRow>(
      r#"
            SELECT id, organization_id, name, email, phone, street, city, state,
                   postal_code, country, kind, created_at, updated_at
            FROM contacts
            WHERE organization_id = $1
              AND ($2::text IS NULL OR kind = $2 OR kind = 'both')
            ORDER BY name ASC
            "#,
    )
    .bind(organization_id)
    .bind(kind.map(|k| k.as_str()))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn exists_by_email(
    &self,
    organization_id: Uuid,
    email: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ContactError> {
    let exists: bool = sqlx::query_scalar(
      r#"
            SELECT EXISTS(
                SELECT 1 FROM contacts
                WHERE organization_id = $1 AND email = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
    )
    .bind(organization_id)
    .bind(email)
    .bind(exclude_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(exists)
  }

  async fn has_invoices(&self, id: Uuid) -> Result<bool, ContactError> {
    let exists: bool =
      sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoices WHERE customer_id = $1)")
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn delete(&self, id: Uuid) -> Result<(), ContactError> {
    sqlx::query("DELETE FROM contacts WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
          ContactError::InUse(id)
        }
        _ => ContactError::Database(e),
      })?;

    Ok(())
  }
}
