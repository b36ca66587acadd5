use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{TaxComputation, TaxRate};
use crate::domain::common::{Name, UnitPrice};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: Name,
  pub rate: TaxRate,
  pub computation: TaxComputation,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Tax {
  pub fn new(
    organization_id: Uuid,
    name: Name,
    rate: TaxRate,
    computation: TaxComputation,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      organization_id,
      name,
      rate,
      computation,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(&mut self, name: Name, rate: TaxRate, computation: TaxComputation) {
    self.name = name;
    self.rate = rate;
    self.computation = computation;
    self.updated_at = Utc::now();
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub name: Name,
  pub unit_price: UnitPrice,
  pub tax_id: Option<Uuid>,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductDetails {
  pub name: Name,
  pub unit_price: UnitPrice,
  pub tax_id: Option<Uuid>,
  pub description: Option<String>,
}

impl Product {
  pub fn new(organization_id: Uuid, details: ProductDetails) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      organization_id,
      name: details.name,
      unit_price: details.unit_price,
      tax_id: details.tax_id,
      description: details.description.filter(|d| !d.trim().is_empty()),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(&mut self, details: ProductDetails) {
    self.name = details.name;
    self.unit_price = details.unit_price;
    self.tax_id = details.tax_id;
    self.description = details.description.filter(|d| !d.trim().is_empty());
    self.updated_at = Utc::now();
  }
}
