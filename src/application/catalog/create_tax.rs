use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_tax::TaxDto;
use crate::domain::catalog::{CatalogError, CatalogService, TaxComputation, TaxRate};
use crate::domain::common::Name;

#[derive(Debug, Clone)]
pub struct TaxFields {
  pub name: String,
  pub rate: Decimal,
  pub computation: String,
}

impl TaxFields {
  pub(crate) fn parse(self) -> Result<(Name, TaxRate, TaxComputation), CatalogError> {
    let computation = TaxComputation::from_str(&self.computation)?;
    let rate = TaxRate::new(self.rate, computation)?;
    Ok((Name::new(self.name)?, rate, computation))
  }
}

#[derive(Debug)]
pub struct CreateTaxCommand {
  pub organization_id: Uuid,
  pub fields: TaxFields,
}

pub struct CreateTaxUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateTaxUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateTaxCommand) -> Result<TaxDto, CatalogError> {
    let (name, rate, computation) = command.fields.parse()?;

    let tax = self
      .catalog_service
      .create_tax(command.organization_id, name, rate, computation)
      .await?;

    Ok(tax.into())
  }
}
