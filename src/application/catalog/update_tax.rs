use std::sync::Arc;
use uuid::Uuid;

use super::create_tax::TaxFields;
use super::get_tax::TaxDto;
use crate::domain::catalog::{CatalogError, CatalogService};

#[derive(Debug)]
pub struct UpdateTaxCommand {
  pub tax_id: Uuid,
  pub fields: TaxFields,
}

pub struct UpdateTaxUseCase {
  catalog_service: Arc<CatalogService>,
}

impl UpdateTaxUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: UpdateTaxCommand) -> Result<TaxDto, CatalogError> {
    let (name, rate, computation) = command.fields.parse()?;

    let tax = self
      .catalog_service
      .update_tax(command.tax_id, name, rate, computation)
      .await?;

    Ok(tax.into())
  }
}
