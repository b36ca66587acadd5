use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{
      ApiResponse, CreateProductRequest, CreateTaxRequest, OrganizationQuery, ProductRequest,
      TaxRequest,
    },
    errors::ApiError,
  },
  application::catalog::*,
};

/// POST /api/v1/taxes
pub async fn create_tax_handler(
  request: web::Json<CreateTaxRequest>,
  use_case: web::Data<Arc<CreateTaxUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let tax = use_case
    .execute(CreateTaxCommand {
      organization_id: request.organization_id,
      fields: request.tax.into(),
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Tax created", tax)))
}

/// GET /api/v1/taxes?organization_id=..
pub async fn list_taxes_handler(
  query: web::Query<OrganizationQuery>,
  use_case: web::Data<Arc<ListTaxesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let taxes = use_case.execute(query.organization_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Taxes retrieved", taxes)))
}

/// GET /api/v1/taxes/{id}
pub async fn get_tax_handler(
  tax_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetTaxUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let tax = use_case.execute(tax_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Tax retrieved", tax)))
}

/// PUT /api/v1/taxes/{id}
pub async fn update_tax_handler(
  tax_id: web::Path<Uuid>,
  request: web::Json<TaxRequest>,
  use_case: web::Data<Arc<UpdateTaxUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let tax = use_case
    .execute(UpdateTaxCommand {
      tax_id: tax_id.into_inner(),
      fields: request.into_inner().into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Tax updated", tax)))
}

/// DELETE /api/v1/taxes/{id}
pub async fn delete_tax_handler(
  tax_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteTaxUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let tax = use_case.execute(tax_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Tax deleted", tax)))
}

/// POST /api/v1/products
pub async fn create_product_handler(
  request: web::Json<CreateProductRequest>,
  use_case: web::Data<Arc<CreateProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let product = use_case
    .execute(CreateProductCommand {
      organization_id: request.organization_id,
      fields: request.product.into(),
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Product created", product)))
}

/// GET /api/v1/products?organization_id=..
pub async fn list_products_handler(
  query: web::Query<OrganizationQuery>,
  use_case: web::Data<Arc<ListProductsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let products = use_case.execute(query.organization_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Products retrieved", products)))
}

/// GET /api/v1/products/{id}
pub async fn get_product_handler(
  product_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let product = use_case.execute(product_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Product retrieved", product)))
}

/// PUT /api/v1/products/{id}
pub async fn update_product_handler(
  product_id: web::Path<Uuid>,
  request: web::Json<ProductRequest>,
  use_case: web::Data<Arc<UpdateProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let product = use_case
    .execute(UpdateProductCommand {
      product_id: product_id.into_inner(),
      fields: request.into_inner().into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Product updated", product)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product_handler(
  product_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let product = use_case.execute(product_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Product deleted", product)))
}
