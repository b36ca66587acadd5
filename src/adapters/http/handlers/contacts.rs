use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, ContactRequest, CreateContactRequest, ListContactsQuery},
    errors::ApiError,
  },
  application::contact::*,
};

/// Create contact
/// POST /api/v1/contacts
pub async fn create_contact_handler(
  request: web::Json<CreateContactRequest>,
  use_case: web::Data<Arc<CreateContactUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let contact = use_case
    .execute(CreateContactCommand {
      organization_id: request.organization_id,
      fields: request.contact.into(),
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Contact created", contact)))
}

/// List contacts of an organization
/// GET /api/v1/contacts?organization_id=..&kind=..
pub async fn list_contacts_handler(
  query: web::Query<ListContactsQuery>,
  use_case: web::Data<Arc<ListContactsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let response = use_case
    .execute(ListContactsCommand {
      organization_id: query.organization_id,
      kind: query.kind.filter(|k| !k.trim().is_empty()),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Contacts retrieved", response)))
}

/// GET /api/v1/contacts/{id}
pub async fn get_contact_handler(
  contact_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetContactUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let contact = use_case.execute(contact_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact retrieved", contact)))
}

/// PUT /api/v1/contacts/{id}
pub async fn update_contact_handler(
  contact_id: web::Path<Uuid>,
  request: web::Json<ContactRequest>,
  use_case: web::Data<Arc<UpdateContactUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let contact = use_case
    .execute(UpdateContactCommand {
      contact_id: contact_id.into_inner(),
      fields: request.into_inner().into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact updated", contact)))
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete_contact_handler(
  contact_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteContactUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let contact = use_case.execute(contact_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact deleted", contact)))
}
