use actix_web::{HttpRequest, error, web};
use std::sync::Arc;

use crate::application::catalog::{
  CreateProductUseCase, CreateTaxUseCase, DeleteProductUseCase, DeleteTaxUseCase,
  GetProductUseCase, GetTaxUseCase, ListProductsUseCase, ListTaxesUseCase, UpdateProductUseCase,
  UpdateTaxUseCase,
};
use crate::application::contact::{
  CreateContactUseCase, DeleteContactUseCase, GetContactUseCase, ListContactsUseCase,
  UpdateContactUseCase,
};
use crate::application::invoice::{
  ChangeInvoiceStatusUseCase, CreateInvoiceUseCase, DeleteInvoiceUseCase,
  DownloadInvoicePdfUseCase, GenerateInvoicePdfUseCase, GetInvoiceDetailsUseCase,
  ListInvoicesUseCase, UpdateInvoiceUseCase,
};
use crate::application::payment::{
  CreatePaymentOrderUseCase, ListPaymentsUseCase, RecordPaymentUseCase,
  VerifyGatewayPaymentUseCase,
};
use crate::application::report::{ExportPartnerLedgerUseCase, GetPartnerLedgerUseCase};
use crate::domain::catalog::CatalogService;
use crate::domain::contact::ContactService;
use crate::domain::invoice::{InvoiceDocumentService, InvoiceService};
use crate::domain::payment::PaymentService;
use crate::domain::report::ReportService;

use super::errors::ApiError;
use super::handlers::{catalog, contacts, invoices, payments, reports, system};

/// Domain services the API is built from
#[derive(Clone)]
pub struct ApplicationServices {
  pub contact_service: Arc<ContactService>,
  pub catalog_service: Arc<CatalogService>,
  pub invoice_service: Arc<InvoiceService>,
  pub document_service: Arc<InvoiceDocumentService>,
  pub payment_service: Arc<PaymentService>,
  pub report_service: Arc<ReportService>,
}

/// Every use case reachable over HTTP
#[derive(Clone)]
pub struct ApiRouteDependencies {
  // Contacts
  pub create_contact_use_case: Arc<CreateContactUseCase>,
  pub list_contacts_use_case: Arc<ListContactsUseCase>,
  pub get_contact_use_case: Arc<GetContactUseCase>,
  pub update_contact_use_case: Arc<UpdateContactUseCase>,
  pub delete_contact_use_case: Arc<DeleteContactUseCase>,
  // Catalog
  pub create_tax_use_case: Arc<CreateTaxUseCase>,
  pub list_taxes_use_case: Arc<ListTaxesUseCase>,
  pub get_tax_use_case: Arc<GetTaxUseCase>,
  pub update_tax_use_case: Arc<UpdateTaxUseCase>,
  pub delete_tax_use_case: Arc<DeleteTaxUseCase>,
  pub create_product_use_case: Arc<CreateProductUseCase>,
  pub list_products_use_case: Arc<ListProductsUseCase>,
  pub get_product_use_case: Arc<GetProductUseCase>,
  pub update_product_use_case: Arc<UpdateProductUseCase>,
  pub delete_product_use_case: Arc<DeleteProductUseCase>,
  // Invoices
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub get_invoice_details_use_case: Arc<GetInvoiceDetailsUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub change_invoice_status_use_case: Arc<ChangeInvoiceStatusUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
  pub generate_invoice_pdf_use_case: Arc<GenerateInvoicePdfUseCase>,
  pub download_invoice_pdf_use_case: Arc<DownloadInvoicePdfUseCase>,
  // Payments
  pub record_payment_use_case: Arc<RecordPaymentUseCase>,
  pub list_payments_use_case: Arc<ListPaymentsUseCase>,
  pub create_payment_order_use_case: Arc<CreatePaymentOrderUseCase>,
  pub verify_gateway_payment_use_case: Arc<VerifyGatewayPaymentUseCase>,
  // Reports
  pub partner_ledger_use_case: Arc<GetPartnerLedgerUseCase>,
  pub export_partner_ledger_use_case: Arc<ExportPartnerLedgerUseCase>,
}

impl ApiRouteDependencies {
  pub fn new(services: ApplicationServices) -> Self {
    let ApplicationServices {
      contact_service,
      catalog_service,
      invoice_service,
      document_service,
      payment_service,
      report_service,
    } = services;

    Self {
      create_contact_use_case: Arc::new(CreateContactUseCase::new(contact_service.clone())),
      list_contacts_use_case: Arc::new(ListContactsUseCase::new(contact_service.clone())),
      get_contact_use_case: Arc::new(GetContactUseCase::new(contact_service.clone())),
      update_contact_use_case: Arc::new(UpdateContactUseCase::new(contact_service.clone())),
      delete_contact_use_case: Arc::new(DeleteContactUseCase::new(contact_service)),

      create_tax_use_case: Arc::new(CreateTaxUseCase::new(catalog_service.clone())),
      list_taxes_use_case: Arc::new(ListTaxesUseCase::new(catalog_service.clone())),
      get_tax_use_case: Arc::new(GetTaxUseCase::new(catalog_service.clone())),
      update_tax_use_case: Arc::new(UpdateTaxUseCase::new(catalog_service.clone())),
      delete_tax_use_case: Arc::new(DeleteTaxUseCase::new(catalog_service.clone())),
      create_product_use_case: Arc::new(CreateProductUseCase::new(catalog_service.clone())),
      list_products_use_case: Arc::new(ListProductsUseCase::new(catalog_service.clone())),
      get_product_use_case: Arc::new(GetProductUseCase::new(catalog_service.clone())),
      update_product_use_case: Arc::new(UpdateProductUseCase::new(catalog_service.clone())),
      delete_product_use_case: Arc::new(DeleteProductUseCase::new(catalog_service)),

      create_invoice_use_case: Arc::new(CreateInvoiceUseCase::new(invoice_service.clone())),
      list_invoices_use_case: Arc::new(ListInvoicesUseCase::new(invoice_service.clone())),
      get_invoice_details_use_case: Arc::new(GetInvoiceDetailsUseCase::new(
        invoice_service.clone(),
      )),
      update_invoice_use_case: Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone())),
      change_invoice_status_use_case: Arc::new(ChangeInvoiceStatusUseCase::new(
        invoice_service.clone(),
      )),
      delete_invoice_use_case: Arc::new(DeleteInvoiceUseCase::new(
        invoice_service,
        document_service.clone(),
      )),
      generate_invoice_pdf_use_case: Arc::new(GenerateInvoicePdfUseCase::new(
        document_service.clone(),
      )),
      download_invoice_pdf_use_case: Arc::new(DownloadInvoicePdfUseCase::new(document_service)),

      record_payment_use_case: Arc::new(RecordPaymentUseCase::new(payment_service.clone())),
      list_payments_use_case: Arc::new(ListPaymentsUseCase::new(payment_service.clone())),
      create_payment_order_use_case: Arc::new(CreatePaymentOrderUseCase::new(
        payment_service.clone(),
      )),
      verify_gateway_payment_use_case: Arc::new(VerifyGatewayPaymentUseCase::new(
        payment_service,
      )),

      partner_ledger_use_case: Arc::new(GetPartnerLedgerUseCase::new(report_service.clone())),
      export_partner_ledger_use_case: Arc::new(ExportPartnerLedgerUseCase::new(report_service)),
    }
  }
}

/// Malformed bodies, queries and paths answer with the JSON envelope
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
      error::InternalError::from_response(
        err.to_string(),
        error::ResponseError::error_response(&ApiError::Validation(err.to_string())),
      )
      .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
      error::InternalError::from_response(
        err.to_string(),
        error::ResponseError::error_response(&ApiError::Validation(err.to_string())),
      )
      .into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
      error::InternalError::from_response(
        err.to_string(),
        error::ResponseError::error_response(&ApiError::Validation(err.to_string())),
      )
      .into()
    }));
}

/// Configure the JSON API
///
/// Mount under `/api/v1`:
///
/// - `/contacts`, `/contacts/{id}`
/// - `/taxes`, `/taxes/{id}`, `/products`, `/products/{id}`
/// - `/invoices`, `/invoices/{id}`, `/invoices/{id}/status`, `/invoices/{id}/pdf`
/// - `/invoices/{id}/payments`, `/invoices/{id}/payments/verify`,
///   `/invoices/{id}/payment-orders`
/// - `/reports/partner-ledger`
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiRouteDependencies) {
  extractor_configs(cfg);

  // Store use cases in app data so handlers can access them
  cfg
    .app_data(web::Data::new(deps.create_contact_use_case))
    .app_data(web::Data::new(deps.list_contacts_use_case))
    .app_data(web::Data::new(deps.get_contact_use_case))
    .app_data(web::Data::new(deps.update_contact_use_case))
    .app_data(web::Data::new(deps.delete_contact_use_case))
    .app_data(web::Data::new(deps.create_tax_use_case))
    .app_data(web::Data::new(deps.list_taxes_use_case))
    .app_data(web::Data::new(deps.get_tax_use_case))
    .app_data(web::Data::new(deps.update_tax_use_case))
    .app_data(web::Data::new(deps.delete_tax_use_case))
    .app_data(web::Data::new(deps.create_product_use_case))
    .app_data(web::Data::new(deps.list_products_use_case))
    .app_data(web::Data::new(deps.get_product_use_case))
    .app_data(web::Data::new(deps.update_product_use_case))
    .app_data(web::Data::new(deps.delete_product_use_case))
    .app_data(web::Data::new(deps.create_invoice_use_case))
    .app_data(web::Data::new(deps.list_invoices_use_case))
    .app_data(web::Data::new(deps.get_invoice_details_use_case))
    .app_data(web::Data::new(deps.update_invoice_use_case))
    .app_data(web::Data::new(deps.change_invoice_status_use_case))
    .app_data(web::Data::new(deps.delete_invoice_use_case))
    .app_data(web::Data::new(deps.generate_invoice_pdf_use_case))
    .app_data(web::Data::new(deps.download_invoice_pdf_use_case))
    .app_data(web::Data::new(deps.record_payment_use_case))
    .app_data(web::Data::new(deps.list_payments_use_case))
    .app_data(web::Data::new(deps.create_payment_order_use_case))
    .app_data(web::Data::new(deps.verify_gateway_payment_use_case))
    .app_data(web::Data::new(deps.partner_ledger_use_case))
    .app_data(web::Data::new(deps.export_partner_ledger_use_case));

  cfg
    .service(
      web::resource("/contacts")
        .route(web::post().to(contacts::create_contact_handler))
        .route(web::get().to(contacts::list_contacts_handler)),
    )
    .service(
      web::resource("/contacts/{id}")
        .route(web::get().to(contacts::get_contact_handler))
        .route(web::put().to(contacts::update_contact_handler))
        .route(web::delete().to(contacts::delete_contact_handler)),
    )
    .service(
      web::resource("/taxes")
        .route(web::post().to(catalog::create_tax_handler))
        .route(web::get().to(catalog::list_taxes_handler)),
    )
    .service(
      web::resource("/taxes/{id}")
        .route(web::get().to(catalog::get_tax_handler))
        .route(web::put().to(catalog::update_tax_handler))
        .route(web::delete().to(catalog::delete_tax_handler)),
    )
    .service(
      web::resource("/products")
        .route(web::post().to(catalog::create_product_handler))
        .route(web::get().to(catalog::list_products_handler)),
    )
    .service(
      web::resource("/products/{id}")
        .route(web::get().to(catalog::get_product_handler))
        .route(web::put().to(catalog::update_product_handler))
        .route(web::delete().to(catalog::delete_product_handler)),
    )
    .service(
      web::resource("/invoices")
        .route(web::post().to(invoices::create_invoice_handler))
        .route(web::get().to(invoices::list_invoices_handler)),
    )
    .service(
      web::resource("/invoices/{id}")
        .route(web::get().to(invoices::get_invoice_handler))
        .route(web::put().to(invoices::update_invoice_handler))
        .route(web::delete().to(invoices::delete_invoice_handler)),
    )
    .route(
      "/invoices/{id}/status",
      web::patch().to(invoices::change_invoice_status_handler),
    )
    .service(
      web::resource("/invoices/{id}/pdf")
        .route(web::post().to(invoices::generate_invoice_pdf_handler))
        .route(web::get().to(invoices::download_invoice_pdf_handler)),
    )
    .service(
      web::resource("/invoices/{id}/payments")
        .route(web::post().to(payments::record_payment_handler))
        .route(web::get().to(payments::list_payments_handler)),
    )
    .route(
      "/invoices/{id}/payments/verify",
      web::post().to(payments::verify_payment_handler),
    )
    .route(
      "/invoices/{id}/payment-orders",
      web::post().to(payments::create_payment_order_handler),
    )
    .route(
      "/reports/partner-ledger",
      web::get().to(reports::partner_ledger_handler),
    );
}

/// Liveness and Prometheus scrape endpoints, mounted at the root
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(system::health_handler))
    .route("/metrics", web::get().to(system::metrics_handler));
}
