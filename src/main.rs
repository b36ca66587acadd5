use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billbook::{
  adapters::http::{
    ApiRouteDependencies, ApplicationServices, RequestIdMiddleware, configure_api_routes,
    configure_system_routes, expose_upstream_details,
  },
  domain::catalog::CatalogService,
  domain::contact::ContactService,
  domain::invoice::{InvoiceDocumentService, InvoiceService, InvoiceServiceDependencies},
  domain::payment::{GatewayIntegration, PaymentService, PaymentSignatureVerifier},
  domain::report::ReportService,
  infrastructure::{
    config::Config,
    gateway::RazorpayGateway,
    metrics,
    pdf::{InvoiceHtmlRenderer, WkHtmlToPdfGenerator},
    persistence::postgres::{
      PostgresContactRepository, PostgresInvoiceRepository, PostgresPaymentRepository,
      PostgresProductRepository, PostgresTaxRepository,
    },
    storage::BlobStoreFactory,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "billbook=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Billbook");

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!(run_mode = %config.server.run_mode, "Configuration loaded");

  expose_upstream_details(config.is_development());
  metrics::register_metrics();

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    std::io::Error::other(format!("Failed to connect to database: {}", e))
  })?;
  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run migrations: {}", e);
      std::io::Error::other(format!("Failed to run migrations: {}", e))
    })?;
  tracing::info!("Database migrations applied");

  // Repositories
  let contact_repo = Arc::new(PostgresContactRepository::new(db_pool.clone()));
  let tax_repo = Arc::new(PostgresTaxRepository::new(db_pool.clone()));
  let product_repo = Arc::new(PostgresProductRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let payment_repo = Arc::new(PostgresPaymentRepository::new(db_pool.clone()));

  let blob_store = BlobStoreFactory::create(&config.storage, db_pool.clone());
  tracing::info!(backend = %blob_store.backend().as_str(), "Document storage initialized");

  let renderer = InvoiceHtmlRenderer::from_dir(&config.pdf.template_dir).map_err(|e| {
    tracing::error!("Failed to load invoice templates: {}", e);
    std::io::Error::other(format!("Failed to load invoice templates: {}", e))
  })?;
  let pdf_generator = Arc::new(WkHtmlToPdfGenerator::new(
    renderer,
    config.pdf.wkhtmltopdf_path.clone(),
  ));

  let gateway = match config.active_gateway() {
    Some(gateway_config) => {
      let gateway = RazorpayGateway::new(gateway_config).map_err(|e| {
        tracing::error!("Failed to initialize payment gateway: {}", e);
        std::io::Error::other(format!("Failed to initialize payment gateway: {}", e))
      })?;
      tracing::info!(key_id = %gateway_config.key_id, "Payment gateway enabled");
      Some(GatewayIntegration {
        gateway: Arc::new(gateway),
        verifier: PaymentSignatureVerifier::new(gateway_config.key_secret.clone()),
      })
    }
    None => {
      tracing::warn!("Payment gateway not configured, online checkout disabled");
      None
    }
  };

  // Domain services
  let services = ApplicationServices {
    contact_service: Arc::new(ContactService::new(contact_repo.clone())),
    catalog_service: Arc::new(CatalogService::new(tax_repo.clone(), product_repo.clone())),
    invoice_service: Arc::new(InvoiceService::new(InvoiceServiceDependencies {
      invoice_repo: invoice_repo.clone(),
      contact_repo: contact_repo.clone(),
      tax_repo,
      product_repo,
      policy: config.invoicing.policy(),
    })),
    document_service: Arc::new(InvoiceDocumentService::new(
      invoice_repo.clone(),
      contact_repo.clone(),
      pdf_generator,
      blob_store,
    )),
    payment_service: Arc::new(PaymentService::new(
      invoice_repo.clone(),
      payment_repo.clone(),
      gateway,
    )),
    report_service: Arc::new(ReportService::new(
      contact_repo,
      invoice_repo,
      payment_repo,
      config.invoicing.default_currency,
    )),
  };
  let api_dependencies = ApiRouteDependencies::new(services);

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let api_dependencies = api_dependencies.clone();
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .configure(configure_system_routes)
      .service(
        web::scope("/api/v1").configure(move |cfg| configure_api_routes(cfg, api_dependencies)),
      )
  })
  .bind((server_host, server_port))?
  .run()
  .await
}
