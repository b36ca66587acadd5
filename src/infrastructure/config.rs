use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::env;

use crate::domain::common::Currency;
use crate::domain::invoice::{FixedTaxMode, InvoicingPolicy, StorageBackend, TaxCalculator};

fn default_run_mode() -> String {
  env::var("RUN_MODE").unwrap_or_else(|_| "development".into())
}

fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_number_prefix() -> String {
  "INV-".to_string()
}

fn default_number_width() -> usize {
  6
}

fn default_currency() -> Currency {
  Currency::USD
}

fn default_filesystem_root() -> String {
  "./data/documents".to_string()
}

fn default_template_dir() -> String {
  "templates".to_string()
}

fn default_gateway_base_url() -> String {
  "https://api.razorpay.com/v1".to_string()
}

fn default_gateway_timeout() -> u64 {
  10
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  #[serde(default)]
  pub invoicing: InvoicingConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub pdf: PdfConfig,
  #[serde(default)]
  pub gateway: Option<GatewayConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  #[serde(default = "default_run_mode")]
  pub run_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

/// Numbering and tax rules applied when invoices are built
#[derive(Debug, Clone, Deserialize)]
pub struct InvoicingConfig {
  #[serde(default = "default_number_prefix")]
  pub number_prefix: String,
  #[serde(default = "default_number_width")]
  pub number_width: usize,
  #[serde(default = "default_currency")]
  pub default_currency: Currency,
  #[serde(default)]
  pub fixed_tax_mode: FixedTaxMode,
}

impl Default for InvoicingConfig {
  fn default() -> Self {
    Self {
      number_prefix: default_number_prefix(),
      number_width: default_number_width(),
      default_currency: default_currency(),
      fixed_tax_mode: FixedTaxMode::default(),
    }
  }
}

impl InvoicingConfig {
  pub fn policy(&self) -> InvoicingPolicy {
    InvoicingPolicy {
      number_prefix: self.number_prefix.clone(),
      number_width: self.number_width,
      default_currency: self.default_currency,
      calculator: TaxCalculator::new(self.fixed_tax_mode),
    }
  }
}

/// Where generated invoice documents are kept
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: StorageBackend,
  #[serde(default = "default_filesystem_root")]
  pub filesystem_root: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: StorageBackend::default(),
      filesystem_root: default_filesystem_root(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
  #[serde(default)]
  pub wkhtmltopdf_path: Option<String>,
  #[serde(default = "default_template_dir")]
  pub template_dir: String,
}

impl Default for PdfConfig {
  fn default() -> Self {
    Self {
      wkhtmltopdf_path: None,
      template_dir: default_template_dir(),
    }
  }
}

/// Razorpay-style payment gateway credentials
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
  pub enabled: bool,
  pub key_id: String,
  pub key_secret: Secret<String>,
  #[serde(default = "default_gateway_base_url")]
  pub api_base_url: String,
  #[serde(default = "default_gateway_timeout")]
  pub timeout_seconds: u64,
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Later sources override earlier ones:
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with the BILLBOOK_ prefix, `__` between sections,
  ///    e.g. `BILLBOOK_SERVER__PORT=8080` or `BILLBOOK_STORAGE__BACKEND=filesystem`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = default_run_mode();

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .set_default("server.run_mode", run_mode)?
      .add_source(
        Environment::with_prefix("BILLBOOK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }

  pub fn is_development(&self) -> bool {
    self.server.run_mode == "development"
  }

  /// Gateway settings, only when the integration is switched on
  pub fn active_gateway(&self) -> Option<&GatewayConfig> {
    self.gateway.as_ref().filter(|g| g.enabled)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use secrecy::ExposeSecret;

  #[test]
  fn test_minimal_config_uses_defaults() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            run_mode = "production"

            [database]
            url = "postgres://localhost/billbook"
            max_connections = 5
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.server.port, 8080);
    assert!(!config.is_development());
    assert_eq!(config.database.connect_timeout_seconds, 5);
    assert_eq!(config.database.acquire_timeout_seconds, 3);
    assert_eq!(config.invoicing.number_prefix, "INV-");
    assert_eq!(config.invoicing.number_width, 6);
    assert_eq!(config.invoicing.default_currency, Currency::USD);
    assert_eq!(config.invoicing.fixed_tax_mode, FixedTaxMode::PerLine);
    assert_eq!(config.storage.backend, StorageBackend::Database);
    assert_eq!(config.pdf.template_dir, "templates");
    assert!(config.active_gateway().is_none());
  }

  #[test]
  fn test_full_config() {
    let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            run_mode = "development"

            [database]
            url = "postgres://localhost/billbook"
            max_connections = 10

            [invoicing]
            number_prefix = "BB/"
            number_width = 4
            default_currency = "INR"
            fixed_tax_mode = "per_unit"

            [storage]
            backend = "filesystem"
            filesystem_root = "/var/lib/billbook"

            [pdf]
            wkhtmltopdf_path = "/usr/local/bin/wkhtmltopdf"

            [gateway]
            enabled = true
            key_id = "rzp_test_abc"
            key_secret = "shh"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert!(config.is_development());
    assert_eq!(config.invoicing.default_currency, Currency::INR);
    assert_eq!(config.invoicing.fixed_tax_mode, FixedTaxMode::PerUnit);
    let policy = config.invoicing.policy();
    assert_eq!(policy.number_prefix, "BB/");
    assert_eq!(policy.calculator.fixed_tax_mode(), FixedTaxMode::PerUnit);
    assert_eq!(config.storage.backend, StorageBackend::Filesystem);
    assert_eq!(config.storage.filesystem_root, "/var/lib/billbook");
    let gateway = config.active_gateway().expect("gateway enabled");
    assert_eq!(gateway.key_secret.expose_secret(), "shh");
    assert_eq!(gateway.api_base_url, "https://api.razorpay.com/v1");
    assert_eq!(gateway.timeout_seconds, 10);
  }

  #[test]
  fn test_disabled_gateway_is_ignored() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/billbook"
            max_connections = 5

            [gateway]
            enabled = false
            key_id = "rzp_test_abc"
            key_secret = "shh"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");
    assert!(config.gateway.is_some());
    assert!(config.active_gateway().is_none());
  }
}
