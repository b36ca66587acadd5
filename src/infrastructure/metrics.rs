use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
  pub static ref REGISTRY: Registry = Registry::new();
  pub static ref INVOICES_CREATED: IntCounter =
    IntCounter::new("billbook_invoices_created_total", "Invoices created")
      .expect("metric can be created");
  pub static ref INVOICE_STATUS_TRANSITIONS: IntCounterVec = IntCounterVec::new(
    Opts::new(
      "billbook_invoice_status_transitions_total",
      "Invoice status changes by target status"
    ),
    &["status"]
  )
  .expect("metric can be created");
  pub static ref PAYMENTS_RECORDED: IntCounterVec = IntCounterVec::new(
    Opts::new("billbook_payments_recorded_total", "Payments recorded by method"),
    &["method"]
  )
  .expect("metric can be created");
  pub static ref INVOICE_DOCUMENTS_GENERATED: IntCounter = IntCounter::new(
    "billbook_invoice_documents_generated_total",
    "Invoice PDFs generated and stored"
  )
  .expect("metric can be created");
}

/// Registers all collectors; safe to call more than once
pub fn register_metrics() {
  let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
    Box::new(INVOICES_CREATED.clone()),
    Box::new(INVOICE_STATUS_TRANSITIONS.clone()),
    Box::new(PAYMENTS_RECORDED.clone()),
    Box::new(INVOICE_DOCUMENTS_GENERATED.clone()),
  ];

  for collector in collectors {
    if let Err(e) = REGISTRY.register(collector) {
      tracing::debug!("Metric already registered: {}", e);
    }
  }
}

/// Prometheus text exposition of the application registry
pub fn gather() -> Result<String, prometheus::Error> {
  let mut buffer = Vec::new();
  TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
  String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_gather_exposes_counters() {
    register_metrics();
    register_metrics();
    INVOICES_CREATED.inc();
    PAYMENTS_RECORDED.with_label_values(&["cash"]).inc();

    let text = gather().unwrap();
    assert!(text.contains("billbook_invoices_created_total"));
    assert!(text.contains("billbook_payments_recorded_total{method=\"cash\"}"));
  }
}
