use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::domain::catalog::TaxComputation;
use crate::domain::invoice::{InvoiceDocument, InvoiceError};

pub const INVOICE_TEMPLATE: &str = "invoice.html.tera";

#[derive(Debug, Serialize)]
struct PartyView {
  name: String,
  email: Option<String>,
  phone: Option<String>,
  address_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LineView {
  position: i32,
  name: String,
  quantity: u32,
  unit_price: String,
  tax_label: Option<String>,
  subtotal: String,
  tax_amount: String,
  total: String,
}

#[derive(Debug, Serialize)]
struct InvoiceView {
  number: String,
  invoice_date: String,
  due_date: String,
  status: &'static str,
  currency: &'static str,
  currency_symbol: &'static str,
  customer: PartyView,
  lines: Vec<LineView>,
  sub_total: String,
  total_tax: String,
  grand_total: String,
  amount_paid: String,
  balance_due: String,
  notes: Option<String>,
}

fn amount(value: Decimal) -> String {
  format!("{:.2}", value)
}

impl From<&InvoiceDocument> for InvoiceView {
  fn from(document: &InvoiceDocument) -> Self {
    let invoice = &document.invoice;
    let customer = &document.customer;

    let lines = invoice
      .line_items
      .iter()
      .map(|item| LineView {
        position: item.position,
        name: item.product_name.value().to_string(),
        quantity: item.quantity.value(),
        unit_price: amount(item.unit_price.value()),
        tax_label: item.tax.as_ref().map(|tax| match tax.computation {
          TaxComputation::Percentage => format!("{} ({}%)", tax.name, tax.rate.normalize()),
          TaxComputation::Fixed => format!("{} (fixed {})", tax.name, amount(tax.rate)),
        }),
        subtotal: amount(item.subtotal),
        tax_amount: amount(item.tax_amount),
        total: amount(item.total),
      })
      .collect();

    Self {
      number: invoice.invoice_number.value().to_string(),
      invoice_date: invoice.invoice_date.format("%Y-%m-%d").to_string(),
      due_date: invoice.due_date.format("%Y-%m-%d").to_string(),
      status: invoice.status.as_str(),
      currency: invoice.currency.as_str(),
      currency_symbol: invoice.currency.symbol(),
      customer: PartyView {
        name: customer.name.value().to_string(),
        email: customer.email.as_ref().map(|e| e.as_str().to_string()),
        phone: customer.phone.clone(),
        address_lines: customer
          .address
          .as_ref()
          .map(|a| a.format_multiline().lines().map(str::to_string).collect())
          .unwrap_or_default(),
      },
      lines,
      sub_total: amount(invoice.sub_total),
      total_tax: amount(invoice.total_tax),
      grand_total: amount(invoice.grand_total),
      amount_paid: amount(invoice.amount_paid),
      balance_due: amount(invoice.balance_due),
      notes: invoice.notes.clone(),
    }
  }
}

/// Renders invoice documents to HTML with Tera
#[derive(Clone)]
pub struct InvoiceHtmlRenderer {
  tera: Arc<Tera>,
}

impl InvoiceHtmlRenderer {
  /// Loads every `*.html.tera` below `template_dir`
  pub fn from_dir(template_dir: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(&format!("{}/**/*.html.tera", template_dir))?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    if !tera.get_template_names().any(|name| name == INVOICE_TEMPLATE) {
      return Err(tera::Error::template_not_found(INVOICE_TEMPLATE));
    }

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  pub fn render(&self, document: &InvoiceDocument) -> Result<String, InvoiceError> {
    let mut context = Context::new();
    context.insert("invoice", &InvoiceView::from(document));

    self.tera.render(INVOICE_TEMPLATE, &context).map_err(|e| {
      InvoiceError::PdfGenerationFailed(format!("Failed to render invoice template: {}", e))
    })
  }
}
