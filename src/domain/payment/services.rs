use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{GatewayCheckout, Payment, PaymentMethod};
use super::errors::PaymentError;
use super::ports::{PaymentGateway, PaymentRepository};
use super::signature::PaymentSignatureVerifier;
use crate::domain::common::{Money, ValueObjectError};
use crate::domain::invoice::{Invoice, InvoiceError, InvoiceRepository};

pub struct RecordPaymentData {
  pub amount: Decimal,
  pub method: PaymentMethod,
  pub reference: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub expected_version: Option<i64>,
}

/// Ids returned by the gateway checkout once the customer has paid
pub struct GatewayPaymentConfirmation {
  pub order_id: String,
  pub payment_id: String,
  pub signature: String,
}

pub struct GatewayIntegration {
  pub gateway: Arc<dyn PaymentGateway>,
  pub verifier: PaymentSignatureVerifier,
}

pub struct PaymentService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  payment_repo: Arc<dyn PaymentRepository>,
  gateway: Option<GatewayIntegration>,
}

impl PaymentService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    gateway: Option<GatewayIntegration>,
  ) -> Self {
    Self {
      invoice_repo,
      payment_repo,
      gateway,
    }
  }

  /// Manual (cash-on-delivery, transfer, card) payment against an invoice
  pub async fn record_payment(
    &self,
    invoice_id: Uuid,
    data: RecordPaymentData,
  ) -> Result<(Payment, Invoice), PaymentError> {
    if data.method == PaymentMethod::Gateway {
      return Err(
        ValueObjectError::InvalidPaymentMethod(
          "Gateway payments are recorded through signature verification".to_string(),
        )
        .into(),
      );
    }

    let invoice = self.load_invoice(invoice_id, data.expected_version).await?;
    let amount = Money::from_price(data.amount, invoice.currency)?;

    self
      .apply(
        invoice,
        amount,
        PaymentDraft {
          method: data.method,
          reference: data.reference.filter(|r| !r.trim().is_empty()),
          gateway_order_id: None,
          gateway_payment_id: None,
          paid_at: data.paid_at.unwrap_or_else(Utc::now),
        },
      )
      .await
  }

  pub async fn create_gateway_order(&self, invoice_id: Uuid) -> Result<GatewayCheckout, PaymentError> {
    let integration = self.integration()?;
    let invoice = self.load_invoice(invoice_id, None).await?;

    if !invoice.status.accepts_payments() || invoice.balance_due <= Decimal::ZERO {
      return Err(
        InvoiceError::PaymentNotAccepted(format!(
          "Invoice {} has no open balance ({})",
          invoice.invoice_number, invoice.status
        ))
        .into(),
      );
    }

    let amount_minor = invoice.money(invoice.balance_due).to_minor_units()?;
    let order = integration
      .gateway
      .create_order(
        amount_minor,
        invoice.currency.as_str(),
        invoice.invoice_number.value(),
      )
      .await?;

    tracing::info!(
      invoice_id = %invoice_id,
      order_id = %order.id,
      amount_minor = amount_minor,
      "Gateway order created"
    );

    Ok(GatewayCheckout {
      invoice_id,
      key_id: integration.gateway.key_id().to_string(),
      order,
    })
  }

  /// Verifies the checkout signature and records the order amount as a payment
  pub async fn verify_gateway_payment(
    &self,
    invoice_id: Uuid,
    confirmation: GatewayPaymentConfirmation,
  ) -> Result<(Payment, Invoice), PaymentError> {
    let integration = self.integration()?;

    if !integration.verifier.verify(
      &confirmation.order_id,
      &confirmation.payment_id,
      &confirmation.signature,
    ) {
      tracing::warn!(
        invoice_id = %invoice_id,
        order_id = %confirmation.order_id,
        payment_id = %confirmation.payment_id,
        "Payment signature verification failed"
      );
      return Err(PaymentError::InvalidSignature);
    }

    if self
      .payment_repo
      .exists_by_gateway_payment_id(&confirmation.payment_id)
      .await?
    {
      return Err(PaymentError::DuplicateGatewayPayment(confirmation.payment_id));
    }

    let invoice = self.load_invoice(invoice_id, None).await?;
    let order = integration.gateway.fetch_order(&confirmation.order_id).await?;

    if order.receipt.as_deref() != Some(invoice.invoice_number.value()) {
      return Err(PaymentError::OrderMismatch(format!(
        "order {} was not created for invoice {}",
        order.id, invoice.invoice_number
      )));
    }
    if !order.currency.eq_ignore_ascii_case(invoice.currency.as_str()) {
      return Err(PaymentError::OrderMismatch(format!(
        "order currency {} differs from invoice currency {}",
        order.currency, invoice.currency
      )));
    }

    let amount = Money::from_minor_units(order.amount, invoice.currency);
    self
      .apply(
        invoice,
        amount,
        PaymentDraft {
          method: PaymentMethod::Gateway,
          reference: None,
          gateway_order_id: Some(confirmation.order_id),
          gateway_payment_id: Some(confirmation.payment_id),
          paid_at: Utc::now(),
        },
      )
      .await
  }

  pub async fn list_payments(&self, invoice_id: Uuid) -> Result<Vec<Payment>, PaymentError> {
    self.load_invoice(invoice_id, None).await?;
    self.payment_repo.find_by_invoice(invoice_id).await
  }

  fn integration(&self) -> Result<&GatewayIntegration, PaymentError> {
    self.gateway.as_ref().ok_or(PaymentError::GatewayNotConfigured)
  }

  async fn load_invoice(
    &self,
    invoice_id: Uuid,
    expected_version: Option<i64>,
  ) -> Result<Invoice, PaymentError> {
    let invoice = self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

    if let Some(expected) = expected_version {
      if expected != invoice.version {
        return Err(
          InvoiceError::StaleWrite {
            id: invoice_id,
            expected_version: expected,
          }
          .into(),
        );
      }
    }
    Ok(invoice)
  }

  async fn apply(
    &self,
    mut invoice: Invoice,
    amount: Money,
    draft: PaymentDraft,
  ) -> Result<(Payment, Invoice), PaymentError> {
    let version = invoice.version;
    let status = invoice.apply_payment(&amount)?;

    let now = Utc::now();
    let payment = Payment {
      id: Uuid::new_v4(),
      invoice_id: invoice.id,
      organization_id: invoice.organization_id,
      contact_id: invoice.customer_id,
      amount: amount.amount,
      currency: amount.currency,
      method: draft.method,
      reference: draft.reference,
      gateway_order_id: draft.gateway_order_id,
      gateway_payment_id: draft.gateway_payment_id,
      paid_at: draft.paid_at,
      created_at: now,
    };
    invoice.record_payment_details(payment.details());

    let (payment, invoice) = self.payment_repo.record(payment, invoice, version).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      payment_id = %payment.id,
      method = payment.method.as_str(),
      amount = %payment.amount,
      status = %status,
      "Payment recorded"
    );
    Ok((payment, invoice))
  }
}

struct PaymentDraft {
  method: PaymentMethod,
  reference: Option<String>,
  gateway_order_id: Option<String>,
  gateway_payment_id: Option<String>,
  paid_at: DateTime<Utc>,
}
