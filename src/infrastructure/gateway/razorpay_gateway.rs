use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::payment::{GatewayOrder, PaymentError, PaymentGateway};
use crate::infrastructure::config::GatewayConfig;

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
  /// Smallest currency unit (paise for INR)
  amount: u64,
  currency: &'a str,
  receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
  id: String,
  amount: u64,
  currency: String,
  receipt: Option<String>,
  status: String,
}

impl From<RazorpayOrder> for GatewayOrder {
  fn from(order: RazorpayOrder) -> Self {
    GatewayOrder {
      id: order.id,
      amount: order.amount,
      currency: order.currency,
      receipt: order.receipt,
      status: order.status,
    }
  }
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
  error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
  code: String,
  description: String,
}

/// Razorpay Orders API client. Calls are made once; failures surface to the caller.
pub struct RazorpayGateway {
  client: Client,
  key_id: String,
  key_secret: Secret<String>,
  api_base_url: String,
}

impl RazorpayGateway {
  pub fn new(config: &GatewayConfig) -> Result<Self, PaymentError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_seconds))
      .build()
      .map_err(|e| PaymentError::Gateway(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Self {
      client,
      key_id: config.key_id.clone(),
      key_secret: config.key_secret.clone(),
      api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
    })
  }

  async fn read_order(&self, response: reqwest::Response) -> Result<GatewayOrder, PaymentError> {
    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| PaymentError::Gateway(format!("Failed to read gateway response: {}", e)))?;

    tracing::debug!(status = %status, "Gateway response received");

    if status.is_success() {
      let order: RazorpayOrder = serde_json::from_str(&body)
        .map_err(|e| PaymentError::Gateway(format!("Unexpected gateway response: {}", e)))?;
      return Ok(order.into());
    }

    Err(PaymentError::Gateway(describe_error(status.as_u16(), &body)))
  }
}

fn describe_error(status: u16, body: &str) -> String {
  match serde_json::from_str::<RazorpayError>(body) {
    Ok(RazorpayError { error }) => format!("{} ({}): {}", error.code, status, error.description),
    Err(_) => format!("Gateway returned HTTP {}", status),
  }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
  fn key_id(&self) -> &str {
    &self.key_id
  }

  async fn create_order(
    &self,
    amount_minor: u64,
    currency: &str,
    receipt: &str,
  ) -> Result<GatewayOrder, PaymentError> {
    let request = CreateOrderRequest {
      amount: amount_minor,
      currency,
      receipt,
    };

    let response = self
      .client
      .post(format!("{}/orders", self.api_base_url))
      .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
      .json(&request)
      .send()
      .await
      .map_err(|e| PaymentError::Gateway(format!("Order request failed: {}", e)))?;

    let order = self.read_order(response).await?;
    tracing::info!(
      order_id = %order.id,
      amount = order.amount,
      currency = %order.currency,
      "Gateway order created"
    );
    Ok(order)
  }

  async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError> {
    let response = self
      .client
      .get(format!("{}/orders/{}", self.api_base_url, order_id))
      .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
      .send()
      .await
      .map_err(|e| PaymentError::Gateway(format!("Order lookup failed: {}", e)))?;

    self.read_order(response).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
  use serde_json::json;

  async fn create_order(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
    if req.headers().get("authorization").is_none() {
      return HttpResponse::Unauthorized().json(json!({
        "error": { "code": "BAD_REQUEST_ERROR", "description": "Authentication failed" }
      }));
    }
    HttpResponse::Ok().json(json!({
      "id": "order_test_1",
      "entity": "order",
      "amount": body["amount"],
      "amount_paid": 0,
      "amount_due": body["amount"],
      "currency": body["currency"],
      "receipt": body["receipt"],
      "status": "created",
      "attempts": 0,
      "created_at": 1700000000
    }))
  }

  async fn missing_order() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
      "error": { "code": "BAD_REQUEST_ERROR", "description": "The id provided does not exist" }
    }))
  }

  fn config(base_url: String) -> GatewayConfig {
    GatewayConfig {
      enabled: true,
      key_id: "rzp_test_key".to_string(),
      key_secret: Secret::new("secret".to_string()),
      api_base_url: base_url,
      timeout_seconds: 5,
    }
  }

  fn start_stub() -> String {
    let server = HttpServer::new(|| {
      App::new()
        .route("/orders", web::post().to(create_order))
        .route("/orders/{id}", web::get().to(missing_order))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
  }

  #[actix_web::test]
  async fn test_create_order_round_trip() {
    let gateway = RazorpayGateway::new(&config(start_stub())).unwrap();

    let order = gateway.create_order(40600, "INR", "INV-000001").await.unwrap();

    assert_eq!(order.id, "order_test_1");
    assert_eq!(order.amount, 40600);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.receipt.as_deref(), Some("INV-000001"));
    assert_eq!(gateway.key_id(), "rzp_test_key");
  }

  #[actix_web::test]
  async fn test_gateway_error_is_described() {
    let gateway = RazorpayGateway::new(&config(start_stub())).unwrap();

    let result = gateway.fetch_order("order_missing").await;

    match result {
      Err(PaymentError::Gateway(message)) => {
        assert!(message.contains("BAD_REQUEST_ERROR"));
        assert!(message.contains("does not exist"));
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn test_describe_unparseable_error() {
    assert_eq!(describe_error(502, "<html>"), "Gateway returned HTTP 502");
  }
}
