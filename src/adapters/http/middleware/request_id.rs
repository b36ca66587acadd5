use actix_web::{
  Error, HttpMessage,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stamps every response with `X-Request-ID`.
///
/// A well-formed UUID supplied by the caller is reused so that a request can
/// be followed across services; otherwise a new v4 id is generated. The id is
/// stored in the request extensions and recorded on a `http_request` span
/// wrapping the rest of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestIdMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestIdMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct RequestIdMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let request_id = RequestId::from_request(&req);
    req.extensions_mut().insert(request_id);

    let span = tracing::info_span!(
      "http_request",
      request_id = %request_id,
      method = %req.method(),
      path = %req.path(),
    );

    Box::pin(
      async move {
        let mut res = service.call(req).await?;

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
          res
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        Ok(res)
      }
      .instrument(span),
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
  fn from_request(req: &ServiceRequest) -> Self {
    req
      .headers()
      .get(REQUEST_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok())
      .map(Self)
      .unwrap_or_else(|| Self(Uuid::new_v4()))
  }

  pub fn value(&self) -> Uuid {
    self.0
  }
}

impl std::fmt::Display for RequestId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Reads the id stored by [`RequestIdMiddleware`]
pub trait RequestIdExt {
  fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for actix_web::HttpRequest {
  fn request_id(&self) -> Option<RequestId> {
    self.extensions().get::<RequestId>().copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpRequest, HttpResponse,
    test::{self, TestRequest},
    web,
  };

  async fn echo_request_id(req: HttpRequest) -> HttpResponse {
    let request_id = req.request_id().map(|id| id.to_string()).unwrap_or_default();
    HttpResponse::Ok().body(request_id)
  }

  #[actix_web::test]
  async fn test_generates_request_id() {
    let app = test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .route("/", web::get().to(echo_request_id)),
    )
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let header = resp
      .headers()
      .get(REQUEST_ID_HEADER)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    assert!(Uuid::parse_str(&header).is_ok());

    let body = test::read_body(resp).await;
    assert_eq!(body, header.as_bytes());
  }

  #[actix_web::test]
  async fn test_reuses_incoming_request_id() {
    let app = test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .route("/", web::get().to(echo_request_id)),
    )
    .await;

    let incoming = Uuid::new_v4().to_string();
    let req = TestRequest::get()
      .uri("/")
      .insert_header((REQUEST_ID_HEADER, incoming.as_str()))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
      resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
      incoming
    );
  }

  #[actix_web::test]
  async fn test_malformed_incoming_id_is_replaced() {
    let app = test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .route("/", web::get().to(echo_request_id)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/")
      .insert_header((REQUEST_ID_HEADER, "not-a-uuid"))
      .to_request();
    let resp = test::call_service(&app, req).await;

    let header = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
    assert_ne!(header, "not-a-uuid");
    assert!(Uuid::parse_str(header).is_ok());
  }
}
