pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::ApiResponse;
pub use errors::{ApiError, expose_upstream_details};
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{
  ApiRouteDependencies, ApplicationServices, configure_api_routes, configure_system_routes,
};
