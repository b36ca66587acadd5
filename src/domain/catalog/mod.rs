pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Product, ProductDetails, Tax};
pub use errors::CatalogError;
pub use ports::{ProductRepository, TaxRepository};
pub use services::CatalogService;
pub use value_objects::{TaxComputation, TaxRate};
