pub mod contact_repository;
pub mod invoice_repository;
pub mod payment_repository;
pub mod product_repository;
pub mod tax_repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use contact_repository::PostgresContactRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use product_repository::PostgresProductRepository;
pub use tax_repository::PostgresTaxRepository;
