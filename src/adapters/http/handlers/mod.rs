pub mod catalog;
pub mod contacts;
pub mod invoices;
pub mod payments;
pub mod reports;
pub mod system;
