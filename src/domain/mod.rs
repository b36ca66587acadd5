pub mod catalog;
pub mod common;
pub mod contact;
pub mod invoice;
pub mod payment;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;
