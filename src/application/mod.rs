//! Application layer
//!
//! Use cases that turn transport-level commands into calls on the domain
//! services and shape the results into response DTOs.

pub mod catalog;
pub mod contact;
pub mod invoice;
pub mod payment;
pub mod report;
