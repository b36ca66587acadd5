pub mod entities;
pub mod errors;
pub mod ledger;
pub mod services;

pub use entities::{LedgerDocumentKind, LedgerEntry, LedgerPeriod, PartnerLedger};
pub use errors::ReportError;
pub use ledger::build_partner_ledger;
pub use services::{PartnerLedgerQuery, ReportService};
