pub mod export_partner_ledger;
pub mod get_partner_ledger;

pub use export_partner_ledger::{
  CSV_CONTENT_TYPE, ExportPartnerLedgerUseCase, LedgerExport, ledger_to_csv,
};
pub use get_partner_ledger::{GetPartnerLedgerCommand, GetPartnerLedgerUseCase};
