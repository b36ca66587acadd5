pub mod change_invoice_status;
pub mod create_invoice;
pub mod delete_invoice;
pub mod download_invoice_pdf;
pub mod generate_invoice_pdf;
pub mod get_invoice_details;
pub mod list_invoices;
pub mod update_invoice;

pub use change_invoice_status::{ChangeInvoiceStatusCommand, ChangeInvoiceStatusUseCase};
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase, LineItemCommand};
pub use delete_invoice::DeleteInvoiceUseCase;
pub use download_invoice_pdf::DownloadInvoicePdfUseCase;
pub use generate_invoice_pdf::{GenerateInvoicePdfCommand, GenerateInvoicePdfUseCase};
pub use get_invoice_details::{
  CustomerSummaryDto, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceDto,
  InvoiceLineItemDto, InvoiceTotalsDto, PdfDocumentDto,
};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};
