pub mod calculation;
pub mod documents;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use calculation::{LineAmounts, TaxCalculator};
pub use documents::{DownloadedDocument, InvoiceDocumentService, PDF_CONTENT_TYPE};
pub use entities::{
  Invoice, InvoiceHeaderUpdate, InvoiceLineItem, InvoiceTotals, LineItemDraft, NewInvoice,
  PaymentDetails, PdfReference,
};
pub use errors::InvoiceError;
pub use ports::{
  BlobStore, InvoiceDocument, InvoiceFilter, InvoiceRepository, PdfGenerator, StoredBlob,
};
pub use services::{
  InvoiceData, InvoiceService, InvoiceServiceDependencies, InvoiceUpdateData, InvoicingPolicy,
  LineItemInput,
};
pub use value_objects::{
  FixedTaxMode, InvoiceNumber, InvoiceStatus, Quantity, StorageBackend, TaxSnapshot,
};
