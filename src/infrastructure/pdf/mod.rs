pub mod invoice_renderer;
pub mod wkhtmltopdf_generator;

pub use invoice_renderer::InvoiceHtmlRenderer;
pub use wkhtmltopdf_generator::WkHtmlToPdfGenerator;
