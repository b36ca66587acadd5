pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod signature;

pub use entities::{GatewayCheckout, GatewayOrder, Payment, PaymentMethod};
pub use errors::PaymentError;
pub use ports::{PaymentGateway, PaymentRepository};
pub use services::{GatewayIntegration, GatewayPaymentConfirmation, PaymentService, RecordPaymentData};
pub use signature::PaymentSignatureVerifier;
