pub mod create_payment_order;
pub mod list_payments;
pub mod record_payment;
pub mod verify_gateway_payment;

pub use create_payment_order::CreatePaymentOrderUseCase;
pub use list_payments::{ListPaymentsResponse, ListPaymentsUseCase, PaymentDto};
pub use record_payment::{PaymentReceiptResponse, RecordPaymentCommand, RecordPaymentUseCase};
pub use verify_gateway_payment::{VerifyGatewayPaymentCommand, VerifyGatewayPaymentUseCase};
