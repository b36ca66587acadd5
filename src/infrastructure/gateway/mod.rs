pub mod razorpay_gateway;

pub use razorpay_gateway::RazorpayGateway;
