mod dispatcher;
mod errors;
mod gateway;

pub use dispatcher::{dispatch, UpstreamCall};
pub use errors::GatewayError;
pub use gateway::{GatewayConfig, HttpGateway, PaymentGateway, UpstreamResponse};
