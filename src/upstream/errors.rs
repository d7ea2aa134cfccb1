use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gateway configuration error: {0}")]
    Config(String)
}
