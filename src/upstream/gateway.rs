use crate::upstream::{GatewayError, UpstreamCall};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const SECRET_KEY_HEADER: &str = "X-SFPY-AGGREGATOR-SECRET-KEY";

/// An upstream payment operation, opaque to the pipeline beyond its request/response contract.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn execute(&self, call: &UpstreamCall) -> Result<UpstreamResponse, GatewayError>;
}

/// Transport status plus the response body, when it parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Option<Value>
}

impl UpstreamResponse {
    /// Builds a response from raw body text. A body that is not valid JSON is kept as absent.
    pub fn from_text(status: u16, raw: &str) -> Self {
        Self {
            status,
            body: serde_json::from_str(raw).ok()
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human readable error message, looked up as `message`, `error` or `error.message`.
    pub fn message(&self) -> Option<&str> {
        let body = self.body.as_ref()?;

        body.get("message").and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
            .or_else(|| body.get("error").and_then(|error| error.get("message")).and_then(Value::as_str))
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }

    /// Scannable code returned by the QR operation, either top level or under `data`.
    pub fn code(&self) -> Option<&str> {
        let body = self.body.as_ref()?;

        body.get("code").and_then(Value::as_str)
            .or_else(|| body.get("data").and_then(|data| data.get("code")).and_then(Value::as_str))
            .filter(|code| !code.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub aggregator_id: String,
    pub secret_key: String,
    pub timeout: Duration
}

/// Calls the aggregator REST API over HTTPS.
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if config.aggregator_id.trim().is_empty() {
            return Err(GatewayError::Config("aggregator id is required".to_string()));
        }

        if config.secret_key.trim().is_empty() {
            return Err(GatewayError::Config("secret key is required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self, call: &UpstreamCall) -> String {
        let resource = match call {
            UpstreamCall::Transfer(_) => "payments",
            UpstreamCall::Qr(_) => "qrs",
            UpstreamCall::Payout(_) => "payouts"
        };

        format!(
            "{}/raastwire/v1/aggregators/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.aggregator_id,
            resource
        )
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn execute(&self, call: &UpstreamCall) -> Result<UpstreamResponse, GatewayError> {
        let url = self.endpoint(call);

        debug!("POST {url} for request [{}]", call.request_id());

        let response = self.client
            .post(&url)
            .header(SECRET_KEY_HEADER, &self.config.secret_key)
            .json(call)
            .send()
            .await?;

        let status = response.status().as_u16();
        let raw = response.text().await?;

        Ok(UpstreamResponse::from_text(status, &raw))
    }
}
