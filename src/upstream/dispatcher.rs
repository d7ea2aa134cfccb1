use crate::models::{NormalizedInstruction, PayoutInstruction, QrInstruction, RtpInstruction};
use crate::types::{Amount, DebitorKind, QrType, RtpMode};
use serde::Serialize;

/// Exactly one outbound call derived from a normalized instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamCall {
    Transfer(TransferRequest),
    Qr(QrRequest),
    Payout(PayoutRequest)
}

impl UpstreamCall {
    /// Short operation name used in logs and outcome messages.
    pub fn operation(&self) -> &'static str {
        match self {
            UpstreamCall::Transfer(_) => "RTP",
            UpstreamCall::Qr(_) => "QR",
            UpstreamCall::Payout(_) => "PAYOUT"
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            UpstreamCall::Transfer(request) => &request.request_id,
            UpstreamCall::Qr(request) => &request.request_id,
            UpstreamCall::Payout(request) => &request.request_id
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub aggregator_merchant_identifier: String,
    pub amount: Amount,
    pub order_id: String,
    pub request_id: String,
    #[serde(rename = "type", serialize_with = "serialize_rtp_mode")]
    pub mode: RtpMode,
    #[serde(flatten)]
    pub debitor: Debitor
}

/// The single debitor field a transfer carries, named after its identifier scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Debitor {
    #[serde(rename = "debitor_iban")]
    Iban(String),
    #[serde(rename = "debitor_raast_id")]
    RaastId(String),
    #[serde(rename = "debitor_vault_token")]
    VaultToken(String)
}

impl Debitor {
    pub fn new(kind: DebitorKind, value: String) -> Self {
        match kind {
            DebitorKind::Iban => Debitor::Iban(value),
            DebitorKind::RaastId => Debitor::RaastId(value),
            DebitorKind::VaultToken => Debitor::VaultToken(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QrRequest {
    #[serde(rename = "type", serialize_with = "serialize_qr_type")]
    pub qr_type: QrType,
    pub aggregator_merchant_identifier: String,
    pub order_id: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutRequest {
    pub request_id: String,
    /// Forwarded exactly as the operator typed it.
    pub amount: String,
    pub creditor_iban: String,
    #[serde(rename = "type")]
    pub payout_type: &'static str
}

/// Maps a normalized instruction onto its upstream operation and payload. Pure, no I/O.
pub fn dispatch(instruction: &NormalizedInstruction) -> UpstreamCall {
    match instruction {
        NormalizedInstruction::Payout(payout) => UpstreamCall::Payout(payout_request(payout)),
        NormalizedInstruction::Qr(qr) => UpstreamCall::Qr(qr_request(qr)),
        NormalizedInstruction::Rtp(rtp) => UpstreamCall::Transfer(transfer_request(rtp))
    }
}

fn payout_request(payout: &PayoutInstruction) -> PayoutRequest {
    PayoutRequest {
        request_id: payout.request_id.clone(),
        amount: payout.amount.as_submitted().to_string(),
        creditor_iban: payout.creditor_iban.clone(),
        payout_type: "PAYOUT"
    }
}

fn qr_request(qr: &QrInstruction) -> QrRequest {
    QrRequest {
        qr_type: qr.qr_type,
        aggregator_merchant_identifier: qr.merchant.clone(),
        order_id: qr.order_id.clone(),
        request_id: qr.request_id.clone(),
        amount: match qr.qr_type {
            QrType::Static => None,
            QrType::Dynamic => qr.amount.clone()
        }
    }
}

fn transfer_request(rtp: &RtpInstruction) -> TransferRequest {
    TransferRequest {
        aggregator_merchant_identifier: rtp.merchant.clone(),
        amount: rtp.amount.clone(),
        order_id: rtp.order_id.clone(),
        request_id: rtp.request_id.clone(),
        mode: rtp.mode,
        debitor: Debitor::new(rtp.debitor_kind, rtp.debitor_value.clone())
    }
}

fn serialize_rtp_mode<S: serde::Serializer>(mode: &RtpMode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mode.as_str())
}

fn serialize_qr_type<S: serde::Serializer>(qr_type: &QrType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(qr_type.as_str())
}
