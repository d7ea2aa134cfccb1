use crate::models::InstructionKind;
use crate::types::{Amount, DebitorKind, QrType, RtpMode};

/// A validated row, ready to be turned into exactly one upstream call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum NormalizedInstruction {
    Payout(PayoutInstruction),
    Qr(QrInstruction),
    Rtp(RtpInstruction)
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PayoutInstruction {
    pub request_id: String,
    pub amount: Amount,
    pub creditor_iban: String
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QrInstruction {
    pub qr_type: QrType,
    pub merchant: String,
    pub order_id: String,
    pub request_id: String,
    /// Only present for dynamic codes.
    pub amount: Option<Amount>
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RtpInstruction {
    pub mode: RtpMode,
    pub merchant: String,
    pub amount: Amount,
    pub debitor_kind: DebitorKind,
    pub debitor_value: String,
    pub order_id: String,
    pub request_id: String
}

impl NormalizedInstruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            NormalizedInstruction::Payout(_) => InstructionKind::Payout,
            NormalizedInstruction::Qr(qr) => InstructionKind::Qr(qr.qr_type),
            NormalizedInstruction::Rtp(rtp) => InstructionKind::Rtp(rtp.mode)
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            NormalizedInstruction::Payout(payout) => &payout.request_id,
            NormalizedInstruction::Qr(qr) => &qr.request_id,
            NormalizedInstruction::Rtp(rtp) => &rtp.request_id
        }
    }
}
