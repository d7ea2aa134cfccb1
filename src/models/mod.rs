mod errors;
mod instruction;
mod request_id;
mod row;

use crate::types::{QrType, RtpMode};

pub use errors::RejectionReason;
pub use instruction::{NormalizedInstruction, PayoutInstruction, QrInstruction, RtpInstruction};
pub use request_id::{RequestIdGenerator, UuidRequestIds};
#[cfg(test)]
pub use request_id::SequentialRequestIds;
pub use row::Row;

/// Placeholder shown wherever a field is absent.
pub const EMPTY_FIELD: &str = "—";

/// The closed set of instruction shapes a batch row can take.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InstructionKind {
    Payout,
    Qr(QrType),
    Rtp(RtpMode),
    /// Carries the raw type field for diagnostics.
    Unknown(String)
}

impl InstructionKind {
    /// Label shown in the report's kind column.
    pub fn label(&self) -> String {
        match self {
            InstructionKind::Payout => "PAYOUT".to_string(),
            InstructionKind::Qr(qr_type) => format!("QR ({qr_type})"),
            InstructionKind::Rtp(mode) => mode.to_string(),
            InstructionKind::Unknown(raw) if raw.is_empty() => EMPTY_FIELD.to_string(),
            InstructionKind::Unknown(raw) => raw.clone()
        }
    }

    pub fn is_qr(&self) -> bool {
        matches!(self, InstructionKind::Qr(_))
    }
}
