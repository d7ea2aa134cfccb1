use crate::models::{InstructionKind, Row};
use crate::types::{QrType, RtpMode};

/// Index of the type keyword in every non-payout row.
const TYPE_FIELD: usize = 2;

pub struct ClassificationRule {
    pub name: &'static str,
    pub matches: fn(&Row) -> Option<InstructionKind>
}

/// Evaluated top to bottom, first match wins. Payout is decided by shape alone and so must
/// precede the keyword rules.
pub const CLASSIFICATION_RULES: [ClassificationRule; 3] = [
    ClassificationRule { name: "payout-by-shape", matches: payout_by_shape },
    ClassificationRule { name: "qr-by-keyword", matches: qr_by_keyword },
    ClassificationRule { name: "rtp-by-keyword", matches: rtp_by_keyword }
];

/// Decides which instruction a row represents from its field count and type keyword.
pub fn classify(row: &Row) -> InstructionKind {
    CLASSIFICATION_RULES.iter()
        .find_map(|rule| (rule.matches)(row))
        .unwrap_or_else(|| InstructionKind::Unknown(row.raw(TYPE_FIELD).unwrap_or_default().to_string()))
}

fn type_keyword(row: &Row) -> String {
    row.field(TYPE_FIELD).to_uppercase()
}

fn payout_by_shape(row: &Row) -> Option<InstructionKind> {
    (row.len() == 2).then_some(InstructionKind::Payout)
}

fn qr_by_keyword(row: &Row) -> Option<InstructionKind> {
    if !(4..=5).contains(&row.len()) {
        return None;
    }

    match type_keyword(row).as_str() {
        "STATIC" => Some(InstructionKind::Qr(QrType::Static)),
        "DYNAMIC" => Some(InstructionKind::Qr(QrType::Dynamic)),
        _ => None
    }
}

//NOTE: Field count is not checked here, missing columns surface as missing fields during validation
fn rtp_by_keyword(row: &Row) -> Option<InstructionKind> {
    match type_keyword(row).as_str() {
        "RTP_NOW" => Some(InstructionKind::Rtp(RtpMode::Now)),
        "RTP_LATER" => Some(InstructionKind::Rtp(RtpMode::Later)),
        _ => None
    }
}
