//! Turns a row's validation result or upstream call result into its [`RowOutcome`].

use crate::engine::{RowOutcome, RowSummary};
use crate::models::{InstructionKind, NormalizedInstruction, RejectionReason, Row};
use crate::upstream::{GatewayError, UpstreamResponse};

/// Outcome for a row refused before dispatch.
pub fn rejected(row: &Row, kind: InstructionKind, reason: &RejectionReason) -> RowOutcome {
    RowOutcome {
        row_number: row.number,
        summary: RowSummary::describe(row, &kind),
        kind,
        request_id: None,
        success: false,
        http_status: None,
        message: format!("Bad row: {reason}"),
        artifact_text: None
    }
}

/// Outcome for a dispatched row.
///
/// QR calls succeed only when the upstream accepted the call and returned a non-empty code.
/// Transfers and payouts succeed when the upstream reports success. Failures carry the
/// upstream's own message when the body has one.
pub fn record(row: &Row, instruction: &NormalizedInstruction, call_outcome: Result<UpstreamResponse, GatewayError>) -> RowOutcome {
    let kind = instruction.kind();
    let label = operation_label(&kind);

    let (success, http_status, message, artifact_text) = match call_outcome {
        Ok(response) => {
            let artifact_text = kind.is_qr().then(|| response.code().map(str::to_string)).flatten();
            let success = response.is_success() && (!kind.is_qr() || artifact_text.is_some());

            let message = if success {
                format!("{label} Success")
            } else {
                response.message().map(str::to_string).unwrap_or_else(|| format!("{label} Failed"))
            };

            (success, Some(response.status), message, artifact_text)
        }
        Err(_) => (false, None, format!("{label} Failed"), None)
    };

    RowOutcome {
        row_number: row.number,
        summary: RowSummary::describe(row, &kind),
        kind,
        request_id: Some(instruction.request_id().to_string()),
        success,
        http_status,
        message,
        artifact_text
    }
}

fn operation_label(kind: &InstructionKind) -> String {
    match kind {
        InstructionKind::Payout => "PAYOUT".to_string(),
        InstructionKind::Qr(qr_type) => format!("QR {qr_type}"),
        InstructionKind::Rtp(_) => "RTP".to_string(),
        InstructionKind::Unknown(raw) => raw.clone()
    }
}
