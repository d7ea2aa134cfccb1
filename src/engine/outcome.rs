use crate::artifact::RenderedArtifact;
use crate::models::{InstructionKind, Row, EMPTY_FIELD};
use crate::types::RowNumber;

/// Identifying fields shown next to each outcome.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RowSummary {
    pub merchant: String,
    pub amount: String,
    pub party: String
}

impl RowSummary {
    pub fn describe(row: &Row, kind: &InstructionKind) -> Self {
        match kind {
            InstructionKind::Payout => Self {
                merchant: EMPTY_FIELD.to_string(),
                amount: or_placeholder(row.field(0)),
                party: or_placeholder(row.field(1))
            },
            InstructionKind::Qr(_) => Self {
                merchant: or_placeholder(row.field(0)),
                amount: or_placeholder(row.field(1)),
                party: EMPTY_FIELD.to_string()
            },
            InstructionKind::Rtp(_) | InstructionKind::Unknown(_) => Self {
                merchant: or_placeholder(row.field(0)),
                amount: or_placeholder(row.field(1)),
                party: format!("{} / {}", or_placeholder(row.field(3)), or_placeholder(row.field(4)))
            }
        }
    }
}

fn or_placeholder(value: &str) -> String {
    if value.is_empty() { EMPTY_FIELD.to_string() } else { value.to_string() }
}

/// The single result recorded for a batch row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RowOutcome {
    pub row_number: RowNumber,
    pub kind: InstructionKind,
    pub summary: RowSummary,
    /// Set once the row passed validation and an upstream call was attempted.
    pub request_id: Option<String>,
    pub success: bool,
    pub http_status: Option<u16>,
    pub message: String,
    /// Scannable code returned by a QR call.
    pub artifact_text: Option<String>
}

impl RowOutcome {
    pub fn kind_label(&self) -> String {
        self.kind.label()
    }

    pub fn was_dispatched(&self) -> bool {
        self.request_id.is_some()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProcessedRow {
    pub outcome: RowOutcome,
    pub artifact: Option<RenderedArtifact>
}

/// Outcomes of one batch run, in input row order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BatchReport {
    pub rows: Vec<ProcessedRow>
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &RowOutcome> {
        self.rows.iter().map(|row| &row.outcome)
    }

    /// Counts rows processed, not rows that succeeded.
    pub fn status_line(&self) -> String {
        format!("Done. {} row(s) processed.", self.rows.len())
    }
}
