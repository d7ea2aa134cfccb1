use crate::models::EMPTY_FIELD;
use thiserror::Error;

/// Why a row was refused before any upstream call was made.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RejectionReason {
    #[error("invalid amount")]
    InvalidAmount,
    #[error("missing creditor_iban")]
    MissingCreditor,
    #[error("missing merchant")]
    MissingMerchant,
    #[error("missing order_id")]
    MissingOrderId,
    #[error("invalid amount for DYNAMIC QR")]
    InvalidDynamicQrAmount,
    #[error("missing debitor_type/value")]
    MissingDebitor,
    #[error("unsupported debitor_type (got: {got})")]
    UnsupportedDebitorKind {
        got: String
    },
    #[error("unsupported instruction type (got: {got})")]
    UnknownType {
        got: String
    }
}

impl RejectionReason {
    pub fn unsupported_debitor_kind(raw: &str) -> Self {
        Self::UnsupportedDebitorKind { got: raw.to_string() }
    }

    pub fn unknown_type(raw: &str) -> Self {
        let got = if raw.is_empty() { EMPTY_FIELD } else { raw };
        Self::UnknownType { got: got.to_string() }
    }
}
