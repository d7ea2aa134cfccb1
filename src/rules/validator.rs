use crate::models::{
    InstructionKind, NormalizedInstruction, PayoutInstruction, QrInstruction, RejectionReason, RequestIdGenerator, Row,
    RtpInstruction
};
use crate::types::{Amount, DebitorKind, QrType, RtpMode};
use std::str::FromStr;

mod payout_fields {
    pub const AMOUNT: usize = 0;
    pub const CREDITOR: usize = 1;
}

mod qr_fields {
    pub const MERCHANT: usize = 0;
    pub const AMOUNT: usize = 1;
    pub const ORDER_ID: usize = 3;
    pub const REQUEST_ID: usize = 4;
}

mod rtp_fields {
    pub const MERCHANT: usize = 0;
    pub const AMOUNT: usize = 1;
    pub const DEBITOR_KIND: usize = 3;
    pub const DEBITOR_VALUE: usize = 4;
    pub const ORDER_ID: usize = 5;
    pub const REQUEST_ID: usize = 6;
}

/// Checks the row against the rules of its kind and builds the normalized instruction.
///
/// Rules run in a fixed order per kind and the first failing rule is the one reported.
/// A request id is taken from the row when present, otherwise drawn once from `ids`.
pub fn validate(kind: &InstructionKind, row: &Row, ids: &dyn RequestIdGenerator) -> Result<NormalizedInstruction, RejectionReason> {
    match kind {
        InstructionKind::Payout => validate_payout(row, ids),
        InstructionKind::Qr(qr_type) => validate_qr(*qr_type, row, ids),
        InstructionKind::Rtp(mode) => validate_rtp(*mode, row, ids),
        InstructionKind::Unknown(raw) => Err(RejectionReason::unknown_type(raw))
    }
}

fn validate_payout(row: &Row, ids: &dyn RequestIdGenerator) -> Result<NormalizedInstruction, RejectionReason> {
    let amount = positive_amount(row, payout_fields::AMOUNT).ok_or(RejectionReason::InvalidAmount)?;
    let creditor_iban = required(row, payout_fields::CREDITOR).ok_or(RejectionReason::MissingCreditor)?;

    Ok(NormalizedInstruction::Payout(PayoutInstruction {
        request_id: ids.generate(),
        amount,
        creditor_iban
    }))
}

fn validate_qr(qr_type: QrType, row: &Row, ids: &dyn RequestIdGenerator) -> Result<NormalizedInstruction, RejectionReason> {
    let merchant = required(row, qr_fields::MERCHANT).ok_or(RejectionReason::MissingMerchant)?;
    let order_id = required(row, qr_fields::ORDER_ID).ok_or(RejectionReason::MissingOrderId)?;

    let amount = match qr_type {
        QrType::Static => None,
        QrType::Dynamic => Some(positive_amount(row, qr_fields::AMOUNT).ok_or(RejectionReason::InvalidDynamicQrAmount)?)
    };

    Ok(NormalizedInstruction::Qr(QrInstruction {
        qr_type,
        merchant,
        order_id,
        request_id: request_id(row, qr_fields::REQUEST_ID, ids),
        amount
    }))
}

fn validate_rtp(mode: RtpMode, row: &Row, ids: &dyn RequestIdGenerator) -> Result<NormalizedInstruction, RejectionReason> {
    let merchant = required(row, rtp_fields::MERCHANT).ok_or(RejectionReason::MissingMerchant)?;
    let amount = positive_amount(row, rtp_fields::AMOUNT).ok_or(RejectionReason::InvalidAmount)?;

    let (Some(raw_kind), Some(debitor_value)) = (required(row, rtp_fields::DEBITOR_KIND), required(row, rtp_fields::DEBITOR_VALUE)) else {
        return Err(RejectionReason::MissingDebitor)
    };

    let order_id = required(row, rtp_fields::ORDER_ID).ok_or(RejectionReason::MissingOrderId)?;

    let debitor_kind = DebitorKind::from_str(&raw_kind)
        .map_err(|_| RejectionReason::unsupported_debitor_kind(&raw_kind))?;

    Ok(NormalizedInstruction::Rtp(RtpInstruction {
        mode,
        merchant,
        amount,
        debitor_kind,
        debitor_value,
        order_id,
        request_id: request_id(row, rtp_fields::REQUEST_ID, ids)
    }))
}

fn required(row: &Row, index: usize) -> Option<String> {
    let value = row.field(index);
    (!value.is_empty()).then(|| value.to_string())
}

fn positive_amount(row: &Row, index: usize) -> Option<Amount> {
    Amount::from_str(row.field(index)).ok()
}

fn request_id(row: &Row, index: usize, ids: &dyn RequestIdGenerator) -> String {
    required(row, index).unwrap_or_else(|| ids.generate())
}
