mod amount;
mod errors;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use amount::Amount;
pub use errors::{AmountError, KeywordError};

/// 1-based position of a data row in the submitted batch (header excluded).
pub type RowNumber = usize;

/// Identifier scheme used to address the paying party of a transfer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DebitorKind {
    Iban,
    RaastId,
    VaultToken
}

impl DebitorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebitorKind::Iban => "IBAN",
            DebitorKind::RaastId => "RAAST_ID",
            DebitorKind::VaultToken => "VAULT_TOKEN"
        }
    }
}

impl FromStr for DebitorKind {
    type Err = KeywordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "IBAN" => Ok(DebitorKind::Iban),
            "RAAST_ID" => Ok(DebitorKind::RaastId),
            "VAULT_TOKEN" => Ok(DebitorKind::VaultToken),
            _ => Err(KeywordError::Unrecognized(value.trim().to_string()))
        }
    }
}

impl Display for DebitorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Reusable (amount-less) or single-use (amount-bound) scannable code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum QrType {
    Static,
    Dynamic
}

impl QrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrType::Static => "STATIC",
            QrType::Dynamic => "DYNAMIC"
        }
    }
}

impl Display for QrType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Immediate or scheduled real-time transfer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RtpMode {
    Now,
    Later
}

impl RtpMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RtpMode::Now => "RTP_NOW",
            RtpMode::Later => "RTP_LATER"
        }
    }
}

impl Display for RtpMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
