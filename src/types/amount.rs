use crate::types::errors::AmountError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A strictly positive amount taken from a batch row.
///
/// Keeps the trimmed text the operator submitted next to the parsed value: payouts forward
/// the submitted text untouched while transfers and dynamic QR codes send a JSON number.
/// Any finite positive number is accepted. The exact decimal is kept when it fits in a
/// [`Decimal`], amounts beyond its range or scale carry only the floating point value.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    number: f64,
    exact: Option<Decimal>,
    submitted: String
}

//NOTE: `number` is always finite, so equality is total
impl Eq for Amount {}

impl Amount {
    /// Exact decimal value, absent when the amount is outside `Decimal`'s range or scale.
    pub fn value(&self) -> Option<Decimal> {
        self.exact
    }

    pub fn as_f64(&self) -> f64 {
        self.number
    }

    pub fn as_submitted(&self) -> &str {
        &self.submitted
    }
}

impl Display for Amount {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self.exact {
            Some(exact) => write!(formatter, "{}", exact.normalize()),
            None => write!(formatter, "{}", self.number)
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AmountError::Empty);
        }

        if !is_numeric_literal(value) {
            return Err(AmountError::InvalidFormat(value.to_string()));
        }

        let number = f64::from_str(value)
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| AmountError::InvalidFormat(value.to_string()))?;

        if number <= 0.0 {
            return Err(AmountError::NotPositive(value.to_string()));
        }

        Ok(Amount {
            number,
            exact: parse_decimal(value).filter(|exact| *exact > Decimal::ZERO),
            submitted: value.to_string()
        })
    }
}

/// Optional sign, digits with at most one `.` (at least one digit overall), then an optional
/// exponent made of `e`/`E`, an optional sign and at least one digit.
fn is_numeric_literal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None)
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());

    let mantissa_valid = all_digits(whole) && all_digits(fraction) && !(whole.is_empty() && fraction.is_empty());

    let exponent_valid = exponent.is_none_or(|exponent| {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        !digits.is_empty() && all_digits(digits)
    });

    mantissa_valid && exponent_valid
}

//NOTE: Operators type amounts like ".5", "10." or "1e3" into spreadsheets, all of which are valid numbers
fn parse_decimal(value: &str) -> Option<Decimal> {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value))
    };

    if digits.contains(['e', 'E']) {
        return Decimal::from_scientific(&format!("{sign}{digits}")).ok();
    }

    let mut normalized = String::with_capacity(digits.len() + 2);
    normalized.push_str(sign);

    if digits.starts_with('.') {
        normalized.push('0');
    }

    normalized.push_str(digits);

    if digits.ends_with('.') {
        normalized.push('0');
    }

    Decimal::from_str(&normalized).ok()
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.number)
    }
}
