use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum AmountError {
    #[error("Amount error: value is an empty string")]
    Empty,
    #[error("Amount error: '{0}' is not a number")]
    InvalidFormat(String),
    #[error("Amount error: '{0}' is not positive")]
    NotPositive(String)
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum KeywordError {
    #[error("Unrecognized keyword '{0}'")]
    Unrecognized(String)
}
