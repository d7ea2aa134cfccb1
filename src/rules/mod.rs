//! Row classification and per-kind validation.
//!
//! Both steps are pure: they look at a single row and never touch the network, so every
//! rejection is decided before an upstream call is considered.

mod classifier;
mod validator;

pub use classifier::{classify, CLASSIFICATION_RULES};
pub use validator::validate;
