//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// A caller-supplied value failed validation at a constructor or query entry.
    #[error("Invalid argument `{param}`: {reason}")]
    InvalidArgument { param: &'static str, reason: String },
}

impl SlotError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        SlotError::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
