//! Error taxonomy for the environment boundary
//!
//! Out-of-range actions are not errors (they are clamped). Errors cover
//! call-order violations, non-finite inputs and bad configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RinkError {
    /// `step` called before the first `reset`, or after a terminal step
    #[error("invalid call sequence: {reason}")]
    InvalidSequence { reason: &'static str },

    /// Non-finite numeric input at the boundary
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings parsing or report serialization
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RinkError>;
