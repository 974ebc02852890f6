//! Setup-time failures
//!
//! Every error here surfaces before the tick loop starts. Once a session is
//! running there is nothing to recover from: `tick` is infallible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The asset collaborator could not resolve a shape or frame sequence
    #[error("missing resource: {what}")]
    MissingResource { what: String },
    /// A size, speed or rate that must be positive was not
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
    /// Restored state that the simulation could never have produced
    #[error("impossible state: {0}")]
    ImpossibleState(String),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading settings or writing a snapshot
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn missing(what: impl Into<String>) -> Self {
        SimError::MissingResource { what: what.into() }
    }

    /// Reject `value` unless it is finite and strictly positive
    pub fn require_positive(field: &'static str, value: f32) -> Result<(), SimError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(SimError::InvalidConfiguration {
                field,
                reason: format!("must be positive, got {value}"),
            })
        }
    }
}
