//! Domain error types.
//!
//! These errors represent validation failures and unreachable sailings in
//! the leg model. They are distinct from provider/IO errors.

use chrono::NaiveDateTime;

use super::TimeError;

/// Domain-level errors for leg construction and route traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// No scheduled sailing satisfies the loading cutoff and buffer
    #[error("no viable ferry sailing for {leg} when arriving at {arrival}")]
    NoViableSailing {
        leg: String,
        arrival: NaiveDateTime,
    },

    /// Invalid leg construction (e.g., negative duration)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Route has no legs
    #[error("route must have at least one leg")]
    EmptyRoute,

    /// A schedule entry could not be parsed
    #[error(transparent)]
    Time(#[from] TimeError),
}
