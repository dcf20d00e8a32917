//! Scoring error types.

/// Errors raised while building plans or tuning weights.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// One or more weight names are not scoring terms
    #[error("unknown scoring weights: {0}")]
    InvalidWeightName(String),

    /// Ferry option failed validation
    #[error("invalid ferry option: {0}")]
    InvalidFerryOption(&'static str),

    /// Travel plan failed validation
    #[error("invalid travel plan: {0}")]
    InvalidTravelPlan(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScoringError::InvalidWeightName("comfort, speed".into());
        assert_eq!(err.to_string(), "unknown scoring weights: comfort, speed");

        let err = ScoringError::InvalidFerryOption("risk must be between 0 and 1");
        assert_eq!(
            err.to_string(),
            "invalid ferry option: risk must be between 0 and 1"
        );

        let err = ScoringError::InvalidTravelPlan("driving_minutes_pre cannot be negative");
        assert_eq!(
            err.to_string(),
            "invalid travel plan: driving_minutes_pre cannot be negative"
        );
    }
}
