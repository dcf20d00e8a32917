//! Plan scoring.
//!
//! A weighted linear cost over a [`TravelPlan`]: total travel time, driving
//! time and ferry risk always count, weather and reservation pressure count
//! when the plan carries those signals.

mod error;
mod explain;
mod model;
mod score;
mod weights;

pub use error::ScoringError;
pub use explain::build_explanation;
pub use model::{
    FerryOption, FutureContext, ReservationAvailability, ReservationStatus, TravelPlan,
    TravelPlanBuilder, WeatherDisruption,
};
pub use score::{ScoreBreakdown, score_plan};
pub use weights::{ScoreTerm, ScoringWeights};
