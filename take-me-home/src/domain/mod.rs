//! Domain types for the ferry-aware route planner.
//!
//! Legs, routes and their evaluation results. Constructors validate their
//! inputs, so code that receives these types can trust their invariants.
//! Everything here is synchronous and free of I/O.

mod error;
mod leg;
mod route;
mod time;

pub use error::DomainError;
pub use leg::{
    DEFAULT_FERRY_BUFFER_MINS, DriveLeg, FerryLeg, FerrySailingOption, FerryTiming, LegResult,
    RiskTier, TravelLeg,
};
pub use route::{Route, RouteResult, evaluate_route};
pub use time::{TimeError, format_duration, parse_hhmm, schedule};
