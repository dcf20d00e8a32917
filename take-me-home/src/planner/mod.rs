//! Route planner.
//!
//! Evaluates the candidate routes from a shared start time, scores the
//! ones that cross on a ferry, and renders a comparison.

mod plan;
mod rank;
mod route_planner;
mod routes;

pub use plan::{risk_score, travel_plan_from_result};
pub use rank::{rank_by_arrival, rank_by_score};
pub use route_planner::{
    PlanningError, PlanningReport, RouteEvaluation, RouteFailure, RoutePlanner,
};
pub use routes::build_candidate_routes;
