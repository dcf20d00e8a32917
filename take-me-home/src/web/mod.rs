//! Web layer for the route planner.
//!
//! JSON endpoints for evaluating the candidate routes, statically or from
//! live provider data, and for scoring caller-supplied plans.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LiveBuilder, LiveData};
