//! Evaluating and reporting on a set of candidate routes.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::{build_candidate_routes, rank_by_arrival, rank_by_score, travel_plan_from_result};
use crate::domain::{DomainError, Route, RouteResult, evaluate_route, format_duration};
use crate::scoring::{ScoreBreakdown, ScoringError, ScoringWeights, score_plan};

/// Why a single route could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// A successfully evaluated route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEvaluation {
    pub result: RouteResult,
    /// Present for routes with a ferry crossing
    pub score: Option<ScoreBreakdown>,
}

/// A route whose evaluation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFailure {
    pub route_name: String,
    pub error: PlanningError,
}

/// Outcome of a planning run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanningReport {
    /// Successful evaluations, ranked by arrival
    pub evaluations: Vec<RouteEvaluation>,
    /// Routes that failed, in candidate order
    pub failures: Vec<RouteFailure>,
}

impl PlanningReport {
    /// Reorder evaluations by composite score, lowest first.
    pub fn ranked_by_score(mut self) -> Self {
        self.evaluations = rank_by_score(self.evaluations);
        self
    }

    /// Render every evaluation followed by every failure.
    pub fn render(&self) -> String {
        self.evaluations
            .iter()
            .map(RoutePlanner::describe)
            .chain(self.failures.iter().map(describe_failure))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn describe_failure(failure: &RouteFailure) -> String {
    format!(
        "Route: {}\n  unavailable: {}",
        failure.route_name, failure.error
    )
}

/// Plans a trip over a set of routes from a shared start time.
///
/// Each route is evaluated independently: a route that cannot be completed
/// (typically because every sailing is missed) is reported as a failure
/// and does not stop the others.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    start: NaiveDateTime,
    routes: Vec<Route>,
    weights: ScoringWeights,
}

impl RoutePlanner {
    /// Planner over the fixed candidate routes, with sailings on the start date.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the built-in route table fails validation.
    pub fn new(start: NaiveDateTime) -> Result<Self, DomainError> {
        Ok(Self::with_routes(start, build_candidate_routes(start.date())?))
    }

    /// Planner over an explicit set of routes.
    pub fn with_routes(start: NaiveDateTime, routes: Vec<Route>) -> Self {
        Self {
            start,
            routes,
            weights: ScoringWeights::default(),
        }
    }

    /// Use `weights` when scoring ferry routes.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn evaluate_one(&self, route: &Route) -> Result<RouteEvaluation, PlanningError> {
        let result = evaluate_route(route, self.start)?;
        let score = travel_plan_from_result(&result)?
            .map(|plan| score_plan(&plan, &self.weights));
        Ok(RouteEvaluation { result, score })
    }

    /// Evaluate every route from the start time.
    pub fn evaluate(&self) -> PlanningReport {
        let mut evaluations = Vec::with_capacity(self.routes.len());
        let mut failures = Vec::new();

        for route in &self.routes {
            match self.evaluate_one(route) {
                Ok(evaluation) => {
                    debug!(
                        route = route.name(),
                        arrival = %evaluation.result.arrival,
                        waits = evaluation.result.waits.num_minutes(),
                        score = evaluation.score.as_ref().map(ScoreBreakdown::total),
                        "Route evaluated"
                    );
                    evaluations.push(evaluation);
                }
                Err(error) => {
                    warn!(route = route.name(), error = %error, "Route evaluation failed");
                    failures.push(RouteFailure {
                        route_name: route.name().to_string(),
                        error,
                    });
                }
            }
        }

        PlanningReport {
            evaluations: rank_by_arrival(evaluations),
            failures,
        }
    }

    /// Multi-line report for one evaluation.
    pub fn describe(evaluation: &RouteEvaluation) -> String {
        let result = &evaluation.result;
        let mut pieces = vec![
            format!("Route: {}", result.route_name),
            format!("  depart: {}", result.departure.format("%Y-%m-%d %H:%M")),
            format!(
                "  arrive: {} (total {})",
                result.arrival.format("%Y-%m-%d %H:%M"),
                format_duration(result.total_duration)
            ),
        ];

        if result.waits > chrono::Duration::zero() {
            pieces.push(format!(
                "  total terminal waits: {}",
                format_duration(result.waits)
            ));
        }
        if let Some(score) = &evaluation.score {
            pieces.push(format!("  composite score: {:.2}", score.total()));
        }

        for leg in &result.legs {
            let mut detail = format!("    - {}: arrive {}", leg.name, leg.arrival.format("%H:%M"));
            if let Some(notes) = &leg.notes {
                detail.push_str(&format!(" ({notes})"));
            }
            pieces.push(detail);
        }

        let warnings = result.slack_warnings();
        if !warnings.is_empty() {
            pieces.push("  ⚠ slack risks:".to_string());
            pieces.extend(warnings.into_iter().map(|w| format!("    * {w}")));
        }

        pieces.join("\n")
    }

    /// Evaluate and render the full comparison.
    pub fn summary(&self) -> String {
        self.evaluate().render()
    }
}
