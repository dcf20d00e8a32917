//! JSON request and response bodies.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{LegResult, format_duration};
use crate::planner::{PlanningReport, RouteEvaluation};
use crate::scoring::{
    FerryOption, FutureContext, ReservationAvailability, ReservationStatus, ScoreBreakdown,
    ScoringError, ScoringWeights, TravelPlan, WeatherDisruption,
};

/// Timestamp format used in responses.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a local timestamp: `YYYY-MM-DDTHH:MM[:SS]`, with `T` or a space.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Ordering of evaluated routes in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteOrder {
    /// Earliest arrival first
    #[default]
    Arrival,
    /// Lowest composite score first, unscored routes last
    Score,
}

/// Query for route evaluation.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    /// Local start time (defaults to now)
    pub depart_at: Option<String>,
    #[serde(default)]
    pub sort: RouteOrder,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache_ttl_seconds: u64,
    /// Whether live provider data is configured
    pub live_data: bool,
}

/// One leg of an evaluated route.
#[derive(Debug, Serialize)]
pub struct LegSummary {
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: i64,
    pub wait_minutes: i64,
    pub slack_minutes: Option<i64>,
    pub risk: Option<&'static str>,
    pub notes: Option<String>,
}

impl From<&LegResult> for LegSummary {
    fn from(leg: &LegResult) -> Self {
        Self {
            name: leg.name.clone(),
            departure: format_timestamp(leg.departure),
            arrival: format_timestamp(leg.arrival),
            duration_minutes: leg.duration.num_minutes(),
            wait_minutes: leg.wait.num_minutes(),
            slack_minutes: leg.slack.map(|s| s.num_minutes()),
            risk: leg.risk.map(|r| r.as_str()),
            notes: leg.notes.clone(),
        }
    }
}

/// An evaluated route.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub route: String,
    pub departure: String,
    pub arrival: String,
    pub total_minutes: i64,
    /// Human-readable total, e.g. `2h 43m`
    pub total: String,
    pub terminal_wait_minutes: i64,
    /// Composite score; absent for routes without a ferry
    pub score: Option<f64>,
    pub slack_warnings: Vec<String>,
    pub legs: Vec<LegSummary>,
}

impl From<&RouteEvaluation> for RouteSummary {
    fn from(evaluation: &RouteEvaluation) -> Self {
        let result = &evaluation.result;
        Self {
            route: result.route_name.clone(),
            departure: format_timestamp(result.departure),
            arrival: format_timestamp(result.arrival),
            total_minutes: result.total_duration.num_minutes(),
            total: format_duration(result.total_duration),
            terminal_wait_minutes: result.waits.num_minutes(),
            score: evaluation.score.as_ref().map(ScoreBreakdown::total),
            slack_warnings: result.slack_warnings(),
            legs: result.legs.iter().map(LegSummary::from).collect(),
        }
    }
}

/// A route that could not be evaluated.
#[derive(Debug, Serialize)]
pub struct UnavailableRoute {
    pub route: String,
    pub reason: String,
}

/// Evaluated routes, ranked by arrival.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub depart_at: String,
    pub routes: Vec<RouteSummary>,
    pub unavailable: Vec<UnavailableRoute>,
}

impl RoutesResponse {
    /// Build from a report plus failures from outside the planner.
    pub fn from_report(
        start: NaiveDateTime,
        report: &PlanningReport,
        mut unavailable: Vec<UnavailableRoute>,
    ) -> Self {
        unavailable.extend(report.failures.iter().map(|f| UnavailableRoute {
            route: f.route_name.clone(),
            reason: f.error.to_string(),
        }));
        Self {
            depart_at: format_timestamp(start),
            routes: report.evaluations.iter().map(RouteSummary::from).collect(),
            unavailable,
        }
    }
}

/// The sailing of a plan to score.
#[derive(Debug, Deserialize)]
pub struct FerryOptionRequest {
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub risk: f64,
    #[serde(default)]
    pub buffer_minutes: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub severity: i32,
    pub expected_delay_minutes: i64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    pub status: String,
    pub confidence: f64,
    pub notes: Option<String>,
}

/// Request to score a travel plan.
#[derive(Debug, Deserialize)]
pub struct ScorePlanRequest {
    pub ferry: FerryOptionRequest,
    #[serde(default)]
    pub driving_minutes_pre: i64,
    #[serde(default)]
    pub driving_minutes_post: i64,
    #[serde(default)]
    pub prep_buffer_minutes: i64,
    #[serde(default)]
    pub arrival_buffer_minutes: i64,
    pub weather: Option<WeatherRequest>,
    pub reservation: Option<ReservationRequest>,
    pub notes: Option<String>,
    /// Weight overrides by term name
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

/// Why a score request could not be turned into a plan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanRequestError {
    #[error("invalid timestamp for {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl ScorePlanRequest {
    /// Apply the weight overrides to the defaults.
    pub fn weights(&self) -> Result<ScoringWeights, ScoringError> {
        ScoringWeights::default().tuned(self.weights.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Validate and build the plan.
    pub fn to_plan(&self) -> Result<TravelPlan, PlanRequestError> {
        let timestamp = |field: &'static str, value: &str| {
            parse_timestamp(value).ok_or_else(|| PlanRequestError::InvalidTimestamp {
                field,
                value: value.to_string(),
            })
        };

        let mut ferry = FerryOption::new(
            self.ferry.name.clone(),
            timestamp("ferry.departure", &self.ferry.departure)?,
            timestamp("ferry.arrival", &self.ferry.arrival)?,
            self.ferry.risk,
            self.ferry.buffer_minutes,
        )?;
        if let Some(notes) = &self.ferry.notes {
            ferry = ferry.with_notes(notes.clone());
        }

        let mut context = FutureContext::default();
        if let Some(weather) = &self.weather {
            let mut disruption =
                WeatherDisruption::new(weather.severity, weather.expected_delay_minutes);
            if let Some(description) = &weather.description {
                disruption = disruption.with_description(description.clone());
            }
            context = context.with_weather(disruption);
        }
        if let Some(reservation) = &self.reservation {
            let mut availability = ReservationAvailability::new(
                ReservationStatus::parse(&reservation.status),
                reservation.confidence,
            )?;
            if let Some(notes) = &reservation.notes {
                availability = availability.with_notes(notes.clone());
            }
            context = context.with_reservation(availability);
        }
        if let Some(notes) = &self.notes {
            context = context.with_notes(notes.clone());
        }

        Ok(TravelPlan::builder(ferry)
            .driving(self.driving_minutes_pre, self.driving_minutes_post)
            .buffers(self.prep_buffer_minutes, self.arrival_buffer_minutes)
            .future_context(context)
            .build()?)
    }
}

/// A scored plan.
#[derive(Debug, Serialize)]
pub struct ScorePlanResponse {
    pub total: f64,
    pub components: BTreeMap<&'static str, f64>,
    pub weights: BTreeMap<&'static str, f64>,
    pub estimated_arrival: String,
    pub explanation: String,
}

impl ScorePlanResponse {
    pub fn new(plan: &TravelPlan, breakdown: &ScoreBreakdown, explanation: String) -> Self {
        Self {
            total: breakdown.total(),
            components: breakdown
                .components()
                .iter()
                .map(|(term, value)| (term.as_str(), *value))
                .collect(),
            weights: breakdown
                .weights()
                .entries()
                .iter()
                .map(|(term, value)| (term.as_str(), *value))
                .collect(),
            estimated_arrival: format_timestamp(plan.estimated_arrival()),
            explanation,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
