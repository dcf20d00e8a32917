//! Composite plan scoring.
//!
//! The score is a cost: lower is better. Each term contributes
//! independently, so a breakdown can show where the cost comes from.

use std::collections::BTreeMap;

use super::{FutureContext, ScoreTerm, ScoringWeights, TravelPlan};

/// Total score plus the contribution of each evaluated term.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    total: f64,
    components: Vec<(ScoreTerm, f64)>,
    weights: ScoringWeights,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Evaluated terms in breakdown order.
    pub fn components(&self) -> &[(ScoreTerm, f64)] {
        &self.components
    }

    /// The weights the score was computed with.
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Contribution of `term`, or 0.0 if it was not evaluated.
    pub fn component(&self, term: ScoreTerm) -> f64 {
        self.components
            .iter()
            .find(|(t, _)| *t == term)
            .map_or(0.0, |(_, value)| *value)
    }

    /// Returns true if `term` was evaluated for this plan.
    pub fn contains(&self, term: ScoreTerm) -> bool {
        self.components.iter().any(|(t, _)| *t == term)
    }

    /// Components keyed by term name, plus a `total` entry.
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        self.components
            .iter()
            .map(|(term, value)| (term.as_str(), *value))
            .chain(std::iter::once(("total", self.total)))
            .collect()
    }
}

fn weather_adjustment(context: &FutureContext, weights: &ScoringWeights) -> Option<f64> {
    context.weather.as_ref().map(|weather| {
        weather.normalized_severity()
            * weather.expected_delay_minutes as f64
            * weights.weight(ScoreTerm::WeatherDisruption)
    })
}

fn reservation_adjustment(context: &FutureContext, weights: &ScoringWeights) -> Option<f64> {
    context.reservation.as_ref().map(|reservation| {
        reservation.normalized_pressure() * weights.weight(ScoreTerm::ReservationPressure)
    })
}

/// Score `plan` under `weights`.
///
/// Travel time, driving minutes and ferry risk are always present in the
/// breakdown. Weather and reservation terms appear exactly when the plan
/// carries the corresponding signal, even if they evaluate to zero.
///
/// # Examples
///
/// ```
/// use take_me_home::scoring::{FerryOption, ScoreTerm, ScoringWeights, TravelPlan, score_plan};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let ferry = FerryOption::new(
///     "Edmonds–Kingston",
///     day.and_hms_opt(15, 0, 0).unwrap(),
///     day.and_hms_opt(15, 25, 0).unwrap(),
///     0.25,
///     0,
/// )
/// .unwrap();
/// let plan = TravelPlan::builder(ferry).driving(45, 20).build().unwrap();
///
/// let breakdown = score_plan(&plan, &ScoringWeights::default());
/// assert!((breakdown.total() - 73.525).abs() < 1e-9);
/// assert!(!breakdown.contains(ScoreTerm::WeatherDisruption));
/// ```
pub fn score_plan(plan: &TravelPlan, weights: &ScoringWeights) -> ScoreBreakdown {
    let mut components = vec![
        (
            ScoreTerm::TotalTravelTime,
            plan.total_travel_minutes() as f64 * weights.weight(ScoreTerm::TotalTravelTime),
        ),
        (
            ScoreTerm::DrivingMinutes,
            plan.total_driving_minutes() as f64 * weights.weight(ScoreTerm::DrivingMinutes),
        ),
        (
            ScoreTerm::FerryRisk,
            plan.ferry().risk() * weights.weight(ScoreTerm::FerryRisk),
        ),
    ];

    let context = plan.future_context();
    if let Some(penalty) = weather_adjustment(context, weights) {
        components.push((ScoreTerm::WeatherDisruption, penalty));
    }
    if let Some(penalty) = reservation_adjustment(context, weights) {
        components.push((ScoreTerm::ReservationPressure, penalty));
    }

    let total = components.iter().map(|(_, value)| value).sum();

    ScoreBreakdown {
        total,
        components,
        weights: *weights,
    }
}
