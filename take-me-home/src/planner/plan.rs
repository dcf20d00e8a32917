//! Turning an evaluated route into a scorable plan.

use crate::domain::{LegResult, RiskTier, RouteResult};
use crate::scoring::{FerryOption, ScoringError, TravelPlan};

/// Numeric ferry risk for a slack tier.
pub fn risk_score(tier: RiskTier) -> f64 {
    match tier {
        RiskTier::Critical => 0.9,
        RiskTier::Tight => 0.6,
        RiskTier::Moderate => 0.3,
        RiskTier::Comfortable => 0.1,
    }
}

fn elapsed_minutes(legs: &[LegResult]) -> i64 {
    legs.iter()
        .map(|leg| (leg.duration + leg.wait).num_minutes())
        .sum()
}

/// Build a [`TravelPlan`] around the first ferry crossing of `result`.
///
/// Legs before the crossing count as pre-drive, legs after it as
/// post-drive. The terminal wait becomes the ferry check-in buffer.
/// Returns `Ok(None)` for routes that never board a ferry.
///
/// # Errors
///
/// Returns `Err` if the derived plan fails validation.
pub fn travel_plan_from_result(result: &RouteResult) -> Result<Option<TravelPlan>, ScoringError> {
    let Some((index, ferry_leg)) = result.ferry_leg() else {
        return Ok(None);
    };
    let Some(risk) = ferry_leg.risk else {
        return Ok(None);
    };

    let pre = elapsed_minutes(&result.legs[..index]);
    let post = elapsed_minutes(&result.legs[index + 1..]);

    let sailing = ferry_leg.departure + ferry_leg.wait;
    let mut ferry = FerryOption::new(
        ferry_leg.name.clone(),
        sailing,
        ferry_leg.arrival,
        risk_score(risk),
        ferry_leg.wait.num_minutes(),
    )?;
    if let Some(notes) = &ferry_leg.notes {
        ferry = ferry.with_notes(notes.clone());
    }

    TravelPlan::builder(ferry).driving(pre, post).build().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluate_route;
    use crate::planner::build_candidate_routes;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn results() -> Vec<RouteResult> {
        build_candidate_routes(at(14, 5).date())
            .unwrap()
            .iter()
            .map(|route| evaluate_route(route, at(14, 5)).unwrap())
            .collect()
    }

    #[test]
    fn risk_scores_decrease_with_slack() {
        assert!(risk_score(RiskTier::Critical) > risk_score(RiskTier::Tight));
        assert!(risk_score(RiskTier::Tight) > risk_score(RiskTier::Moderate));
        assert!(risk_score(RiskTier::Moderate) > risk_score(RiskTier::Comfortable));
    }

    #[test]
    fn edmonds_plan() {
        let plan = travel_plan_from_result(&results()[0]).unwrap().unwrap();

        assert_eq!(plan.driving_minutes_pre(), 47);
        assert_eq!(plan.driving_minutes_post(), 36);
        assert_eq!(plan.ferry().departure(), at(15, 40));
        assert_eq!(plan.ferry().arrival(), at(16, 12));
        assert_eq!(plan.ferry().buffer_minutes(), 48);
        assert_eq!(plan.ferry().risk(), 0.1);
        assert_eq!(plan.total_travel_minutes(), 163);
        assert_eq!(plan.estimated_arrival(), at(16, 48));
        assert_eq!(plan.departure_time(), at(14, 5));
    }

    #[test]
    fn bainbridge_plan() {
        let plan = travel_plan_from_result(&results()[1]).unwrap().unwrap();

        assert_eq!(plan.ferry().departure(), at(15, 25));
        assert_eq!(plan.ferry().risk(), 0.3);
        assert_eq!(plan.total_driving_minutes(), 78);
        assert_eq!(plan.total_travel_minutes(), 163);
    }

    #[test]
    fn drive_only_route_has_no_plan() {
        assert_eq!(travel_plan_from_result(&results()[2]), Ok(None));
    }
}
