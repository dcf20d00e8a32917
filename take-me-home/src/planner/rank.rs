//! Ranking of evaluated routes.

use std::cmp::Ordering;

use super::RouteEvaluation;

/// Rank evaluations by arrival.
///
/// Ties are broken by:
/// 1. Total terminal wait (less is better)
/// 2. Total duration (shorter is better)
/// 3. Route name
pub fn rank_by_arrival(mut evaluations: Vec<RouteEvaluation>) -> Vec<RouteEvaluation> {
    evaluations.sort_by(|a, b| {
        let (a, b) = (&a.result, &b.result);
        a.arrival
            .cmp(&b.arrival)
            .then_with(|| a.waits.cmp(&b.waits))
            .then_with(|| a.total_duration.cmp(&b.total_duration))
            .then_with(|| a.route_name.cmp(&b.route_name))
    });
    evaluations
}

/// Rank evaluations by composite score, lowest first.
///
/// Unscored evaluations (no ferry) go last, in arrival order.
pub fn rank_by_score(evaluations: Vec<RouteEvaluation>) -> Vec<RouteEvaluation> {
    let mut ranked = rank_by_arrival(evaluations);
    ranked.sort_by(|a, b| {
        match (
            a.score.as_ref().map(|s| s.total()),
            b.score.as_ref().map(|s| s.total()),
        ) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteResult;
    use crate::scoring::{FerryOption, ScoringWeights, TravelPlan, score_plan};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn evaluation(name: &str, arrival: NaiveDateTime, waits: i64, score: Option<i64>) -> RouteEvaluation {
        let start = at(14, 0);
        let score = score.map(|driving| {
            let ferry = FerryOption::new("f", at(15, 0), at(15, 30), 0.0, 0).unwrap();
            let plan = TravelPlan::builder(ferry).driving(driving, 0).build().unwrap();
            score_plan(&plan, &ScoringWeights::default())
        });
        RouteEvaluation {
            result: RouteResult {
                route_name: name.to_string(),
                legs: vec![],
                departure: start,
                arrival,
                total_duration: arrival - start,
                waits: Duration::minutes(waits),
            },
            score,
        }
    }

    fn names(evaluations: &[RouteEvaluation]) -> Vec<&str> {
        evaluations
            .iter()
            .map(|e| e.result.route_name.as_str())
            .collect()
    }

    #[test]
    fn arrival_first() {
        let ranked = rank_by_arrival(vec![
            evaluation("late", at(17, 0), 0, None),
            evaluation("early", at(15, 0), 0, None),
            evaluation("middle", at(16, 0), 0, None),
        ]);
        assert_eq!(names(&ranked), ["early", "middle", "late"]);
    }

    #[test]
    fn arrival_tie_prefers_less_waiting() {
        let ranked = rank_by_arrival(vec![
            evaluation("Seattle", at(16, 48), 50, None),
            evaluation("Edmonds", at(16, 48), 48, None),
        ]);
        assert_eq!(names(&ranked), ["Edmonds", "Seattle"]);
    }

    #[test]
    fn full_tie_uses_name() {
        let ranked = rank_by_arrival(vec![
            evaluation("b", at(16, 0), 10, None),
            evaluation("a", at(16, 0), 10, None),
        ]);
        assert_eq!(names(&ranked), ["a", "b"]);
    }

    #[test]
    fn score_lowest_first_unscored_last() {
        let ranked = rank_by_score(vec![
            evaluation("road", at(15, 0), 0, None),
            evaluation("costly", at(16, 0), 0, Some(90)),
            evaluation("cheap", at(17, 0), 0, Some(10)),
        ]);
        assert_eq!(names(&ranked), ["cheap", "costly", "road"]);
    }

    #[test]
    fn empty_input() {
        assert!(rank_by_arrival(vec![]).is_empty());
        assert!(rank_by_score(vec![]).is_empty());
    }
}
