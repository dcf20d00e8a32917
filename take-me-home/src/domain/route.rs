//! Routes and route evaluation.
//!
//! A route is walked as a strict chain: each leg starts when the previous
//! one arrives. Waiting at ferry terminals is accumulated separately so
//! reports can show how much of the trip was spent idle.

use chrono::{Duration, NaiveDateTime};

use super::{DomainError, LegResult, TravelLeg, format_duration};

/// A named, ordered sequence of legs.
///
/// # Invariants
///
/// - At least one leg
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    legs: Vec<TravelLeg>,
}

impl Route {
    /// Construct a route.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyRoute` if `legs` is empty.
    pub fn new(name: impl Into<String>, legs: Vec<TravelLeg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyRoute);
        }
        Ok(Self {
            name: name.into(),
            legs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn legs(&self) -> &[TravelLeg] {
        &self.legs
    }

    /// Returns true if any leg is a ferry crossing.
    pub fn has_ferry(&self) -> bool {
        self.legs.iter().any(TravelLeg::is_ferry)
    }
}

/// Aggregate outcome of walking a route from a start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    pub route_name: String,
    pub legs: Vec<LegResult>,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    /// Always `arrival - departure`
    pub total_duration: Duration,
    /// Sum of terminal waits across legs
    pub waits: Duration,
}

impl RouteResult {
    /// Warnings for legs whose risk tier is critical or tight.
    pub fn slack_warnings(&self) -> Vec<String> {
        self.legs
            .iter()
            .filter_map(|leg| match (leg.slack, leg.risk) {
                (Some(slack), Some(risk)) if risk.is_warning() => Some(format!(
                    "{} slack {} classified as {}",
                    leg.name,
                    format_duration(slack),
                    risk
                )),
                _ => None,
            })
            .collect()
    }

    /// Returns the first ferry leg result, if the route crossed water.
    pub fn ferry_leg(&self) -> Option<(usize, &LegResult)> {
        self.legs
            .iter()
            .enumerate()
            .find(|(_, leg)| leg.risk.is_some())
    }
}

/// Walk `route` from `start`, threading each leg's arrival into the next.
///
/// # Errors
///
/// Propagates the first leg failure, typically `NoViableSailing`.
///
/// # Examples
///
/// ```
/// use take_me_home::domain::{DriveLeg, Route, TravelLeg, evaluate_route};
/// use chrono::{Duration, NaiveDate};
///
/// let route = Route::new(
///     "Tacoma Narrows",
///     vec![
///         TravelLeg::from(DriveLeg::new("SeaTac to Tacoma Narrows", Duration::minutes(42), "I-5 south").unwrap()),
///         TravelLeg::from(DriveLeg::new("Tacoma Narrows to Hood Canal Bridge", Duration::minutes(65), "WA-16 + WA-3").unwrap()),
///     ],
/// )
/// .unwrap();
///
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(14, 5, 0).unwrap();
/// let result = evaluate_route(&route, start).unwrap();
/// assert_eq!(result.arrival.format("%H:%M").to_string(), "15:52");
/// ```
pub fn evaluate_route(route: &Route, start: NaiveDateTime) -> Result<RouteResult, DomainError> {
    let mut legs = Vec::with_capacity(route.legs.len());
    let mut cursor = start;
    let mut waits = Duration::zero();

    for leg in &route.legs {
        let result = leg.traverse(cursor)?;
        waits += result.wait;
        cursor = result.arrival;
        legs.push(result);
    }

    Ok(RouteResult {
        route_name: route.name.clone(),
        legs,
        departure: start,
        arrival: cursor,
        total_duration: cursor - start,
        waits,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{DriveLeg, FerryLeg, FerryTiming};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn leg_strategy() -> impl Strategy<Value = TravelLeg> {
        prop_oneof![
            (0i64..120).prop_map(|m| {
                TravelLeg::from(DriveLeg::new("Drive", Duration::minutes(m), "prop").unwrap())
            }),
            (
                prop::collection::vec(0i64..2880, 1..10),
                1i64..60,
                0i64..30,
                0i64..15,
            )
                .prop_map(|(departures, crossing, cutoff, buffer)| {
                    let sailings = departures
                        .into_iter()
                        .map(|m| base() + Duration::minutes(m))
                        .collect();
                    let timing =
                        FerryTiming::new(Duration::minutes(crossing), Duration::minutes(cutoff))
                            .with_buffer(Duration::minutes(buffer));
                    TravelLeg::from(FerryLeg::new("Ferry", "Prop", sailings, timing).unwrap())
                }),
        ]
    }

    proptest! {
        /// Final arrival is start plus the sum of each leg's duration and wait
        #[test]
        fn chaining_identity(
            legs in prop::collection::vec(leg_strategy(), 1..5),
            start in 0i64..600,
        ) {
            let route = Route::new("Prop route", legs).unwrap();
            let start = base() + Duration::minutes(start);

            if let Ok(result) = evaluate_route(&route, start) {
                let moving: Duration = result
                    .legs
                    .iter()
                    .fold(Duration::zero(), |acc, leg| acc + leg.duration + leg.wait);

                prop_assert_eq!(result.arrival, start + moving);
                prop_assert_eq!(result.total_duration, result.arrival - start);
                prop_assert_eq!(
                    result.waits,
                    result.legs.iter().fold(Duration::zero(), |acc, leg| acc + leg.wait)
                );
                for pair in result.legs.windows(2) {
                    prop_assert_eq!(pair[0].arrival, pair[1].departure);
                }
            }
        }
    }
}
