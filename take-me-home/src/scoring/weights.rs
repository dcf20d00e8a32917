//! Scoring terms and their weights.

use std::fmt;
use std::str::FromStr;

use super::ScoringError;

/// One of the five additive terms of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreTerm {
    TotalTravelTime,
    DrivingMinutes,
    FerryRisk,
    WeatherDisruption,
    ReservationPressure,
}

impl ScoreTerm {
    /// All terms in breakdown order.
    pub const ALL: [ScoreTerm; 5] = [
        ScoreTerm::TotalTravelTime,
        ScoreTerm::DrivingMinutes,
        ScoreTerm::FerryRisk,
        ScoreTerm::WeatherDisruption,
        ScoreTerm::ReservationPressure,
    ];

    /// Snake-case name used for weight tuning and serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTerm::TotalTravelTime => "total_travel_time",
            ScoreTerm::DrivingMinutes => "driving_minutes",
            ScoreTerm::FerryRisk => "ferry_risk",
            ScoreTerm::WeatherDisruption => "weather_disruption",
            ScoreTerm::ReservationPressure => "reservation_pressure",
        }
    }

    /// Title-cased label for explanations.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreTerm::TotalTravelTime => "Total Travel Time",
            ScoreTerm::DrivingMinutes => "Driving Minutes",
            ScoreTerm::FerryRisk => "Ferry Risk",
            ScoreTerm::WeatherDisruption => "Weather Disruption",
            ScoreTerm::ReservationPressure => "Reservation Pressure",
        }
    }
}

impl fmt::Display for ScoreTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreTerm {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoreTerm::ALL
            .into_iter()
            .find(|term| term.as_str() == s)
            .ok_or_else(|| ScoringError::InvalidWeightName(s.to_string()))
    }
}

/// Weights applied to each scoring term.
///
/// Only total travel time, driving minutes and ferry risk contribute by
/// default. Values are immutable; [`ScoringWeights::tuned`] and
/// [`ScoringWeights::with_weight`] return modified copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    total_travel_time: f64,
    driving_minutes: f64,
    ferry_risk: f64,
    weather_disruption: f64,
    reservation_pressure: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            total_travel_time: 0.6,
            driving_minutes: 0.3,
            ferry_risk: 0.1,
            weather_disruption: 0.0,
            reservation_pressure: 0.0,
        }
    }
}

impl ScoringWeights {
    /// Returns the weight for `term`.
    pub fn weight(&self, term: ScoreTerm) -> f64 {
        match term {
            ScoreTerm::TotalTravelTime => self.total_travel_time,
            ScoreTerm::DrivingMinutes => self.driving_minutes,
            ScoreTerm::FerryRisk => self.ferry_risk,
            ScoreTerm::WeatherDisruption => self.weather_disruption,
            ScoreTerm::ReservationPressure => self.reservation_pressure,
        }
    }

    /// All weights in breakdown order.
    pub fn entries(&self) -> [(ScoreTerm, f64); 5] {
        ScoreTerm::ALL.map(|term| (term, self.weight(term)))
    }

    /// Returns a copy with one weight replaced.
    pub fn with_weight(mut self, term: ScoreTerm, value: f64) -> Self {
        let slot = match term {
            ScoreTerm::TotalTravelTime => &mut self.total_travel_time,
            ScoreTerm::DrivingMinutes => &mut self.driving_minutes,
            ScoreTerm::FerryRisk => &mut self.ferry_risk,
            ScoreTerm::WeatherDisruption => &mut self.weather_disruption,
            ScoreTerm::ReservationPressure => &mut self.reservation_pressure,
        };
        *slot = value;
        self
    }

    /// Returns a copy with the named weights replaced.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidWeightName` listing every unknown name
    /// (sorted, comma-separated). Nothing is applied in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use take_me_home::scoring::{ScoreTerm, ScoringWeights};
    ///
    /// let base = ScoringWeights::default();
    /// let tuned = base.tuned([("weather_disruption", 0.4)]).unwrap();
    /// assert_eq!(tuned.weight(ScoreTerm::WeatherDisruption), 0.4);
    /// assert_eq!(base.weight(ScoreTerm::WeatherDisruption), 0.0);
    ///
    /// assert!(base.tuned([("comfort", 1.0)]).is_err());
    /// ```
    pub fn tuned<'a>(
        &self,
        overrides: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, ScoringError> {
        let mut parsed = Vec::new();
        let mut unknown = Vec::new();

        for (name, value) in overrides {
            match name.parse::<ScoreTerm>() {
                Ok(term) => parsed.push((term, value)),
                Err(_) => unknown.push(name),
            }
        }

        if !unknown.is_empty() {
            unknown.sort_unstable();
            unknown.dedup();
            return Err(ScoringError::InvalidWeightName(unknown.join(", ")));
        }

        Ok(parsed
            .into_iter()
            .fold(*self, |weights, (term, value)| weights.with_weight(term, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.weight(ScoreTerm::TotalTravelTime), 0.6);
        assert_eq!(weights.weight(ScoreTerm::DrivingMinutes), 0.3);
        assert_eq!(weights.weight(ScoreTerm::FerryRisk), 0.1);
        assert_eq!(weights.weight(ScoreTerm::WeatherDisruption), 0.0);
        assert_eq!(weights.weight(ScoreTerm::ReservationPressure), 0.0);
    }

    #[test]
    fn term_names_roundtrip() {
        for term in ScoreTerm::ALL {
            assert_eq!(term.as_str().parse::<ScoreTerm>().unwrap(), term);
            assert_eq!(term.to_string(), term.as_str());
        }
    }

    #[test]
    fn term_labels() {
        assert_eq!(ScoreTerm::TotalTravelTime.label(), "Total Travel Time");
        assert_eq!(ScoreTerm::ReservationPressure.label(), "Reservation Pressure");
    }

    #[test]
    fn unknown_term() {
        assert_eq!(
            "Ferry_Risk".parse::<ScoreTerm>(),
            Err(ScoringError::InvalidWeightName("Ferry_Risk".into()))
        );
    }

    #[test]
    fn tuned_applies_overrides() {
        let tuned = ScoringWeights::default()
            .tuned([("ferry_risk", 2.0), ("reservation_pressure", 5.0)])
            .unwrap();

        assert_eq!(tuned.weight(ScoreTerm::FerryRisk), 2.0);
        assert_eq!(tuned.weight(ScoreTerm::ReservationPressure), 5.0);
        assert_eq!(tuned.weight(ScoreTerm::TotalTravelTime), 0.6);
    }

    #[test]
    fn tuned_last_override_wins() {
        let tuned = ScoringWeights::default()
            .tuned([("ferry_risk", 2.0), ("ferry_risk", 3.0)])
            .unwrap();
        assert_eq!(tuned.weight(ScoreTerm::FerryRisk), 3.0);
    }

    #[test]
    fn tuned_rejects_unknown_names_without_mutation() {
        let base = ScoringWeights::default();
        let result = base.tuned([("speed", 1.0), ("ferry_risk", 9.0), ("comfort", 1.0)]);

        assert_eq!(
            result,
            Err(ScoringError::InvalidWeightName("comfort, speed".into()))
        );
        assert_eq!(base, ScoringWeights::default());
    }

    #[test]
    fn tuned_empty_is_identity() {
        let base = ScoringWeights::default();
        assert_eq!(base.tuned(Vec::<(&str, f64)>::new()).unwrap(), base);
    }

    #[test]
    fn entries_in_order() {
        let entries = ScoringWeights::default().entries();
        assert_eq!(entries[0], (ScoreTerm::TotalTravelTime, 0.6));
        assert_eq!(entries[4], (ScoreTerm::ReservationPressure, 0.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn known_name() -> impl Strategy<Value = &'static str> {
        prop::sample::select(ScoreTerm::ALL.map(|t| t.as_str()).to_vec())
    }

    proptest! {
        /// Any name outside the five terms is rejected
        #[test]
        fn unknown_names_rejected(name in "[a-z_]{1,24}", value in -10.0f64..10.0) {
            prop_assume!(name.parse::<ScoreTerm>().is_err());
            let base = ScoringWeights::default();
            let result = base.tuned([(name.as_str(), value)]);
            prop_assert_eq!(result, Err(ScoringError::InvalidWeightName(name.clone())));
        }

        /// Known names set exactly that weight and leave the rest alone
        #[test]
        fn known_names_only_touch_their_term(name in known_name(), value in -10.0f64..10.0) {
            let base = ScoringWeights::default();
            let tuned = base.tuned([(name, value)]).unwrap();
            let target: ScoreTerm = name.parse().unwrap();

            for term in ScoreTerm::ALL {
                if term == target {
                    prop_assert_eq!(tuned.weight(term), value);
                } else {
                    prop_assert_eq!(tuned.weight(term), base.weight(term));
                }
            }
        }
    }
}
