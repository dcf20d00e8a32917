//! Travel leg types.
//!
//! A route is a chain of legs. Each leg knows how to traverse itself from a
//! start time: a drive takes a fixed duration, a ferry waits for the first
//! scheduled sailing that can still be caught safely and then crosses.

use std::cmp::max;
use std::fmt;

use chrono::{Duration, NaiveDateTime};

use super::{DomainError, format_duration};

/// Default safety buffer beyond the loading cutoff (minutes).
pub const DEFAULT_FERRY_BUFFER_MINS: i64 = 5;

/// Slack within `buffer + TIGHT_MARGIN_MINS` is classified as tight.
const TIGHT_MARGIN_MINS: i64 = 5;

/// Slack within `buffer + MODERATE_MARGIN_MINS` is classified as moderate.
const MODERATE_MARGIN_MINS: i64 = 15;

/// How risky it is to aim for a particular sailing.
///
/// Variants are ordered from most to least risky, so `Ord` follows slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    Critical,
    Tight,
    Moderate,
    Comfortable,
}

impl RiskTier {
    /// Classify slack against the configured buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use take_me_home::domain::RiskTier;
    /// use chrono::Duration;
    ///
    /// let buffer = Duration::minutes(7);
    /// assert_eq!(RiskTier::classify(Duration::minutes(7), buffer), RiskTier::Critical);
    /// assert_eq!(RiskTier::classify(Duration::minutes(12), buffer), RiskTier::Tight);
    /// assert_eq!(RiskTier::classify(Duration::minutes(22), buffer), RiskTier::Moderate);
    /// assert_eq!(RiskTier::classify(Duration::minutes(23), buffer), RiskTier::Comfortable);
    /// ```
    pub fn classify(slack: Duration, buffer: Duration) -> Self {
        if slack <= buffer {
            RiskTier::Critical
        } else if slack <= buffer + Duration::minutes(TIGHT_MARGIN_MINS) {
            RiskTier::Tight
        } else if slack <= buffer + Duration::minutes(MODERATE_MARGIN_MINS) {
            RiskTier::Moderate
        } else {
            RiskTier::Comfortable
        }
    }

    /// Returns the lowercase tag used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Critical => "critical",
            RiskTier::Tight => "tight",
            RiskTier::Moderate => "moderate",
            RiskTier::Comfortable => "comfortable",
        }
    }

    /// Returns true for tiers that should be surfaced as slack warnings.
    pub fn is_warning(&self) -> bool {
        matches!(self, RiskTier::Critical | RiskTier::Tight)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of traversing one leg from a given start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegResult {
    /// Leg name
    pub name: String,
    /// When the traveller reached the start of the leg
    pub departure: NaiveDateTime,
    /// When the traveller reached the end of the leg
    pub arrival: NaiveDateTime,
    /// Time spent moving (drive time or crossing time)
    pub duration: Duration,
    /// Time spent waiting before moving
    pub wait: Duration,
    /// Margin beyond the loading cutoff (ferry legs only)
    pub slack: Option<Duration>,
    /// Risk of the chosen sailing (ferry legs only)
    pub risk: Option<RiskTier>,
    /// Free-text note for reports
    pub notes: Option<String>,
}

/// A drive segment with a fixed travel time estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveLeg {
    name: String,
    duration: Duration,
    conditions: String,
}

impl DriveLeg {
    /// Construct a drive leg.
    ///
    /// `conditions` describes the assumed traffic, e.g. "I-5 south".
    ///
    /// # Errors
    ///
    /// Returns `Err` if `duration` is negative or longer than a week.
    pub fn new(
        name: impl Into<String>,
        duration: Duration,
        conditions: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if duration < Duration::zero() {
            return Err(DomainError::InvalidLeg("drive duration cannot be negative"));
        }
        if duration > Duration::weeks(1) {
            return Err(DomainError::InvalidLeg("drive duration cannot exceed one week"));
        }
        Ok(Self {
            name: name.into(),
            duration,
            conditions: conditions.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn conditions(&self) -> &str {
        &self.conditions
    }

    /// Drive from `start`. Never fails.
    pub fn traverse(&self, start: NaiveDateTime) -> LegResult {
        LegResult {
            name: self.name.clone(),
            departure: start,
            arrival: start + self.duration,
            duration: self.duration,
            wait: Duration::zero(),
            slack: None,
            risk: None,
            notes: Some(format!("{} traffic assumption", self.conditions)),
        }
    }
}

/// Timing parameters of a ferry crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FerryTiming {
    /// Time on the water
    pub crossing: Duration,
    /// How long before departure a vehicle must be at the terminal
    pub loading_cutoff: Duration,
    /// Extra safety margin required beyond the loading cutoff
    pub buffer: Duration,
}

impl FerryTiming {
    /// Create timing with the default buffer.
    pub fn new(crossing: Duration, loading_cutoff: Duration) -> Self {
        Self {
            crossing,
            loading_cutoff,
            buffer: Duration::minutes(DEFAULT_FERRY_BUFFER_MINS),
        }
    }

    /// Set the safety buffer.
    pub fn with_buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.crossing <= Duration::zero() {
            return Err(DomainError::InvalidLeg("crossing must be positive"));
        }
        if self.loading_cutoff < Duration::zero() {
            return Err(DomainError::InvalidLeg("loading cutoff cannot be negative"));
        }
        if self.buffer < Duration::zero() {
            return Err(DomainError::InvalidLeg("buffer cannot be negative"));
        }
        Ok(())
    }
}

/// A sailing that can still be caught, with its alignment metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FerrySailingOption {
    pub departure: NaiveDateTime,
    pub wait: Duration,
    pub slack: Duration,
    pub risk: RiskTier,
}

/// A ferry segment backed by an explicit sailing schedule.
///
/// # Invariants
///
/// - Sailings are sorted by departure time
/// - Crossing is positive; cutoff and buffer are non-negative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FerryLeg {
    name: String,
    label: String,
    sailings: Vec<NaiveDateTime>,
    timing: FerryTiming,
}

impl FerryLeg {
    /// Construct a ferry leg. Sailings may be given in any order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the timing parameters are out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use take_me_home::domain::{FerryLeg, FerryTiming, schedule};
    /// use chrono::{Duration, NaiveDate};
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    /// let timing = FerryTiming::new(Duration::minutes(32), Duration::minutes(20))
    ///     .with_buffer(Duration::minutes(7));
    /// let leg = FerryLeg::new(
    ///     "Edmonds–Kingston ferry",
    ///     "WSF Edmonds–Kingston",
    ///     schedule(day, &["15:40", "15:10"]).unwrap(),
    ///     timing,
    /// )
    /// .unwrap();
    ///
    /// let arrival = day.and_hms_opt(14, 52, 0).unwrap();
    /// let options = leg.viable_sailings(arrival);
    /// assert_eq!(options[0].departure, day.and_hms_opt(15, 40, 0).unwrap());
    /// ```
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        mut sailings: Vec<NaiveDateTime>,
        timing: FerryTiming,
    ) -> Result<Self, DomainError> {
        timing.validate()?;
        sailings.sort();
        Ok(Self {
            name: name.into(),
            label: label.into(),
            sailings,
            timing,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the sailings in departure order.
    pub fn sailings(&self) -> &[NaiveDateTime] {
        &self.sailings
    }

    pub fn timing(&self) -> &FerryTiming {
        &self.timing
    }

    /// Latest terminal arrival that still catches `departure` with the buffer intact.
    pub fn latest_arrival_for(&self, departure: NaiveDateTime) -> NaiveDateTime {
        departure - self.timing.loading_cutoff - self.timing.buffer
    }

    /// Sailings that can be caught when arriving at the terminal at `arrival`.
    ///
    /// A sailing is viable when `(departure - loading_cutoff) - arrival`
    /// is at least the buffer. Options are returned in departure order.
    pub fn viable_sailings(&self, arrival: NaiveDateTime) -> Vec<FerrySailingOption> {
        self.sailings
            .iter()
            .filter_map(|&departure| {
                let slack = (departure - self.timing.loading_cutoff) - arrival;
                if slack < self.timing.buffer {
                    return None;
                }
                Some(FerrySailingOption {
                    departure,
                    wait: max(Duration::zero(), departure - arrival),
                    slack,
                    risk: RiskTier::classify(slack, self.timing.buffer),
                })
            })
            .collect()
    }

    /// Take the earliest viable sailing after arriving at `start`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoViableSailing` when every scheduled sailing
    /// is already out of reach.
    pub fn traverse(&self, start: NaiveDateTime) -> Result<LegResult, DomainError> {
        let choice = self
            .viable_sailings(start)
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::NoViableSailing {
                leg: self.name.clone(),
                arrival: start,
            })?;

        let notes = format!(
            "{} departure {}; wait {}; slack {} ({})",
            self.label,
            choice.departure.format("%H:%M"),
            format_duration(choice.wait),
            format_duration(choice.slack),
            choice.risk
        );

        Ok(LegResult {
            name: self.name.clone(),
            departure: start,
            arrival: choice.departure + self.timing.crossing,
            duration: self.timing.crossing,
            wait: choice.wait,
            slack: Some(choice.slack),
            risk: Some(choice.risk),
            notes: Some(notes),
        })
    }
}

/// A segment of a route: either a drive or a scheduled ferry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TravelLeg {
    Drive(DriveLeg),
    Ferry(FerryLeg),
}

impl TravelLeg {
    /// Returns the leg name.
    pub fn name(&self) -> &str {
        match self {
            TravelLeg::Drive(leg) => leg.name(),
            TravelLeg::Ferry(leg) => leg.name(),
        }
    }

    /// Traverse the leg starting at `start`.
    pub fn traverse(&self, start: NaiveDateTime) -> Result<LegResult, DomainError> {
        match self {
            TravelLeg::Drive(leg) => Ok(leg.traverse(start)),
            TravelLeg::Ferry(leg) => leg.traverse(start),
        }
    }

    pub fn is_ferry(&self) -> bool {
        matches!(self, TravelLeg::Ferry(_))
    }

    pub fn as_ferry(&self) -> Option<&FerryLeg> {
        match self {
            TravelLeg::Ferry(leg) => Some(leg),
            TravelLeg::Drive(_) => None,
        }
    }
}

impl From<DriveLeg> for TravelLeg {
    fn from(leg: DriveLeg) -> Self {
        TravelLeg::Drive(leg)
    }
}

impl From<FerryLeg> for TravelLeg {
    fn from(leg: FerryLeg) -> Self {
        TravelLeg::Ferry(leg)
    }
}
