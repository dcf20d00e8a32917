//! Plan model for scoring.
//!
//! A [`TravelPlan`] describes one door-to-door scenario built around a
//! single chosen sailing. Forward-looking signals (weather, reservations)
//! hang off a [`FutureContext`] and only affect the score when present.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use super::ScoringError;

/// Upper bound for every minute count in a plan: one week.
const MAX_PLAN_MINUTES: i64 = 7 * 24 * 60;

/// A chosen ferry sailing.
///
/// # Invariants
///
/// - `arrival` is strictly after `departure`
/// - `risk` is in `[0, 1]`
/// - `buffer_minutes` is between zero and one week
#[derive(Debug, Clone, PartialEq)]
pub struct FerryOption {
    name: String,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    risk: f64,
    buffer_minutes: i64,
    notes: Option<String>,
}

impl FerryOption {
    /// Construct a ferry option.
    ///
    /// `buffer_minutes` is the check-in time spent at the terminal before
    /// the sailing.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidFerryOption` if any invariant fails.
    pub fn new(
        name: impl Into<String>,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        risk: f64,
        buffer_minutes: i64,
    ) -> Result<Self, ScoringError> {
        if arrival <= departure {
            return Err(ScoringError::InvalidFerryOption(
                "arrival must be after departure",
            ));
        }
        if !(0.0..=1.0).contains(&risk) {
            return Err(ScoringError::InvalidFerryOption(
                "risk must be between 0 and 1",
            ));
        }
        if buffer_minutes < 0 {
            return Err(ScoringError::InvalidFerryOption(
                "buffer minutes cannot be negative",
            ));
        }
        if buffer_minutes > MAX_PLAN_MINUTES {
            return Err(ScoringError::InvalidFerryOption(
                "buffer minutes cannot exceed one week",
            ));
        }
        Ok(Self {
            name: name.into(),
            departure,
            arrival,
            risk,
            buffer_minutes,
            notes: None,
        })
    }

    /// Attach a free-text note.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn risk(&self) -> f64 {
        self.risk
    }

    pub fn buffer_minutes(&self) -> i64 {
        self.buffer_minutes
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Crossing time in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.arrival - self.departure).num_minutes()
    }
}

/// Forecast weather signal for the crossing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDisruption {
    /// Severity on a 0-10 scale
    pub severity: i32,
    pub expected_delay_minutes: i64,
    pub description: Option<String>,
}

impl WeatherDisruption {
    pub fn new(severity: i32, expected_delay_minutes: i64) -> Self {
        Self {
            severity,
            expected_delay_minutes,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Severity scaled to `[0, 1]`.
    pub fn normalized_severity(&self) -> f64 {
        (f64::from(self.severity) / 10.0).clamp(0.0, 1.0)
    }
}

/// Reservation status reported for a sailing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationStatus {
    Available,
    Limited,
    Waitlist,
    SoldOut,
    /// Any status string we do not recognise, kept verbatim
    Unknown(String),
}

impl ReservationStatus {
    /// Parse a status case-insensitively. Unrecognised values are kept.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "available" => ReservationStatus::Available,
            "limited" => ReservationStatus::Limited,
            "waitlist" => ReservationStatus::Waitlist,
            "sold_out" => ReservationStatus::SoldOut,
            _ => ReservationStatus::Unknown(s.to_string()),
        }
    }

    /// Urgency implied by the status alone.
    pub fn pressure(&self) -> f64 {
        match self {
            ReservationStatus::Available => 0.0,
            ReservationStatus::Limited => 0.5,
            ReservationStatus::Waitlist => 0.75,
            ReservationStatus::SoldOut => 1.0,
            ReservationStatus::Unknown(_) => 0.0,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Available => f.write_str("available"),
            ReservationStatus::Limited => f.write_str("limited"),
            ReservationStatus::Waitlist => f.write_str("waitlist"),
            ReservationStatus::SoldOut => f.write_str("sold_out"),
            ReservationStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Known reservation availability for a sailing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationAvailability {
    status: ReservationStatus,
    confidence: f64,
    notes: Option<String>,
}

impl ReservationAvailability {
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidTravelPlan` if `confidence` is outside `[0, 1]`.
    pub fn new(status: ReservationStatus, confidence: f64) -> Result<Self, ScoringError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ScoringError::InvalidTravelPlan(
                "reservation confidence must be between 0 and 1",
            ));
        }
        Ok(Self {
            status,
            confidence,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn status(&self) -> &ReservationStatus {
        &self.status
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Urgency in `[0, 1]`: the larger of the status pressure and confidence.
    pub fn normalized_pressure(&self) -> f64 {
        self.status.pressure().max(self.confidence)
    }
}

/// Optional forward-looking signals attached to a plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FutureContext {
    pub weather: Option<WeatherDisruption>,
    pub reservation: Option<ReservationAvailability>,
    pub notes: Option<String>,
}

impl FutureContext {
    pub fn with_weather(mut self, weather: WeatherDisruption) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_reservation(mut self, reservation: ReservationAvailability) -> Self {
        self.reservation = Some(reservation);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A door-to-door travel scenario around one sailing.
///
/// Built with [`TravelPlan::builder`]; all minute counts are between zero
/// and one week, and both door times are representable.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelPlan {
    driving_minutes_pre: i64,
    driving_minutes_post: i64,
    ferry: FerryOption,
    prep_buffer_minutes: i64,
    arrival_buffer_minutes: i64,
    future_context: FutureContext,
    estimated_arrival: NaiveDateTime,
    departure_time: NaiveDateTime,
}

impl TravelPlan {
    /// Start building a plan around `ferry`.
    ///
    /// # Examples
    ///
    /// ```
    /// use take_me_home::scoring::{FerryOption, TravelPlan};
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    /// let ferry = FerryOption::new(
    ///     "Edmonds–Kingston",
    ///     day.and_hms_opt(15, 40, 0).unwrap(),
    ///     day.and_hms_opt(16, 12, 0).unwrap(),
    ///     0.1,
    ///     10,
    /// )
    /// .unwrap();
    ///
    /// let plan = TravelPlan::builder(ferry)
    ///     .driving(47, 36)
    ///     .buffers(15, 5)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(plan.total_travel_minutes(), 83 + 32 + 30);
    /// ```
    pub fn builder(ferry: FerryOption) -> TravelPlanBuilder {
        TravelPlanBuilder {
            ferry,
            driving_minutes_pre: 0,
            driving_minutes_post: 0,
            prep_buffer_minutes: 0,
            arrival_buffer_minutes: 0,
            future_context: FutureContext::default(),
        }
    }

    pub fn ferry(&self) -> &FerryOption {
        &self.ferry
    }

    pub fn driving_minutes_pre(&self) -> i64 {
        self.driving_minutes_pre
    }

    pub fn driving_minutes_post(&self) -> i64 {
        self.driving_minutes_post
    }

    pub fn prep_buffer_minutes(&self) -> i64 {
        self.prep_buffer_minutes
    }

    pub fn arrival_buffer_minutes(&self) -> i64 {
        self.arrival_buffer_minutes
    }

    pub fn future_context(&self) -> &FutureContext {
        &self.future_context
    }

    pub fn total_driving_minutes(&self) -> i64 {
        self.driving_minutes_pre + self.driving_minutes_post
    }

    /// Prep, arrival and ferry check-in buffers combined.
    pub fn total_buffer_minutes(&self) -> i64 {
        self.prep_buffer_minutes + self.arrival_buffer_minutes + self.ferry.buffer_minutes
    }

    /// Driving plus crossing plus buffers.
    pub fn total_travel_minutes(&self) -> i64 {
        self.total_driving_minutes() + self.ferry.duration_minutes() + self.total_buffer_minutes()
    }

    /// Door-to-door arrival estimate: landing plus post drive and arrival buffer.
    pub fn estimated_arrival(&self) -> NaiveDateTime {
        self.estimated_arrival
    }

    /// When to leave the door to make the sailing with all buffers intact.
    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure_time
    }
}

/// Builder for [`TravelPlan`]. Validation happens in [`TravelPlanBuilder::build`].
#[derive(Debug, Clone)]
pub struct TravelPlanBuilder {
    ferry: FerryOption,
    driving_minutes_pre: i64,
    driving_minutes_post: i64,
    prep_buffer_minutes: i64,
    arrival_buffer_minutes: i64,
    future_context: FutureContext,
}

impl TravelPlanBuilder {
    /// Drive minutes before and after the crossing.
    pub fn driving(mut self, pre: i64, post: i64) -> Self {
        self.driving_minutes_pre = pre;
        self.driving_minutes_post = post;
        self
    }

    /// Prep buffer before leaving and arrival buffer at the destination.
    pub fn buffers(mut self, prep: i64, arrival: i64) -> Self {
        self.prep_buffer_minutes = prep;
        self.arrival_buffer_minutes = arrival;
        self
    }

    pub fn future_context(mut self, context: FutureContext) -> Self {
        self.future_context = context;
        self
    }

    /// # Errors
    ///
    /// Returns `ScoringError::InvalidTravelPlan` naming the first field that
    /// is negative or longer than a week, or when the door times fall
    /// outside the representable calendar.
    pub fn build(self) -> Result<TravelPlan, ScoringError> {
        let fields = [
            (
                self.driving_minutes_pre,
                "driving_minutes_pre cannot be negative",
                "driving_minutes_pre cannot exceed one week",
            ),
            (
                self.driving_minutes_post,
                "driving_minutes_post cannot be negative",
                "driving_minutes_post cannot exceed one week",
            ),
            (
                self.prep_buffer_minutes,
                "prep_buffer_minutes cannot be negative",
                "prep_buffer_minutes cannot exceed one week",
            ),
            (
                self.arrival_buffer_minutes,
                "arrival_buffer_minutes cannot be negative",
                "arrival_buffer_minutes cannot exceed one week",
            ),
        ];
        for (value, negative, too_long) in fields {
            if value < 0 {
                return Err(ScoringError::InvalidTravelPlan(negative));
            }
            if value > MAX_PLAN_MINUTES {
                return Err(ScoringError::InvalidTravelPlan(too_long));
            }
        }

        // Each sum is at most three weeks of minutes.
        let after_landing =
            Duration::minutes(self.driving_minutes_post + self.arrival_buffer_minutes);
        let before_sailing = Duration::minutes(
            self.driving_minutes_pre + self.prep_buffer_minutes + self.ferry.buffer_minutes,
        );
        let estimated_arrival = self
            .ferry
            .arrival
            .checked_add_signed(after_landing)
            .ok_or(ScoringError::InvalidTravelPlan("estimated arrival is out of range"))?;
        let departure_time = self
            .ferry
            .departure
            .checked_sub_signed(before_sailing)
            .ok_or(ScoringError::InvalidTravelPlan("departure time is out of range"))?;

        Ok(TravelPlan {
            driving_minutes_pre: self.driving_minutes_pre,
            driving_minutes_post: self.driving_minutes_post,
            ferry: self.ferry,
            prep_buffer_minutes: self.prep_buffer_minutes,
            arrival_buffer_minutes: self.arrival_buffer_minutes,
            future_context: self.future_context,
            estimated_arrival,
            departure_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn ferry(buffer: i64) -> FerryOption {
        FerryOption::new("Edmonds–Kingston", at(15, 40), at(16, 12), 0.2, buffer).unwrap()
    }

    // FerryOption

    #[test]
    fn ferry_duration() {
        assert_eq!(ferry(0).duration_minutes(), 32);
    }

    #[test]
    fn ferry_rejects_arrival_not_after_departure() {
        let result = FerryOption::new("x", at(15, 40), at(15, 40), 0.2, 0);
        assert_eq!(
            result,
            Err(ScoringError::InvalidFerryOption("arrival must be after departure"))
        );
        assert!(FerryOption::new("x", at(15, 40), at(15, 0), 0.2, 0).is_err());
    }

    #[test]
    fn ferry_rejects_risk_out_of_range() {
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), -0.01, 0).is_err());
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), 1.01, 0).is_err());
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), f64::NAN, 0).is_err());
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), 0.0, 0).is_ok());
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), 1.0, 0).is_ok());
    }

    #[test]
    fn ferry_rejects_negative_buffer() {
        assert!(FerryOption::new("x", at(15, 0), at(16, 0), 0.5, -1).is_err());
    }

    #[test]
    fn ferry_notes() {
        let option = ferry(0).with_notes("vessel swap");
        assert_eq!(option.notes(), Some("vessel swap"));
    }

    // Signals

    #[test]
    fn weather_severity_is_clamped() {
        assert_eq!(WeatherDisruption::new(5, 0).normalized_severity(), 0.5);
        assert_eq!(WeatherDisruption::new(15, 0).normalized_severity(), 1.0);
        assert_eq!(WeatherDisruption::new(-3, 0).normalized_severity(), 0.0);
    }

    #[test]
    fn reservation_status_parsing() {
        assert_eq!(ReservationStatus::parse("Limited"), ReservationStatus::Limited);
        assert_eq!(ReservationStatus::parse("SOLD_OUT"), ReservationStatus::SoldOut);
        assert_eq!(
            ReservationStatus::parse("mystery"),
            ReservationStatus::Unknown("mystery".into())
        );
        assert_eq!(ReservationStatus::parse("mystery").to_string(), "mystery");
        assert_eq!(ReservationStatus::Waitlist.to_string(), "waitlist");
    }

    #[test]
    fn reservation_pressure() {
        let limited = ReservationAvailability::new(ReservationStatus::Limited, 0.2).unwrap();
        assert_eq!(limited.normalized_pressure(), 0.5);

        let confident = ReservationAvailability::new(ReservationStatus::Available, 0.9).unwrap();
        assert_eq!(confident.normalized_pressure(), 0.9);

        let unknown =
            ReservationAvailability::new(ReservationStatus::parse("unclear"), 0.0).unwrap();
        assert_eq!(unknown.normalized_pressure(), 0.0);
    }

    #[test]
    fn reservation_rejects_confidence_out_of_range() {
        assert!(ReservationAvailability::new(ReservationStatus::Limited, 1.5).is_err());
        assert!(ReservationAvailability::new(ReservationStatus::Limited, -0.1).is_err());
    }

    // TravelPlan

    #[test]
    fn plan_derived_values() {
        let plan = TravelPlan::builder(ferry(10))
            .driving(47, 36)
            .buffers(15, 5)
            .build()
            .unwrap();

        assert_eq!(plan.total_driving_minutes(), 83);
        assert_eq!(plan.total_buffer_minutes(), 30);
        assert_eq!(plan.total_travel_minutes(), 83 + 32 + 30);
        assert_eq!(plan.estimated_arrival(), at(16, 53));
        // 15:40 - (47 + 15 + 10)
        assert_eq!(plan.departure_time(), at(14, 28));
    }

    #[test]
    fn plan_defaults() {
        let plan = TravelPlan::builder(ferry(0)).build().unwrap();
        assert_eq!(plan.total_travel_minutes(), 32);
        assert_eq!(plan.future_context(), &FutureContext::default());
    }

    #[test]
    fn plan_rejects_negative_minutes() {
        let result = TravelPlan::builder(ferry(0)).driving(-1, 10).build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan(
                "driving_minutes_pre cannot be negative"
            ))
        );

        let result = TravelPlan::builder(ferry(0)).buffers(0, -5).build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan(
                "arrival_buffer_minutes cannot be negative"
            ))
        );
    }

    #[test]
    fn plan_rejects_minutes_beyond_a_week() {
        let result = TravelPlan::builder(ferry(0))
            .driving(0, 9_000_000_000_000_000_000)
            .build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan(
                "driving_minutes_post cannot exceed one week"
            ))
        );

        let result = TravelPlan::builder(ferry(0)).buffers(i64::MAX, 0).build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan(
                "prep_buffer_minutes cannot exceed one week"
            ))
        );

        let week = 7 * 24 * 60;
        let plan = TravelPlan::builder(ferry(week))
            .driving(week, week)
            .buffers(week, week)
            .build()
            .unwrap();
        assert_eq!(plan.total_travel_minutes(), 5 * week + 32);
    }

    #[test]
    fn ferry_rejects_buffer_beyond_a_week() {
        let result = FerryOption::new("x", at(15, 0), at(16, 0), 0.5, i64::MAX);
        assert_eq!(
            result,
            Err(ScoringError::InvalidFerryOption(
                "buffer minutes cannot exceed one week"
            ))
        );
    }

    #[test]
    fn plan_rejects_door_times_off_the_calendar() {
        let last = NaiveDateTime::MAX;
        let late = FerryOption::new("x", last - Duration::hours(1), last, 0.1, 0).unwrap();
        let result = TravelPlan::builder(late).driving(0, 120).build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan(
                "estimated arrival is out of range"
            ))
        );

        let first = NaiveDateTime::MIN;
        let early = FerryOption::new("x", first, first + Duration::hours(1), 0.1, 0).unwrap();
        let result = TravelPlan::builder(early).driving(10, 0).build();
        assert_eq!(
            result,
            Err(ScoringError::InvalidTravelPlan("departure time is out of range"))
        );
    }

    #[test]
    fn plan_keeps_context() {
        let context = FutureContext::default()
            .with_weather(WeatherDisruption::new(6, 20).with_description("gusty"))
            .with_notes("holiday weekend");
        let plan = TravelPlan::builder(ferry(0))
            .future_context(context.clone())
            .build()
            .unwrap();

        assert_eq!(plan.future_context(), &context);
    }
}
