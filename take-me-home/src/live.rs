//! Building routes from live provider data.
//!
//! Live drive times and ferry schedules are normalised into ordinary
//! [`DriveLeg`]s and [`FerryLeg`]s here, so the evaluator never sees a
//! provider type. Each ferry corridor is built independently and the
//! corridors are fetched concurrently.

use std::future::Future;
use std::sync::Arc;

use chrono::{Duration, FixedOffset, NaiveDateTime, TimeZone};
use futures::future::{join_all, try_join};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CachedDirectionsClient, CachedWsdotClient};
use crate::domain::{DomainError, FerryTiming, Route};
use crate::planner::{PlanningReport, RoutePlanner};
use crate::providers::{DepartureTime, DriveTimeEstimate, ProviderError, TerminalSchedule};
use crate::scoring::ScoringWeights;

/// Source of terminal departure schedules.
pub trait SailingSource: Send + Sync {
    fn terminal_schedule(
        &self,
        terminal_id: i64,
    ) -> impl Future<Output = Result<Arc<TerminalSchedule>, ProviderError>> + Send;
}

/// Source of traffic-aware drive times.
pub trait DriveTimeSource: Send + Sync {
    fn drive_time(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> impl Future<Output = Result<Arc<DriveTimeEstimate>, ProviderError>> + Send;
}

impl SailingSource for CachedWsdotClient {
    async fn terminal_schedule(
        &self,
        terminal_id: i64,
    ) -> Result<Arc<TerminalSchedule>, ProviderError> {
        CachedWsdotClient::terminal_schedule(self, terminal_id).await
    }
}

impl DriveTimeSource for CachedDirectionsClient {
    async fn drive_time(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> Result<Arc<DriveTimeEstimate>, ProviderError> {
        CachedDirectionsClient::drive_time(self, origin, destination, departure).await
    }
}

/// Why a live route could not be built.
#[derive(Debug, Error)]
pub enum LiveRouteError {
    #[error("live data unavailable: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0} has no instant in the configured UTC offset")]
    UnrepresentableTime(NaiveDateTime),
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Parse `"lat,lng"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use take_me_home::live::Coordinates;
    ///
    /// let c = Coordinates::parse("47.8133, -122.3856").unwrap();
    /// assert_eq!(c.as_query(), "47.8133,-122.3856");
    /// assert!(Coordinates::parse("north").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lng) = s.split_once(',')?;
        Self::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?)
    }

    /// Format for the directions API.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// A ferry terminal: schedule id and road location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terminal {
    pub id: i64,
    pub location: Coordinates,
}

/// One drive → ferry → drive corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct FerryCorridor {
    pub route_name: String,
    pub departing_name: String,
    pub arriving_name: String,
    pub departing: Terminal,
    pub arriving: Terminal,
    /// Used as-is except for the crossing, which the schedule overrides when known
    pub timing: FerryTiming,
}

impl FerryCorridor {
    /// Edmonds → Kingston.
    pub fn edmonds_kingston(edmonds: Terminal, kingston: Terminal) -> Self {
        Self {
            route_name: "Edmonds → Kingston".to_string(),
            departing_name: "Edmonds".to_string(),
            arriving_name: "Kingston".to_string(),
            departing: edmonds,
            arriving: kingston,
            timing: FerryTiming::new(Duration::minutes(32), Duration::minutes(20))
                .with_buffer(Duration::minutes(7)),
        }
    }

    /// Seattle → Bainbridge.
    pub fn seattle_bainbridge(seattle: Terminal, bainbridge: Terminal) -> Self {
        Self {
            route_name: "Seattle → Bainbridge".to_string(),
            departing_name: "Seattle".to_string(),
            arriving_name: "Bainbridge".to_string(),
            departing: seattle,
            arriving: bainbridge,
            timing: FerryTiming::new(Duration::minutes(35), Duration::minutes(30))
                .with_buffer(Duration::minutes(10)),
        }
    }

    fn to_terminal_leg(&self) -> String {
        format!("Home to {} terminal", self.departing_name)
    }

    fn ferry_leg(&self) -> String {
        format!("{}–{} ferry", self.departing_name, self.arriving_name)
    }

    fn ferry_label(&self) -> String {
        format!("WSF {}–{}", self.departing_name, self.arriving_name)
    }

    fn from_terminal_leg(&self) -> String {
        format!("{} to destination", self.arriving_name)
    }
}

/// A corridor that could not be built.
#[derive(Debug)]
pub struct LiveFailure {
    pub route_name: String,
    pub error: LiveRouteError,
}

/// Outcome of a live planning run.
#[derive(Debug, Default)]
pub struct LiveReport {
    /// Evaluation of every corridor that was built
    pub report: PlanningReport,
    /// Corridors whose live data could not be assembled
    pub unavailable: Vec<LiveFailure>,
}

/// Builds ferry routes from live schedules and drive times.
pub struct LiveRouteBuilder<S, D> {
    sailings: S,
    drives: D,
    home: Coordinates,
    destination: Coordinates,
    corridors: Vec<FerryCorridor>,
    utc_offset: FixedOffset,
}

impl<S: SailingSource, D: DriveTimeSource> LiveRouteBuilder<S, D> {
    pub fn new(
        sailings: S,
        drives: D,
        home: Coordinates,
        destination: Coordinates,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            sailings,
            drives,
            home,
            destination,
            corridors: Vec::new(),
            utc_offset,
        }
    }

    /// Add a corridor; corridors are built in insertion order.
    pub fn with_corridor(mut self, corridor: FerryCorridor) -> Self {
        self.corridors.push(corridor);
        self
    }

    pub fn corridors(&self) -> &[FerryCorridor] {
        &self.corridors
    }

    fn departure_at(&self, local: NaiveDateTime) -> Result<DepartureTime, LiveRouteError> {
        self.utc_offset
            .from_local_datetime(&local)
            .single()
            .map(|instant| DepartureTime::At(instant.timestamp()))
            .ok_or(LiveRouteError::UnrepresentableTime(local))
    }

    /// Build one corridor's route for a trip starting at `start`.
    ///
    /// The drive from the far terminal is estimated at the landing time of
    /// the earliest viable sailing.
    ///
    /// # Errors
    ///
    /// Fails if a provider request fails, or if no sailing can be caught.
    pub async fn build_route(
        &self,
        corridor: &FerryCorridor,
        start: NaiveDateTime,
    ) -> Result<Route, LiveRouteError> {
        let home = self.home.as_query();
        let departing = corridor.departing.location.as_query();

        let (to_terminal, schedule) = try_join(
            self.drives
                .drive_time(&home, &departing, self.departure_at(start)?),
            self.sailings.terminal_schedule(corridor.departing.id),
        )
        .await?;

        let to_terminal = to_terminal.to_drive_leg(corridor.to_terminal_leg())?;
        let ferry = schedule.to_ferry_leg(
            corridor.arriving.id,
            corridor.ferry_leg(),
            corridor.ferry_label(),
            corridor.timing,
        )?;

        let crossing = ferry.traverse(start + to_terminal.duration())?;
        debug!(
            route = %corridor.route_name,
            sailing = %(crossing.departure + crossing.wait),
            landing = %crossing.arrival,
            "Live sailing selected"
        );

        let from_terminal = self
            .drives
            .drive_time(
                &corridor.arriving.location.as_query(),
                &self.destination.as_query(),
                self.departure_at(crossing.arrival)?,
            )
            .await?
            .to_drive_leg(corridor.from_terminal_leg())?;

        Ok(Route::new(
            corridor.route_name.clone(),
            vec![to_terminal.into(), ferry.into(), from_terminal.into()],
        )?)
    }

    /// Build every corridor concurrently, keeping failures per corridor.
    pub async fn build_routes(
        &self,
        start: NaiveDateTime,
    ) -> Vec<(String, Result<Route, LiveRouteError>)> {
        join_all(self.corridors.iter().map(|corridor| async move {
            let result = self.build_route(corridor, start).await;
            if let Err(error) = &result {
                warn!(route = %corridor.route_name, error = %error, "Live route unavailable");
            }
            (corridor.route_name.clone(), result)
        }))
        .await
    }

    /// Build every corridor and evaluate the ones that could be built.
    pub async fn plan(&self, start: NaiveDateTime, weights: ScoringWeights) -> LiveReport {
        let mut routes = Vec::new();
        let mut unavailable = Vec::new();
        for (route_name, result) in self.build_routes(start).await {
            match result {
                Ok(route) => routes.push(route),
                Err(error) => unavailable.push(LiveFailure { route_name, error }),
            }
        }

        let report = RoutePlanner::with_routes(start, routes)
            .with_weights(weights)
            .evaluate();
        LiveReport {
            report,
            unavailable,
        }
    }
}
