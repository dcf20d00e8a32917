//! WSDOT Traveler Information and Washington State Ferries client.
//!
//! Key characteristics of the feeds:
//! - Ferry schedules are keyed by numeric terminal and route ids
//! - Timestamps arrive either as RFC 3339 or the legacy `/Date(ms-0700)/`
//!   form, and are normalised to local wall-clock time
//! - Cancelled sailings are still listed and must be filtered out

mod client;
mod convert;
mod types;

pub use client::{DEFAULT_UTC_OFFSET_SECS, WsdotClient, WsdotConfig};
pub use convert::{
    CorridorTravelTime, RouteAlert, RouteSailing, RouteSchedule, ScheduledSailing,
    TerminalSchedule, VesselLocation, parse_wsdot_timestamp,
};
pub use types::{
    AlertDto, RouteSailingDto, RouteScheduleDto, TerminalSailingDto, TerminalScheduleDto,
    TravelTimeDto, VesselLocationDto,
};
