//! Conversion from WSDOT DTOs to normalised records.
//!
//! Timestamps are converted to local wall-clock time. WSDOT's legacy
//! `/Date(ms±hhmm)/` form carries its own offset; when it does not, the
//! configured fallback offset is used.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};

use super::types::{
    AlertDto, RouteScheduleDto, TerminalScheduleDto, TravelTimeDto, VesselLocationDto,
};
use crate::domain::{DomainError, FerryLeg, FerryTiming};
use crate::providers::ProviderError;

/// Parse a WSDOT timestamp into local time.
///
/// Accepts `/Date(1748815800000-0700)/`, `/Date(1748815800000)/`,
/// RFC 3339, and naive `YYYY-MM-DDTHH:MM:SS`. Returns `None` for anything
/// else.
///
/// # Examples
///
/// ```
/// use take_me_home::providers::wsdot::parse_wsdot_timestamp;
/// use chrono::FixedOffset;
///
/// let pacific = FixedOffset::west_opt(7 * 3600).unwrap();
/// let t = parse_wsdot_timestamp("/Date(1748815800000-0700)/", pacific).unwrap();
/// assert_eq!(t.to_string(), "2025-06-01 15:10:00");
/// ```
pub fn parse_wsdot_timestamp(value: &str, fallback: FixedOffset) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(inner) = value
        .strip_prefix("/Date(")
        .and_then(|rest| rest.strip_suffix(")/"))
    {
        return parse_legacy_date(inner, fallback);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Parse the inside of `/Date(...)/`: milliseconds plus an optional offset.
fn parse_legacy_date(inner: &str, fallback: FixedOffset) -> Option<NaiveDateTime> {
    if inner.is_empty() || !inner.is_ascii() {
        return None;
    }
    // Skip a leading sign so negative epochs don't look like an offset
    let split = inner[1..]
        .find(['+', '-'])
        .map(|i| i + 1)
        .unwrap_or(inner.len());
    let (millis, offset) = inner.split_at(split);

    let millis: i64 = millis.parse().ok()?;
    let offset = if offset.is_empty() {
        fallback
    } else {
        parse_offset(offset)?
    };

    let utc = DateTime::from_timestamp_millis(millis)?;
    Some(utc.with_timezone(&offset).naive_local())
}

/// Parse `+hhmm` / `-hhmm`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.len() != 5 {
        return None;
    }
    let sign = match &s[..1] {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let hours: i32 = s[1..3].parse().ok()?;
    let minutes: i32 = s[3..5].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn timestamp(value: Option<&String>, offset: FixedOffset) -> Option<NaiveDateTime> {
    value.and_then(|v| parse_wsdot_timestamp(v, offset))
}

/// Flatten a string-or-list JSON value into strings.
fn text_list(value: Option<&serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => vec![],
    }
}

/// Render a scalar JSON value as text.
fn scalar_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Current conditions on a highway corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorTravelTime {
    pub corridor_id: i64,
    pub name: Option<String>,
    pub current_minutes: Option<f64>,
    pub average_minutes: Option<f64>,
    pub distance_miles: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
}

/// Convert the travel-times feed, optionally keeping only `corridor_ids`.
///
/// # Errors
///
/// Returns `ProviderError::MissingField` if any corridor lacks an id.
pub fn convert_travel_times(
    dtos: &[TravelTimeDto],
    corridor_ids: Option<&[i64]>,
    offset: FixedOffset,
) -> Result<Vec<CorridorTravelTime>, ProviderError> {
    let mut out = Vec::new();
    for dto in dtos {
        let corridor_id = dto
            .travel_time_id
            .ok_or(ProviderError::MissingField("TravelTimeID"))?;
        if corridor_ids.is_some_and(|ids| !ids.contains(&corridor_id)) {
            continue;
        }
        out.push(CorridorTravelTime {
            corridor_id,
            name: dto.name.clone(),
            current_minutes: dto.current_time,
            average_minutes: dto.average_time,
            distance_miles: dto.distance,
            last_updated: timestamp(dto.time_updated.as_ref(), offset),
        });
    }
    Ok(out)
}

/// One scheduled departure from a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSailing {
    pub route_id: Option<i64>,
    pub departing_terminal_id: Option<i64>,
    pub arriving_terminal_id: Option<i64>,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub notes: Vec<String>,
    pub cancelled: bool,
}

/// Departures from one terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSchedule {
    pub terminal_id: i64,
    pub terminal_name: Option<String>,
    pub sailings: Vec<ScheduledSailing>,
}

impl TerminalSchedule {
    fn sailings_to(&self, arriving_terminal_id: i64) -> impl Iterator<Item = &ScheduledSailing> {
        self.sailings.iter().filter(move |s| {
            !s.cancelled && s.arriving_terminal_id == Some(arriving_terminal_id)
        })
    }

    /// Sorted departure times to `arriving_terminal_id`, skipping cancellations.
    pub fn departures_to(&self, arriving_terminal_id: i64) -> Vec<NaiveDateTime> {
        let mut departures: Vec<_> = self
            .sailings_to(arriving_terminal_id)
            .filter_map(|s| s.departure)
            .collect();
        departures.sort();
        departures
    }

    /// Shortest scheduled crossing to `arriving_terminal_id`, if any sailing lists an arrival.
    pub fn crossing_to(&self, arriving_terminal_id: i64) -> Option<Duration> {
        self.sailings_to(arriving_terminal_id)
            .filter_map(|s| match (s.departure, s.arrival) {
                (Some(dep), Some(arr)) if arr > dep => Some(arr - dep),
                _ => None,
            })
            .min()
    }

    /// Build a ferry leg to `arriving_terminal_id` from this schedule.
    ///
    /// The scheduled crossing replaces `timing.crossing` when the feed lists
    /// arrival times.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the resulting timing is out of range.
    pub fn to_ferry_leg(
        &self,
        arriving_terminal_id: i64,
        name: impl Into<String>,
        label: impl Into<String>,
        mut timing: FerryTiming,
    ) -> Result<FerryLeg, DomainError> {
        if let Some(crossing) = self.crossing_to(arriving_terminal_id) {
            timing.crossing = crossing;
        }
        FerryLeg::new(name, label, self.departures_to(arriving_terminal_id), timing)
    }
}

pub fn convert_terminal_schedule(
    terminal_id: i64,
    dto: &TerminalScheduleDto,
    offset: FixedOffset,
) -> TerminalSchedule {
    TerminalSchedule {
        terminal_id,
        terminal_name: dto.terminal_name.clone(),
        sailings: dto
            .sailings
            .iter()
            .map(|s| ScheduledSailing {
                route_id: s.route_id,
                departing_terminal_id: s.departing_terminal_id,
                arriving_terminal_id: s.arriving_terminal_id,
                departure: timestamp(s.departure.as_ref(), offset),
                arrival: timestamp(s.arrival.as_ref(), offset),
                notes: text_list(s.annotations.as_ref()),
                cancelled: s.cancelled.unwrap_or(false),
            })
            .collect(),
    }
}

/// A sailing on a route schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSailing {
    pub vessel_name: Option<String>,
    pub departing_terminal_id: Option<i64>,
    pub arriving_terminal_id: Option<i64>,
    pub departure: Option<NaiveDateTime>,
    pub load_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSchedule {
    pub route_id: i64,
    pub route_name: Option<String>,
    pub sailings: Vec<RouteSailing>,
}

pub fn convert_route_schedule(
    route_id: i64,
    dto: &RouteScheduleDto,
    offset: FixedOffset,
) -> RouteSchedule {
    RouteSchedule {
        route_id,
        route_name: dto.route_description.clone(),
        sailings: dto
            .sailings
            .iter()
            .map(|s| RouteSailing {
                vessel_name: s.vessel_name.clone(),
                departing_terminal_id: s.departing_terminal_id,
                arriving_terminal_id: s.arriving_terminal_id,
                departure: timestamp(s.departure.as_ref(), offset),
                load_status: scalar_text(s.load.as_ref()),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAlert {
    pub route_id: i64,
    pub alert_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
}

pub fn convert_alerts(route_id: i64, dtos: &[AlertDto], offset: FixedOffset) -> Vec<RouteAlert> {
    dtos.iter()
        .map(|a| RouteAlert {
            route_id,
            alert_id: a.alert_id,
            title: a.title.clone(),
            description: a.full_description.clone(),
            last_updated: timestamp(a.last_updated.as_ref(), offset),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VesselLocation {
    pub vessel_id: Option<i64>,
    pub vessel_name: Option<String>,
    pub route_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_knots: Option<f64>,
    pub heading_degrees: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
}

pub fn convert_vessel_locations(
    dtos: &[VesselLocationDto],
    offset: FixedOffset,
) -> Vec<VesselLocation> {
    dtos.iter()
        .map(|v| VesselLocation {
            vessel_id: v.vessel_id,
            vessel_name: v.vessel_name.clone(),
            route_id: v.route_id,
            latitude: v.latitude,
            longitude: v.longitude,
            speed_knots: v.speed,
            heading_degrees: v.heading,
            last_updated: timestamp(v.at.as_ref(), offset),
        })
        .collect()
}
