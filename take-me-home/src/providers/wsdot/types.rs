//! Raw WSDOT response types.
//!
//! These mirror the JSON shapes returned by the WSDOT Traveler Information
//! and Ferries APIs. Nearly every field is optional in practice, so they are
//! all `Option` here and required-ness is enforced during conversion.

use serde::Deserialize;

/// One corridor from the travel-times feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelTimeDto {
    #[serde(rename = "TravelTimeID")]
    pub travel_time_id: Option<i64>,
    pub name: Option<String>,
    /// Minutes
    pub current_time: Option<f64>,
    /// Minutes
    pub average_time: Option<f64>,
    /// Miles
    pub distance: Option<f64>,
    pub time_updated: Option<String>,
}

/// Schedule for all sailings leaving one terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminalScheduleDto {
    pub terminal_name: Option<String>,
    #[serde(default)]
    pub sailings: Vec<TerminalSailingDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminalSailingDto {
    #[serde(rename = "RouteID")]
    pub route_id: Option<i64>,
    #[serde(rename = "DepartingTerminalID")]
    pub departing_terminal_id: Option<i64>,
    #[serde(rename = "ArrivingTerminalID")]
    pub arriving_terminal_id: Option<i64>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    /// A string or a list of strings
    pub annotations: Option<serde_json::Value>,
    pub cancelled: Option<bool>,
}

/// Schedule for one route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteScheduleDto {
    pub route_description: Option<String>,
    #[serde(default)]
    pub sailings: Vec<RouteSailingDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteSailingDto {
    pub vessel_name: Option<String>,
    #[serde(rename = "DepartingTerminalID")]
    pub departing_terminal_id: Option<i64>,
    #[serde(rename = "ArrivingTerminalID")]
    pub arriving_terminal_id: Option<i64>,
    pub departure: Option<String>,
    /// Vehicle load; a number or a label depending on the feed
    pub load: Option<serde_json::Value>,
}

/// A service alert for a route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlertDto {
    #[serde(rename = "AlertID")]
    pub alert_id: Option<i64>,
    pub title: Option<String>,
    pub full_description: Option<String>,
    pub last_updated: Option<String>,
}

/// Live position of a vessel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VesselLocationDto {
    #[serde(rename = "VesselID")]
    pub vessel_id: Option<i64>,
    pub vessel_name: Option<String>,
    #[serde(rename = "RouteID")]
    pub route_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Knots
    pub speed: Option<f64>,
    /// Degrees
    pub heading: Option<f64>,
    pub at: Option<String>,
}
