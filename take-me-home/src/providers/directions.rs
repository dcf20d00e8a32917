//! Driving directions client.
//!
//! Wraps the Google Maps Directions API. Only the first route and its first
//! leg are used; the result is normalised into a [`DriveTimeEstimate`]
//! which can be turned into a [`DriveLeg`] for the planner.

use std::time::Duration;

use serde::Deserialize;

use super::http::get_json;
use super::{ProviderError, RetryPolicy};
use crate::domain::{DomainError, DriveLeg};

/// Default endpoint for the Directions API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default traffic prediction model.
const DEFAULT_TRAFFIC_MODEL: &str = "best_guess";

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key with the Directions API enabled
    pub api_key: String,
    /// Endpoint URL (defaults to production Google Maps)
    pub base_url: String,
    /// `best_guess`, `pessimistic` or `optimistic`
    pub traffic_model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry budget for transient failures
    pub retry: RetryPolicy,
}

impl DirectionsConfig {
    /// Config for `api_key` with default endpoint and retry policy.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            traffic_model: DEFAULT_TRAFFIC_MODEL.to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_traffic_model(mut self, model: impl Into<String>) -> Self {
        self.traffic_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// When the trip starts, for traffic prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartureTime {
    Now,
    /// Unix timestamp in seconds
    At(i64),
}

impl DepartureTime {
    fn as_query(&self) -> String {
        match self {
            DepartureTime::Now => "now".to_string(),
            DepartureTime::At(ts) => ts.to_string(),
        }
    }
}

// Response DTOs

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    #[serde(default)]
    pub distance: Option<ValueField>,
    #[serde(default)]
    pub duration: Option<ValueField>,
    #[serde(default)]
    pub duration_in_traffic: Option<ValueField>,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ValueField {
    pub value: i64,
}

/// A normalised drive-time estimate for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveTimeEstimate {
    pub origin: String,
    pub destination: String,
    pub distance_meters: i64,
    pub duration_seconds: i64,
    pub duration_in_traffic_seconds: Option<i64>,
    pub summary: String,
}

impl DriveTimeEstimate {
    /// Traffic-aware duration when available, otherwise the free-flow one.
    pub fn effective_seconds(&self) -> i64 {
        self.duration_in_traffic_seconds
            .unwrap_or(self.duration_seconds)
    }

    /// Effective duration rounded to the nearest minute, or `None` if the
    /// reported seconds do not fit a duration.
    pub fn effective_duration(&self) -> Option<chrono::Duration> {
        let minutes = self.effective_seconds().checked_add(30)?.div_euclid(60);
        chrono::Duration::try_minutes(minutes)
    }

    /// Build a drive leg from this estimate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLeg` when the reported duration is
    /// negative, unrepresentable, or longer than a drive leg allows.
    pub fn to_drive_leg(&self, name: impl Into<String>) -> Result<DriveLeg, DomainError> {
        let duration = self
            .effective_duration()
            .ok_or(DomainError::InvalidLeg("drive duration out of range"))?;
        let conditions = if self.summary.is_empty() {
            "live".to_string()
        } else {
            format!("live {}", self.summary)
        };
        DriveLeg::new(name, duration, conditions)
    }
}

/// Normalise the first route/leg of a successful response.
///
/// # Errors
///
/// Returns `ProviderError::MissingField` when routes, legs, duration or
/// distance are absent.
pub fn normalize_directions(
    response: &DirectionsResponse,
    origin: &str,
    destination: &str,
) -> Result<DriveTimeEstimate, ProviderError> {
    let route = response
        .routes
        .first()
        .ok_or(ProviderError::MissingField("routes"))?;
    let leg = route.legs.first().ok_or(ProviderError::MissingField("legs"))?;

    let duration = leg
        .duration
        .ok_or(ProviderError::MissingField("duration"))?;
    let distance = leg
        .distance
        .ok_or(ProviderError::MissingField("distance"))?;

    Ok(DriveTimeEstimate {
        origin: leg
            .start_address
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| origin.to_string()),
        destination: leg
            .end_address
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| destination.to_string()),
        distance_meters: distance.value,
        duration_seconds: duration.value,
        duration_in_traffic_seconds: leg.duration_in_traffic.map(|v| v.value),
        summary: route.summary.clone(),
    })
}

/// Check the payload status, then normalise.
fn interpret(
    response: DirectionsResponse,
    origin: &str,
    destination: &str,
) -> Result<DriveTimeEstimate, ProviderError> {
    if response.status != "OK" {
        return Err(ProviderError::PayloadStatus {
            status: response.status,
            message: response.error_message,
        });
    }
    normalize_directions(&response, origin, destination)
}

/// Directions API client.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    config: DirectionsConfig,
}

impl DirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "directions API key is empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Fetch a drive-time estimate, retrying transient failures.
    ///
    /// `origin` and `destination` are free-form places or `"lat,lng"` pairs.
    pub async fn drive_time(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> Result<DriveTimeEstimate, ProviderError> {
        self.config
            .retry
            .run("directions", || self.fetch_once(origin, destination, departure))
            .await
    }

    async fn fetch_once(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> Result<DriveTimeEstimate, ProviderError> {
        let departure = departure.as_query();
        let query = [
            ("origin", origin),
            ("destination", destination),
            ("key", self.config.api_key.as_str()),
            ("departure_time", departure.as_str()),
            ("traffic_model", self.config.traffic_model.as_str()),
        ];
        let response: DirectionsResponse =
            get_json(&self.http, &self.config.base_url, &query).await?;
        interpret(response, origin, destination)
    }
}
