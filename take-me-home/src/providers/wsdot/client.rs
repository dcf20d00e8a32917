//! WSDOT HTTP client.
//!
//! Covers highway travel times and the ferry schedule, alert and vessel
//! feeds. Every request goes through the retry policy and a semaphore that
//! bounds concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use super::convert::{
    CorridorTravelTime, RouteAlert, RouteSchedule, TerminalSchedule, VesselLocation,
    convert_alerts, convert_route_schedule, convert_terminal_schedule, convert_travel_times,
    convert_vessel_locations,
};
use super::types::{
    AlertDto, RouteScheduleDto, TerminalScheduleDto, TravelTimeDto, VesselLocationDto,
};
use crate::providers::http::get_json;
use crate::providers::{ProviderError, RetryPolicy};

/// Default host for both the traffic and ferries APIs.
const DEFAULT_BASE_URL: &str = "https://www.wsdot.wa.gov";

/// In-flight request limit.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Pacific Daylight Time, in seconds east of UTC.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = -7 * 3600;

const TRAVEL_TIMES_PATH: &str = "/Traffic/api/TravelTimes/TravelTimesREST.svc/GetTravelTimesAsJson";

/// Configuration for the WSDOT client.
#[derive(Debug, Clone)]
pub struct WsdotConfig {
    /// WSDOT Traveler Information access code
    pub access_code: String,
    /// Host URL (defaults to production WSDOT)
    pub base_url: String,
    /// Offset applied to timestamps that carry none
    pub utc_offset: FixedOffset,
    /// Per-request timeout
    pub timeout: Duration,
    /// Requests allowed in flight at once
    pub max_concurrent: usize,
    /// Retry budget for transient failures
    pub retry: RetryPolicy,
}

impl WsdotConfig {
    /// Create a new config with the given access code.
    pub fn new(access_code: impl Into<String>) -> Self {
        Self {
            access_code: access_code.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS)
                .unwrap_or_else(|| Utc.fix()),
            timeout: Duration::from_secs(10),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at another host.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap on in-flight requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// WSDOT traffic and ferries client.
#[derive(Debug, Clone)]
pub struct WsdotClient {
    http: reqwest::Client,
    config: WsdotConfig,
    semaphore: Arc<Semaphore>,
}

impl WsdotClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WsdotConfig) -> Result<Self, ProviderError> {
        if config.access_code.is_empty() {
            return Err(ProviderError::NotConfigured(
                "WSDOT access code is empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Ok(Self {
            http,
            config,
            semaphore,
        })
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.config.utc_offset
    }

    /// GET `path` with the access code under `key_param`, retrying transient failures.
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        key_param: &'static str,
    ) -> Result<T, ProviderError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| {
            ProviderError::NotConfigured("WSDOT client is shutting down".to_string())
        })?;

        let url = format!("{}{}", self.config.base_url, path);
        let query = [(key_param, self.config.access_code.as_str())];
        debug!(operation, url = %url, "WSDOT request");

        self.config
            .retry
            .run(operation, || get_json(&self.http, &url, &query))
            .await
    }

    /// Current highway travel times, optionally limited to `corridor_ids`.
    pub async fn travel_times(
        &self,
        corridor_ids: Option<&[i64]>,
    ) -> Result<Vec<CorridorTravelTime>, ProviderError> {
        let dtos: Vec<TravelTimeDto> = self
            .fetch("wsdot.travel_times", TRAVEL_TIMES_PATH, "AccessCode")
            .await?;
        convert_travel_times(&dtos, corridor_ids, self.config.utc_offset)
    }

    /// Today's departures from one terminal.
    pub async fn terminal_schedule(
        &self,
        terminal_id: i64,
    ) -> Result<TerminalSchedule, ProviderError> {
        let path = format!("/Ferries/API/Schedule/rest/terminal/{terminal_id}");
        let dto: TerminalScheduleDto = self
            .fetch("wsdot.terminal_schedule", &path, "apiaccesscode")
            .await?;
        Ok(convert_terminal_schedule(
            terminal_id,
            &dto,
            self.config.utc_offset,
        ))
    }

    /// Today's sailings on one route, with vessel and load information.
    pub async fn route_schedule(&self, route_id: i64) -> Result<RouteSchedule, ProviderError> {
        let path = format!("/Ferries/API/Schedule/rest/route/{route_id}");
        let dto: RouteScheduleDto = self
            .fetch("wsdot.route_schedule", &path, "apiaccesscode")
            .await?;
        Ok(convert_route_schedule(route_id, &dto, self.config.utc_offset))
    }

    /// Active service alerts for one route.
    pub async fn route_alerts(&self, route_id: i64) -> Result<Vec<RouteAlert>, ProviderError> {
        let path = format!("/Ferries/API/Alerts/rest/routes/{route_id}");
        let dtos: Vec<AlertDto> = self
            .fetch("wsdot.route_alerts", &path, "apiaccesscode")
            .await?;
        Ok(convert_alerts(route_id, &dtos, self.config.utc_offset))
    }

    /// Live positions of every vessel in the fleet.
    pub async fn vessel_locations(&self) -> Result<Vec<VesselLocation>, ProviderError> {
        let dtos: Vec<VesselLocationDto> = self
            .fetch(
                "wsdot.vessel_locations",
                "/Ferries/API/Vessels/rest/vessellocations",
                "apiaccesscode",
            )
            .await?;
        Ok(convert_vessel_locations(&dtos, self.config.utc_offset))
    }
}
