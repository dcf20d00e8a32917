//! Shared state handed to every handler.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::cache::{CachedDirectionsClient, CachedWsdotClient, ProviderCache};
use crate::config::AppConfig;
use crate::live::LiveRouteBuilder;
use crate::providers::{DirectionsClient, DirectionsConfig, ProviderError, WsdotClient, WsdotConfig};

/// Live route builder backed by the cached provider clients.
pub type LiveBuilder = LiveRouteBuilder<CachedWsdotClient, CachedDirectionsClient>;

/// Whether live routes can be served.
pub enum LiveData {
    Ready(LiveBuilder),
    /// Reason live data is disabled
    Unavailable(String),
}

/// Configuration plus the live route builder, if one could be assembled.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Live route builder, when providers are configured
    pub live: Arc<LiveData>,
}

impl AppState {
    /// Create app state, wiring the live providers if they are configured.
    pub fn new(config: AppConfig) -> Self {
        let cache = Arc::new(ProviderCache::new(&config.cache_config()));
        let live = match build_live(&config, cache) {
            Ok(builder) => {
                info!(
                    corridors = builder.corridors().len(),
                    "Live route data enabled"
                );
                LiveData::Ready(builder)
            }
            Err(error) => {
                warn!(error = %error, "Live route data disabled");
                LiveData::Unavailable(error.to_string())
            }
        };

        Self {
            config: Arc::new(config),
            live: Arc::new(live),
        }
    }

    /// Current local wall-clock time in the configured offset.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.config.utc_offset)
            .naive_local()
    }
}

fn build_live(config: &AppConfig, cache: Arc<ProviderCache>) -> Result<LiveBuilder, ProviderError> {
    let access_code = config
        .wsdot_access_code
        .clone()
        .ok_or_else(|| ProviderError::NotConfigured("WSDOT_ACCESS_CODE is not set".into()))?;
    let api_key = config
        .google_maps_api_key
        .clone()
        .ok_or_else(|| ProviderError::NotConfigured("GOOGLE_MAPS_API_KEY is not set".into()))?;
    let setup = config.live_setup()?;

    let wsdot = WsdotClient::new(
        WsdotConfig::new(access_code)
            .with_timeout(config.request_timeout)
            .with_utc_offset(config.utc_offset),
    )?;
    let directions =
        DirectionsClient::new(DirectionsConfig::new(api_key).with_timeout(config.request_timeout))?;

    let builder = LiveRouteBuilder::new(
        CachedWsdotClient::new(wsdot, cache.clone()),
        CachedDirectionsClient::new(directions, cache),
        setup.home,
        setup.destination,
        config.utc_offset,
    );
    Ok(setup
        .corridors
        .into_iter()
        .fold(builder, LiveRouteBuilder::with_corridor))
}
