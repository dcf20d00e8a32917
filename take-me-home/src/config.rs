//! Environment-driven application configuration.
//!
//! Numeric settings that fail to parse fall back to their defaults with a
//! warning. Coordinates that fail to parse are treated as absent.

use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use tracing::warn;

use crate::cache::CacheConfig;
use crate::live::{Coordinates, FerryCorridor, Terminal};
use crate::providers::ProviderError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 8000;
/// Pacific Daylight Time
const DEFAULT_TIMEZONE_OFFSET_MINUTES: i32 = -420;

/// WSDOT terminal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalIds {
    pub edmonds: i64,
    pub kingston: i64,
    pub seattle: i64,
    pub bainbridge: i64,
}

impl Default for TerminalIds {
    fn default() -> Self {
        Self {
            edmonds: 8,
            kingston: 12,
            seattle: 7,
            bainbridge: 3,
        }
    }
}

/// Locations used to query live drive times.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Places {
    pub home: Option<Coordinates>,
    pub destination: Option<Coordinates>,
    pub edmonds_terminal: Option<Coordinates>,
    pub kingston_terminal: Option<Coordinates>,
    pub seattle_terminal: Option<Coordinates>,
    pub bainbridge_terminal: Option<Coordinates>,
}

/// Everything the live route builder needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSetup {
    pub home: Coordinates,
    pub destination: Coordinates,
    pub corridors: Vec<FerryCorridor>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub wsdot_access_code: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub terminal_ids: TerminalIds,
    pub places: Places,
    /// Offset of local wall-clock time from UTC
    pub utc_offset: FixedOffset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = Env { lookup: &lookup };

        let defaults = TerminalIds::default();
        let terminal_ids = TerminalIds {
            edmonds: env.number("FERRY_TERMINAL_ID_EDMONDS", defaults.edmonds),
            kingston: env.number("FERRY_TERMINAL_ID_KINGSTON", defaults.kingston),
            seattle: env.number("FERRY_TERMINAL_ID_SEATTLE", defaults.seattle),
            bainbridge: env.number("FERRY_TERMINAL_ID_BAINBRIDGE", defaults.bainbridge),
        };

        let places = Places {
            home: env.coordinates("HOME_COORDS"),
            destination: env.coordinates("DESTINATION_COORDS"),
            edmonds_terminal: env.coordinates("EDMONDS_TERMINAL_COORDS"),
            kingston_terminal: env.coordinates("KINGSTON_TERMINAL_COORDS"),
            seattle_terminal: env.coordinates("SEATTLE_TERMINAL_COORDS"),
            bainbridge_terminal: env.coordinates("BAINBRIDGE_TERMINAL_COORDS"),
        };

        let offset_minutes =
            env.number("TIMEZONE_OFFSET_MINUTES", DEFAULT_TIMEZONE_OFFSET_MINUTES);
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(offset_minutes, "TIMEZONE_OFFSET_MINUTES out of range, using default");
                default_offset()
            });

        Self {
            port: env.number("PORT", DEFAULT_PORT),
            cache_ttl: Duration::from_secs(
                env.number("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECS),
            ),
            request_timeout: Duration::from_millis(
                env.number("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
            ),
            wsdot_access_code: env.get("WSDOT_ACCESS_CODE"),
            google_maps_api_key: env.get("GOOGLE_MAPS_API_KEY"),
            terminal_ids,
            places,
            utc_offset,
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_ttl(self.cache_ttl)
    }

    /// Assemble the live corridors.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotConfigured` naming the first missing place.
    pub fn live_setup(&self) -> Result<LiveSetup, ProviderError> {
        let places = &self.places;
        let ids = &self.terminal_ids;
        let terminal = |id: i64, location: Option<Coordinates>, var: &str| {
            location
                .map(|location| Terminal { id, location })
                .ok_or_else(|| ProviderError::NotConfigured(format!("{var} is not set")))
        };

        Ok(LiveSetup {
            home: places
                .home
                .ok_or_else(|| ProviderError::NotConfigured("HOME_COORDS is not set".into()))?,
            destination: places.destination.ok_or_else(|| {
                ProviderError::NotConfigured("DESTINATION_COORDS is not set".into())
            })?,
            corridors: vec![
                FerryCorridor::edmonds_kingston(
                    terminal(ids.edmonds, places.edmonds_terminal, "EDMONDS_TERMINAL_COORDS")?,
                    terminal(ids.kingston, places.kingston_terminal, "KINGSTON_TERMINAL_COORDS")?,
                ),
                FerryCorridor::seattle_bainbridge(
                    terminal(ids.seattle, places.seattle_terminal, "SEATTLE_TERMINAL_COORDS")?,
                    terminal(
                        ids.bainbridge,
                        places.bainbridge_terminal,
                        "BAINBRIDGE_TERMINAL_COORDS",
                    )?,
                ),
            ],
        })
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_TIMEZONE_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
}

/// Typed access to a variable lookup.
struct Env<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Env<'_> {
    /// Trimmed, non-empty value.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn number<T: FromStr + Copy + std::fmt::Display>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, default = %default, "Malformed number, using default");
                default
            }),
        }
    }

    fn coordinates(&self, key: &str) -> Option<Coordinates> {
        let raw = self.get(key)?;
        let parsed = Coordinates::parse(&raw);
        if parsed.is_none() {
            warn!(key, value = %raw, "Malformed coordinates, ignoring");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn all_places() -> Vec<(&'static str, &'static str)> {
        vec![
            ("HOME_COORDS", "47.4502,-122.3088"),
            ("DESTINATION_COORDS", "47.8606,-122.6265"),
            ("EDMONDS_TERMINAL_COORDS", "47.8133,-122.3856"),
            ("KINGSTON_TERMINAL_COORDS", "47.7962,-122.4966"),
            ("SEATTLE_TERMINAL_COORDS", "47.6026,-122.3393"),
            ("BAINBRIDGE_TERMINAL_COORDS", "47.6231,-122.5107"),
        ]
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_millis(8000));
        assert_eq!(config.wsdot_access_code, None);
        assert_eq!(config.google_maps_api_key, None);
        assert_eq!(config.terminal_ids, TerminalIds::default());
        assert_eq!(config.places, Places::default());
        assert_eq!(config.utc_offset.local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn reads_values() {
        let config = config(&[
            ("PORT", "8080"),
            ("CACHE_TTL_SECONDS", "60"),
            ("REQUEST_TIMEOUT_MS", "2500"),
            ("WSDOT_ACCESS_CODE", " abc "),
            ("GOOGLE_MAPS_API_KEY", "key"),
            ("FERRY_TERMINAL_ID_EDMONDS", "80"),
            ("TIMEZONE_OFFSET_MINUTES", "-480"),
            ("HOME_COORDS", "47.45,-122.30"),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_config().ttl, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.wsdot_access_code.as_deref(), Some("abc"));
        assert_eq!(config.google_maps_api_key.as_deref(), Some("key"));
        assert_eq!(config.terminal_ids.edmonds, 80);
        assert_eq!(config.terminal_ids.kingston, 12);
        assert_eq!(config.utc_offset.local_minus_utc(), -8 * 3600);
        assert_eq!(config.places.home, Coordinates::new(47.45, -122.30));
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = config(&[
            ("PORT", "eighty"),
            ("CACHE_TTL_SECONDS", "-5"),
            ("TIMEZONE_OFFSET_MINUTES", "100000"),
            ("WSDOT_ACCESS_CODE", "   "),
            ("HOME_COORDS", "somewhere"),
        ]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.utc_offset.local_minus_utc(), -7 * 3600);
        assert_eq!(config.wsdot_access_code, None);
        assert_eq!(config.places.home, None);
    }

    #[test]
    fn live_setup_requires_every_place() {
        let err = AppConfig::default().live_setup().unwrap_err();
        assert_eq!(err.to_string(), "not configured: HOME_COORDS is not set");

        let mut vars = all_places();
        vars.retain(|(k, _)| *k != "BAINBRIDGE_TERMINAL_COORDS");
        let err = config(&vars).live_setup().unwrap_err();
        assert_eq!(
            err.to_string(),
            "not configured: BAINBRIDGE_TERMINAL_COORDS is not set"
        );
    }

    #[test]
    fn live_setup_builds_corridors() {
        let setup = config(&all_places()).live_setup().unwrap();

        assert_eq!(setup.corridors.len(), 2);
        assert_eq!(setup.corridors[0].route_name, "Edmonds → Kingston");
        assert_eq!(setup.corridors[0].departing.id, 8);
        assert_eq!(setup.corridors[0].arriving.id, 12);
        assert_eq!(setup.corridors[1].route_name, "Seattle → Bainbridge");
        assert_eq!(setup.corridors[1].departing.id, 7);
        assert_eq!(setup.corridors[1].arriving.id, 3);
    }
}
