//! Caching layer for provider responses.
//!
//! Terminal schedules change rarely, so they are cached per terminal.
//! Drive-time estimates depend on the departure time; keys bucket the
//! departure (5-minute buckets by default) to bound cache cardinality while
//! keeping predictions reasonably fresh.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::providers::{
    DepartureTime, DirectionsClient, DriveTimeEstimate, ProviderError, TerminalSchedule,
    WsdotClient,
};

/// Cache key for drive estimates: (origin, destination, departure bucket).
/// `None` for the bucket means "now".
type DriveKey = (String, String, Option<i64>);

/// Configuration for the caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays fresh.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,

    /// Departure bucket size in minutes.
    pub bucket_mins: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
            bucket_mins: 5,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

/// Shared caches for provider responses.
pub struct ProviderCache {
    /// Terminal schedules, keyed by terminal id.
    schedules: MokaCache<i64, Arc<TerminalSchedule>>,

    /// Drive estimates, keyed by (origin, destination, departure bucket).
    drives: MokaCache<DriveKey, Arc<DriveTimeEstimate>>,

    /// Bucket size in seconds.
    bucket_secs: i64,
}

impl ProviderCache {
    /// Build both caches from `config`.
    pub fn new(config: &CacheConfig) -> Self {
        let schedules = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let drives = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            schedules,
            drives,
            bucket_secs: config.bucket_mins.max(1) * 60,
        }
    }

    /// Bucket a departure time. Departures "now" share one bucket, which the
    /// TTL keeps fresh.
    fn departure_bucket(&self, departure: DepartureTime) -> Option<i64> {
        match departure {
            DepartureTime::Now => None,
            DepartureTime::At(ts) => Some(ts.div_euclid(self.bucket_secs)),
        }
    }

    fn drive_key(&self, origin: &str, destination: &str, departure: DepartureTime) -> DriveKey {
        (
            origin.to_string(),
            destination.to_string(),
            self.departure_bucket(departure),
        )
    }

    pub async fn get_schedule(&self, terminal_id: i64) -> Option<Arc<TerminalSchedule>> {
        self.schedules.get(&terminal_id).await
    }

    pub async fn insert_schedule(&self, terminal_id: i64, schedule: Arc<TerminalSchedule>) {
        self.schedules.insert(terminal_id, schedule).await;
    }

    pub async fn get_drive(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> Option<Arc<DriveTimeEstimate>> {
        self.drives
            .get(&self.drive_key(origin, destination, departure))
            .await
    }

    pub async fn insert_drive(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
        estimate: Arc<DriveTimeEstimate>,
    ) {
        let key = self.drive_key(origin, destination, departure);
        self.drives.insert(key, estimate).await;
    }

    /// Entries across both caches.
    pub fn entry_count(&self) -> u64 {
        self.schedules.entry_count() + self.drives.entry_count()
    }

    /// Drop every schedule and drive estimate.
    pub fn invalidate_all(&self) {
        self.schedules.invalidate_all();
        self.drives.invalidate_all();
    }
}

/// WSDOT client with caching of terminal schedules.
pub struct CachedWsdotClient {
    client: WsdotClient,
    cache: Arc<ProviderCache>,
}

impl CachedWsdotClient {
    pub fn new(client: WsdotClient, cache: Arc<ProviderCache>) -> Self {
        Self { client, cache }
    }

    /// Get a terminal schedule, using the cache if available.
    pub async fn terminal_schedule(
        &self,
        terminal_id: i64,
    ) -> Result<Arc<TerminalSchedule>, ProviderError> {
        if let Some(cached) = self.cache.get_schedule(terminal_id).await {
            return Ok(cached);
        }

        let schedule = Arc::new(self.client.terminal_schedule(terminal_id).await?);
        self.cache
            .insert_schedule(terminal_id, schedule.clone())
            .await;
        Ok(schedule)
    }
}

/// Directions client with caching of drive estimates.
pub struct CachedDirectionsClient {
    client: DirectionsClient,
    cache: Arc<ProviderCache>,
}

impl CachedDirectionsClient {
    pub fn new(client: DirectionsClient, cache: Arc<ProviderCache>) -> Self {
        Self { client, cache }
    }

    /// Get a drive-time estimate, using the cache if available.
    pub async fn drive_time(
        &self,
        origin: &str,
        destination: &str,
        departure: DepartureTime,
    ) -> Result<Arc<DriveTimeEstimate>, ProviderError> {
        if let Some(cached) = self.cache.get_drive(origin, destination, departure).await {
            return Ok(cached);
        }

        let estimate = Arc::new(
            self.client
                .drive_time(origin, destination, departure)
                .await?,
        );
        self.cache
            .insert_drive(origin, destination, departure, estimate.clone())
            .await;
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(seconds: i64) -> Arc<DriveTimeEstimate> {
        Arc::new(DriveTimeEstimate {
            origin: "SEA".to_string(),
            destination: "Edmonds".to_string(),
            distance_meters: 41_000,
            duration_seconds: seconds,
            duration_in_traffic_seconds: None,
            summary: "I-5 N".to_string(),
        })
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.bucket_mins, 5);

        let config = config
            .with_ttl(Duration::from_secs(30))
            .with_max_capacity(10);
        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.max_capacity, 10);
    }

    #[test]
    fn departure_buckets() {
        let cache = ProviderCache::new(&CacheConfig::default());

        // 5-minute buckets: 300 s
        assert_eq!(cache.departure_bucket(DepartureTime::At(0)), Some(0));
        assert_eq!(cache.departure_bucket(DepartureTime::At(299)), Some(0));
        assert_eq!(cache.departure_bucket(DepartureTime::At(300)), Some(1));
        assert_eq!(cache.departure_bucket(DepartureTime::Now), None);
    }

    #[test]
    fn cache_creation() {
        let cache = ProviderCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn drive_entries_share_a_bucket() {
        let cache = ProviderCache::new(&CacheConfig::default());
        cache
            .insert_drive("SEA", "Edmonds", DepartureTime::At(600), estimate(2820))
            .await;

        let hit = cache
            .get_drive("SEA", "Edmonds", DepartureTime::At(899))
            .await
            .unwrap();
        assert_eq!(hit.duration_seconds, 2820);

        assert!(
            cache
                .get_drive("SEA", "Edmonds", DepartureTime::At(900))
                .await
                .is_none()
        );
        assert!(
            cache
                .get_drive("SEA", "Kingston", DepartureTime::At(600))
                .await
                .is_none()
        );
        assert!(
            cache
                .get_drive("SEA", "Edmonds", DepartureTime::Now)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn schedule_round_trip_and_invalidate() {
        let cache = ProviderCache::new(&CacheConfig::default());
        let schedule = Arc::new(TerminalSchedule {
            terminal_id: 8,
            terminal_name: Some("Edmonds".to_string()),
            sailings: vec![],
        });
        cache.insert_schedule(8, schedule.clone()).await;

        assert_eq!(cache.get_schedule(8).await, Some(schedule));
        assert_eq!(cache.get_schedule(7).await, None);

        cache.invalidate_all();
        assert_eq!(cache.get_schedule(8).await, None);
    }
}
