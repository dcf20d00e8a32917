//! Clients for the external live-data providers.
//!
//! - [`directions`]: traffic-aware drive times
//! - [`wsdot`]: highway travel times and the ferry schedule feeds
//!
//! Both share [`ProviderError`] and a [`RetryPolicy`] that retries only
//! transient failures.

pub mod directions;
mod error;
mod http;
mod retry;
pub mod wsdot;

pub use directions::{DepartureTime, DirectionsClient, DirectionsConfig, DriveTimeEstimate};
pub use error::{ProviderError, is_retriable_status};
pub use retry::{DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, RetryPolicy};
pub use wsdot::{TerminalSchedule, WsdotClient, WsdotConfig};
