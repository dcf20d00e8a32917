//! Provider client error types.

use std::fmt;

/// Errors from the external data provider clients.
#[derive(Debug)]
pub enum ProviderError {
    /// Transport failure from reqwest
    Http(reqwest::Error),

    /// JSON deserialization failed, usually an unexpected payload shape
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-success HTTP status
    ApiError { status: u16, message: String },

    /// API answered 2xx but reported a failure status in the payload
    PayloadStatus {
        status: String,
        message: Option<String>,
    },

    /// Payload parsed but a required field was missing
    MissingField(&'static str),

    /// Credentials rejected (401/403)
    Unauthorized,

    /// Retriable failures persisted through every attempt
    RetriesExhausted {
        attempts: u32,
        last: Box<ProviderError>,
    },

    /// Provider credentials or settings are absent
    NotConfigured(String),
}

/// Payload statuses from the directions API that are worth retrying.
const RETRIABLE_PAYLOAD_STATUSES: [&str; 2] = ["UNKNOWN_ERROR", "OVER_QUERY_LIMIT"];

/// Returns true for HTTP statuses that indicate a transient failure.
pub fn is_retriable_status(status: u16) -> bool {
    status >= 500 || status == 429
}

impl ProviderError {
    /// Returns true if repeating the request may succeed.
    ///
    /// Shape errors, missing fields and auth failures are terminal.
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect(),
            ProviderError::ApiError { status, .. } => is_retriable_status(*status),
            ProviderError::PayloadStatus { status, .. } => {
                RETRIABLE_PAYLOAD_STATUSES.contains(&status.as_str())
            }
            ProviderError::Json { .. }
            | ProviderError::MissingField(_)
            | ProviderError::Unauthorized
            | ProviderError::RetriesExhausted { .. }
            | ProviderError::NotConfigured(_) => false,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {e}"),
            ProviderError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ProviderError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            ProviderError::PayloadStatus { status, message } => {
                write!(f, "API reported {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            ProviderError::MissingField(field) => write!(f, "response missing {field}"),
            ProviderError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            ProviderError::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
            ProviderError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Http(e) => Some(e),
            ProviderError::RetriesExhausted { last, .. } => Some(last.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err)
    }
}
