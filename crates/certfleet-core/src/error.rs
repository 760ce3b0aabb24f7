use thiserror::Error;

/// Result type alias for certfleet operations
pub type Result<T> = std::result::Result<T, FleetError>;

/// Errors that can occur while managing a certificate fleet
#[derive(Error, Debug)]
pub enum FleetError {
    /// Request was rejected because the credentials are missing, invalid or lack permission
    #[error("access denied: {0}")]
    Unauthorized(String),

    /// Request was throttled by the service
    #[error("request throttled: {0}")]
    Throttled(String),

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Service returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the service
        message: String,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error (ledger, scratch files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Incoming event did not have the expected shape
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Validity window outside the allowed range
    #[error("invalid validity: {days} days is outside {min}..={max}")]
    InvalidValidity {
        /// Requested number of days
        days: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Certificate generation or signing failed
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FleetError {
    /// Returns true if the error came back from a remote service call
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_)
                | Self::Throttled(_)
                | Self::NotFound { .. }
                | Self::Api { .. }
                | Self::Http(_)
        )
    }

    /// Returns the HTTP status code if the service produced one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(403),
            Self::Throttled(_) => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
