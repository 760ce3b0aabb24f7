//! Client configuration types.

use certfleet_core::{FleetError, Result};
use std::num::NonZeroU32;

/// Region used when neither the builder nor the environment names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// AWS access credentials
#[derive(Clone)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
    pub fn from_env() -> Result<Self> {
        let access_key_id = non_empty_env("AWS_ACCESS_KEY_ID").ok_or_else(|| {
            FleetError::Config("AWS_ACCESS_KEY_ID is not set".to_string())
        })?;
        let secret_access_key = non_empty_env("AWS_SECRET_ACCESS_KEY").ok_or_else(|| {
            FleetError::Config("AWS_SECRET_ACCESS_KEY is not set".to_string())
        })?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty_env("AWS_SESSION_TOKEN"),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Region from `AWS_REGION`, then `AWS_DEFAULT_REGION`
#[must_use]
pub fn region_from_env() -> Option<String> {
    non_empty_env("AWS_REGION").or_else(|| non_empty_env("AWS_DEFAULT_REGION"))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Base URLs of the services the client calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// IoT control plane (registry and audit)
    pub iot: String,

    /// IoT data plane (publish)
    pub iot_data: String,

    /// S3, addressed path-style
    pub s3: String,
}

impl Endpoints {
    /// Public endpoints of a region
    #[must_use]
    pub fn for_region(region: &str) -> Self {
        Self {
            iot: format!("https://iot.{region}.amazonaws.com"),
            iot_data: format!("https://data-ats.iot.{region}.amazonaws.com"),
            s3: format!("https://s3.{region}.amazonaws.com"),
        }
    }

    /// Route every service to one base URL (local stacks, mock servers)
    #[must_use]
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = trim_base(base_url.into());
        Self {
            iot: base_url.clone(),
            iot_data: base_url.clone(),
            s3: base_url,
        }
    }

    /// Override the control-plane endpoint
    #[must_use]
    pub fn with_iot(mut self, url: impl Into<String>) -> Self {
        self.iot = trim_base(url.into());
        self
    }

    /// Override the data-plane endpoint (usually the account's `-ats` endpoint)
    #[must_use]
    pub fn with_iot_data(mut self, url: impl Into<String>) -> Self {
        self.iot_data = trim_base(url.into());
        self
    }

    /// Override the S3 endpoint
    #[must_use]
    pub fn with_s3(mut self, url: impl Into<String>) -> Self {
        self.s3 = trim_base(url.into());
        self
    }
}

fn trim_base(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Client-side request throttling
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Requests allowed per second across all services
    pub requests_per_second: NonZeroU32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ThrottleConfig {
    /// Ten requests per second, matching the registry's default per-API quota
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests_per_second: match NonZeroU32::new(10) {
                Some(rps) => rps,
                None => unreachable!(),
            },
        }
    }

    /// Set the rate; zero is raised to one
    #[must_use]
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        self
    }
}
