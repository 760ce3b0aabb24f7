//! Configuration management.

use anyhow::{Context as _, Result};
use certfleet::{BatchLimits, Endpoints, ThrottleConfig, MAX_NUM_CERTS, MIN_NUM_CERTS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// AWS region
    pub region: Option<String>,

    /// Directory holding the certificate id ledger
    pub ledger_dir: Option<PathBuf>,

    /// Directory audit results are downloaded into
    pub scratch_dir: Option<PathBuf>,

    /// Client-side rate limit for AWS calls
    pub requests_per_second: Option<u32>,

    /// Batch bounds for deploy runs
    #[serde(default)]
    pub batch: BatchConfig,

    /// Service endpoint overrides
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

/// `[batch]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    pub min_certificates: Option<u32>,
    pub max_certificates: Option<u32>,
    pub min_days: Option<u32>,
    pub max_days: Option<u32>,
}

/// `[endpoints]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// IoT control plane
    pub iot: Option<String>,
    /// IoT data plane, usually the account's `-ats` endpoint
    pub iot_data: Option<String>,
    /// S3
    pub s3: Option<String>,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "certfleet", "certfleet")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse TOML configuration.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Batch limits, with unset bounds taken from the defaults
    pub fn batch_limits(&self) -> Result<BatchLimits> {
        let defaults = BatchLimits::default();
        let limits = BatchLimits::new(
            self.batch.min_certificates.unwrap_or(MIN_NUM_CERTS),
            self.batch.max_certificates.unwrap_or(MAX_NUM_CERTS),
            self.batch.min_days.unwrap_or(defaults.min_days().days()),
            self.batch.max_days.unwrap_or(defaults.max_days().days()),
        )?;
        Ok(limits)
    }

    /// Endpoints for `region` with any overrides applied
    pub fn endpoints(&self, region: &str) -> Endpoints {
        let mut endpoints = Endpoints::for_region(region);
        if let Some(iot) = &self.endpoints.iot {
            endpoints = endpoints.with_iot(iot.as_str());
        }
        if let Some(iot_data) = &self.endpoints.iot_data {
            endpoints = endpoints.with_iot_data(iot_data.as_str());
        }
        if let Some(s3) = &self.endpoints.s3 {
            endpoints = endpoints.with_s3(s3.as_str());
        }
        endpoints
    }

    /// Rate limit for the AWS client
    pub fn throttle(&self) -> ThrottleConfig {
        match self.requests_per_second {
            Some(rps) => ThrottleConfig::new().requests_per_second(rps),
            None => ThrottleConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            region = "eu-west-1"
            ledger_dir = "/var/lib/certfleet"
            requests_per_second = 5

            [batch]
            min_certificates = 2
            max_certificates = 4
            max_days = 30

            [endpoints]
            iot_data = "https://abc123-ats.iot.eu-west-1.amazonaws.com/"
            "#,
        )
        .unwrap();

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.ledger_dir, Some(PathBuf::from("/var/lib/certfleet")));
        assert_eq!(config.throttle().requests_per_second.get(), 5);

        let limits = config.batch_limits().unwrap();
        assert_eq!(limits.min_certificates(), 2);
        assert_eq!(limits.max_certificates(), 4);
        assert_eq!(limits.min_days().days(), 1);
        assert_eq!(limits.max_days().days(), 30);

        let endpoints = config.endpoints("eu-west-1");
        assert_eq!(endpoints.iot, "https://iot.eu-west-1.amazonaws.com");
        assert_eq!(endpoints.iot_data, "https://abc123-ats.iot.eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.batch_limits().unwrap(), BatchLimits::default());
        assert_eq!(config.throttle().requests_per_second.get(), 10);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse("unknown_key = 1").is_err());

        let config = Config::parse("[batch]\nmax_days = 9000").unwrap();
        assert!(config.batch_limits().is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("config.toml");
        std::fs::write(&path, "region = \"ap-south-1\"\n").unwrap();
        assert_eq!(
            Config::load(Some(&path)).unwrap().region.as_deref(),
            Some("ap-south-1")
        );
    }
}
