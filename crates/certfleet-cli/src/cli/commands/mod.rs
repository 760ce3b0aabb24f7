//! Command implementations.

pub mod cleanup;
pub mod deploy;
pub mod notify;
pub mod purge;

use anyhow::{Context as _, Result};
use certfleet::{Credentials, IotClient, Ledger, DEFAULT_REGION};
use std::path::PathBuf;

use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration file
    pub config: Config,

    /// Region from the flag, env or config file
    pub region: Option<String>,

    /// Ledger directory
    pub ledger_dir: PathBuf,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// The certificate id ledger.
    pub fn ledger(&self) -> Ledger {
        Ledger::in_dir(&self.ledger_dir)
    }

    /// Region to sign requests for.
    pub fn resolved_region(&self) -> String {
        self.region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Create an AWS client from environment credentials and the config.
    pub fn client(&self) -> Result<IotClient> {
        let credentials = Credentials::from_env().context(
            "AWS credentials required.\n\n\
             Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY \
             (and AWS_SESSION_TOKEN for temporary credentials)",
        )?;
        let region = self.resolved_region();

        let client = IotClient::builder(credentials)
            .endpoints(self.config.endpoints(&region))
            .region(region)
            .throttle(self.config.throttle())
            .build()?;

        Ok(client)
    }
}
