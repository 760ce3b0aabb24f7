//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Seed, clear and rotate AWS IoT test certificate fleets
///
/// Credentials come from AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and
/// AWS_SESSION_TOKEN.
#[derive(Parser, Debug)]
#[command(name = "certfleet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "CERTFLEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the certificate id ledger [default: certs_data]
    #[arg(long, global = true, env = "CERTFLEET_LEDGER_DIR")]
    pub ledger_dir: Option<PathBuf>,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a random-size batch of certificates with random validities
    Deploy(DeployArgs),

    /// Register a random-size batch with validities spread evenly
    #[command(name = "deploy_w_even_dist")]
    DeployEven(DeployArgs),

    /// Revoke and delete every certificate recorded in the ledger
    Cleanup,

    /// Revoke and delete every certificate in the registry
    Purge,

    /// Send rotation requests for an audit-completion event
    Notify(NotifyArgs),
}

// ============================================================================
// Deploy commands
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Seed for batch size, validities and statuses
    #[arg(long)]
    pub seed: Option<u64>,
}

// ============================================================================
// Notify command
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct NotifyArgs {
    /// Event file; reads stdin when omitted or `-`
    pub event: Option<PathBuf>,

    /// Directory audit results are downloaded into
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Things listed per certificate
    #[arg(long, default_value_t = certfleet::DEFAULT_MAX_THINGS)]
    pub max_things: u32,
}
