//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use certfleet::{region_from_env, Distribution, DEFAULT_LEDGER_DIR};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    let region = pick_region(cli.region, region_from_env(), config.region.clone());
    let ledger_dir = cli
        .ledger_dir
        .or_else(|| config.ledger_dir.clone())
        .unwrap_or_else(|| DEFAULT_LEDGER_DIR.into());

    let ctx = commands::Context {
        config,
        region,
        ledger_dir,
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
    };

    match cli.command {
        Commands::Deploy(args) => commands::deploy::execute(ctx, args, Distribution::Random).await,
        Commands::DeployEven(args) => commands::deploy::execute(ctx, args, Distribution::Even).await,
        Commands::Cleanup => commands::cleanup::execute(ctx).await,
        Commands::Purge => commands::purge::execute(ctx).await,
        Commands::Notify(args) => commands::notify::execute(ctx, args).await,
    }
}

/// Flag first, then the environment, then the config file
fn pick_region(
    flag: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Option<String> {
    flag.or(env).or(file)
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,certfleet={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
