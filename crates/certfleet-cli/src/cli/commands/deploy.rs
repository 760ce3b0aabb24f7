//! `certfleet deploy` and `certfleet deploy_w_even_dist` - Register a batch.

use anyhow::Result;
use certfleet::{BatchPlan, CertificateFleet, CertificateStatus, DeployReport, Distribution, SelfSignedIssuer};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::Context;
use crate::cli::args::DeployArgs;
use crate::output::{print_json, OutputFormat};

pub async fn execute(ctx: Context, args: DeployArgs, distribution: Distribution) -> Result<()> {
    let limits = ctx.config.batch_limits()?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plan = BatchPlan::generate(distribution, &limits, &mut rng);

    let client = ctx.client()?;
    let issuer = SelfSignedIssuer::new();
    let fleet = CertificateFleet::new(&client, &issuer, ctx.ledger());

    let report = fleet.deploy(&plan, &mut rng).await?;

    match ctx.output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Pretty => print_summary(&report),
    }

    Ok(())
}

fn print_summary(report: &DeployReport) {
    println!(
        "{} {} certificates ({} active, {} inactive)",
        "Registered".green().bold(),
        report.registered.len(),
        report.count(CertificateStatus::Active),
        report.count(CertificateStatus::Inactive),
    );

    let validities = report.registered.iter().map(|e| e.validity);
    if let (Some(shortest), Some(longest)) = (validities.clone().min(), validities.max()) {
        println!("  {} {} to {}", "Validity:".bold(), shortest, longest);
    }
    println!("  {} {}", "Ledger:".bold(), report.ledger.display());
}
