//! `certfleet cleanup` - Remove every certificate recorded in the ledger.

use anyhow::Result;
use certfleet::{CertificateFleet, CleanupOutcome, RemovalReport, SelfSignedIssuer};
use colored::Colorize;
use std::path::Path;
use tracing::info;

use super::Context;
use crate::output::{print_json, OutputFormat};

pub async fn execute(ctx: Context) -> Result<()> {
    let ledger = ctx.ledger();

    // No ledger means no registry calls, so no credentials are needed either
    let outcome = if ledger.exists() {
        let client = ctx.client()?;
        let issuer = SelfSignedIssuer::new();
        CertificateFleet::new(&client, &issuer, ledger.clone())
            .cleanup()
            .await?
    } else {
        info!(ledger = %ledger.path().display(), "no ledger, skipping registry calls");
        CleanupOutcome::NothingToClean
    };

    match ctx.output_format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Pretty => print_outcome(&outcome, &ledger.path()),
    }

    Ok(())
}

fn print_outcome(outcome: &CleanupOutcome, ledger: &Path) {
    match outcome {
        CleanupOutcome::NothingToClean => {
            println!("Nothing to clean: no ledger at {}", ledger.display());
        }
        CleanupOutcome::Drained(report) => {
            println!(
                "{} {} certificates; ledger removed",
                "Removed".green().bold(),
                report.removed()
            );
        }
        CleanupOutcome::Partial(report) => {
            print_failures(report);
            println!(
                "{}",
                format!(
                    "{} certificate(s) kept in {}; manual follow-up needed",
                    report.retained().len(),
                    ledger.display()
                )
                .yellow()
            );
        }
    }
}

/// List removed and failed counts, then each failure.
pub(crate) fn print_failures(report: &RemovalReport) {
    println!(
        "{} {} of {} certificates",
        "Removed".bold(),
        report.removed(),
        report.len()
    );
    for record in report.records() {
        if let certfleet::RemovalOutcome::Failed { reason } = &record.outcome {
            println!("  {} {}: {}", "✗".red(), record.certificate_id, reason);
        }
    }
}
