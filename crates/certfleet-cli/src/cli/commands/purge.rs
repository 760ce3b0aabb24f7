//! `certfleet purge` - Remove every certificate in the registry.

use anyhow::Result;
use certfleet::{CertificateFleet, SelfSignedIssuer};
use colored::Colorize;

use super::cleanup::print_failures;
use super::Context;
use crate::output::{print_json, OutputFormat};

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let issuer = SelfSignedIssuer::new();
    let fleet = CertificateFleet::new(&client, &issuer, ctx.ledger());

    let report = fleet.purge().await?;

    match ctx.output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Pretty => {
            print_failures(&report);
            if report.is_clean() {
                println!("{}", "Registry is empty".green());
            }
        }
    }

    Ok(())
}
