//! `certfleet notify` - Send rotation requests for an audit-completion event.

use anyhow::{Context as _, Result};
use certfleet::{NotificationEnvelope, RotationNotifier};
use std::io::Read;
use tracing::{debug, info};

use super::Context;
use crate::cli::args::NotifyArgs;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: NotifyArgs) -> Result<()> {
    let raw = read_event(&args)?;

    // Reject a bad event before credentials are looked up
    NotificationEnvelope::parse(&raw)?;

    let scratch_dir = args
        .scratch_dir
        .or_else(|| ctx.config.scratch_dir.clone())
        .unwrap_or_else(std::env::temp_dir);
    debug!(scratch_dir = %scratch_dir.display(), max_things = args.max_things, "handling audit event");

    let client = ctx.client()?;
    let notifier = RotationNotifier::new(&client, &client, &client, &client, scratch_dir)
        .with_max_things(args.max_things);

    let ack = notifier.handle(&raw).await?;
    info!(status_code = ack.status_code, "audit event handled");

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&ack)?),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(&ack)?),
    }

    Ok(())
}

fn read_event(args: &NotifyArgs) -> Result<String> {
    match &args.event {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            Ok(raw)
        }
    }
}
