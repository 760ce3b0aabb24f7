//! certfleet - AWS IoT test certificate fleets
//!
//! Seeds and clears batches of self-signed device certificates, and sends
//! rotation requests for certificates flagged by an expiry audit.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    certfleet_cli::run().await
}
