//! Test-fleet certificate lifecycle and audit-driven rotation notices for AWS IoT.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use certfleet::{BatchLimits, BatchPlan, CertificateFleet, IotClient, Ledger, SelfSignedIssuer};
//!
//! #[tokio::main]
//! async fn main() -> certfleet::Result<()> {
//!     let client = IotClient::from_env()?;
//!     let issuer = SelfSignedIssuer::new();
//!     let fleet = CertificateFleet::new(&client, &issuer, Ledger::default());
//!
//!     let mut rng = rand::thread_rng();
//!     let plan = BatchPlan::random(&BatchLimits::default(), &mut rng);
//!     let report = fleet.deploy(&plan, &mut rng).await?;
//!     println!("registered {} certificates", report.registered.len());
//!
//!     // later
//!     fleet.cleanup().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

pub mod ledger;
pub mod lifecycle;
pub mod plan;
pub mod report;
pub mod rotation;
pub mod status;

pub use ledger::{Ledger, LedgerWriter, DEFAULT_LEDGER_DIR};
pub use lifecycle::CertificateFleet;
pub use plan::{BatchLimits, BatchPlan, Distribution, MAX_NUM_CERTS, MIN_NUM_CERTS};
pub use report::{CleanupOutcome, DeployReport, RegisteredEntry, RemovalOutcome, RemovalReport};
pub use rotation::{RotationNotifier, DEFAULT_MAX_THINGS};
pub use status::StatusWeights;

// Re-export core types
pub use certfleet_core::*;

// Re-export client
pub use certfleet_client::{
    region_from_env, Credentials, Endpoints, IotClient, IotClientBuilder, ThrottleConfig,
    DEFAULT_REGION,
};

// Re-export issuer
pub use certfleet_pki::{CertificateIssuer, IssuedCertificate, PkiError, SelfSignedIssuer};

// Re-export runtime for convenience
pub use tokio;
