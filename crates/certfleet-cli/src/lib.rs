//! # certfleet-cli
//!
//! Command-line interface for AWS IoT test certificate fleets.
//!
//! ## Commands
//!
//! - **deploy**: Issue and register a random-size batch with random validities
//! - **deploy_w_even_dist**: Same, with validities spread evenly
//! - **cleanup**: Revoke and delete everything recorded in the ledger
//! - **purge**: Revoke and delete every certificate in the registry
//! - **notify**: Run the rotation notifier on an audit-completion event

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
