//! Signed HTTP client for the AWS services certfleet talks to.
//!
//! This crate provides [`IotClient`], which covers the IoT registry and
//! audit endpoints, the IoT data plane and S3 object downloads. Every request
//! is SigV4-signed and passes through a client-side rate limiter.
//!
//! [`IotClient`] implements the service traits from `certfleet-core`.

mod client;
mod config;
mod services;
mod signing;
pub mod api;

pub use client::{IotClient, IotClientBuilder};
pub use config::*;
pub use signing::{uri_encode, Signer};
pub use certfleet_core::{FleetError, Result};
