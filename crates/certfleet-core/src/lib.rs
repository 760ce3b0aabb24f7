//! Core types and traits for certfleet.
//!
//! This crate provides the foundational pieces shared by the client, the
//! certificate issuer and the workflows:
//!
//! - **Types**: Strongly-typed registry records, audit events and messages
//! - **Errors**: A single [`FleetError`] for every fallible operation
//! - **Services**: The traits the workflows are written against, so the
//!   AWS-backed client can be swapped for in-memory doubles
//!
//! # Example
//!
//! ```rust,ignore
//! use certfleet_core::{CertificateRegistry, CertificateStatus, Result};
//!
//! async fn revoke(registry: &dyn CertificateRegistry, id: &str) -> Result<()> {
//!     registry.update_certificate_status(id, CertificateStatus::Revoked).await?;
//!     registry.delete_certificate(id).await
//! }
//! ```

mod error;
mod services;
pub mod types;

pub use error::{FleetError, Result};
pub use services::{AuditService, CertificateRegistry, MessagePublisher, ObjectStore};
pub use types::*;
