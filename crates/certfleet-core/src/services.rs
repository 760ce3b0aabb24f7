//! Traits for the external services the workflows depend on.

use async_trait::async_trait;
use std::path::Path;

use crate::{CertificatePage, CertificateStatus, FindingSet, Qos, Result};

/// Certificate identity registry
#[async_trait]
pub trait CertificateRegistry: Send + Sync {
    /// Register a PEM certificate without a CA and return its registry id
    async fn register_certificate(
        &self,
        certificate_pem: &str,
        status: CertificateStatus,
    ) -> Result<String>;

    /// Resolve a certificate id to its ARN
    async fn certificate_arn(&self, certificate_id: &str) -> Result<String>;

    /// Things attached to a principal, at most `max_results` of them
    async fn principal_things(&self, principal: &str, max_results: u32) -> Result<Vec<String>>;

    /// Change a certificate's status
    async fn update_certificate_status(
        &self,
        certificate_id: &str,
        status: CertificateStatus,
    ) -> Result<()>;

    /// Delete a certificate; the registry only accepts this for inactive or revoked ones
    async fn delete_certificate(&self, certificate_id: &str) -> Result<()>;

    /// One page of every registered certificate, starting at `marker`
    async fn list_certificates(&self, marker: Option<&str>) -> Result<CertificatePage>;
}

/// Compliance audit service
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Findings of one check within one audit task
    async fn list_audit_findings(&self, task_id: &str, check_name: &str) -> Result<FindingSet>;
}

/// Object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download an object into a local file, replacing it if present
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> Result<()>;
}

/// Device messaging channel
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a payload to a topic
    async fn publish(&self, topic: &str, qos: Qos, payload: &[u8]) -> Result<()>;
}
