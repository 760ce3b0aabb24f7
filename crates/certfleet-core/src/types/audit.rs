use serde::{Deserialize, Serialize};

use crate::{FleetError, Result};

/// Audit check names
pub mod checks {
    /// Device certificates that expire within the audit's threshold
    pub const DEVICE_CERTIFICATE_EXPIRING_CHECK: &str = "DEVICE_CERTIFICATE_EXPIRING_CHECK";
    /// Device certificates that have been revoked
    pub const REVOKED_DEVICE_CERTIFICATE_CHECK: &str = "REVOKED_DEVICE_CERTIFICATE_CHECK";
}

/// Audit check run statuses
pub mod run_status {
    /// Check ran and found violations
    pub const COMPLETED_NON_COMPLIANT: &str = "COMPLETED_NON_COMPLIANT";
    /// Check ran and found nothing
    pub const COMPLETED_COMPLIANT: &str = "COMPLETED_COMPLIANT";
    /// Check could not run
    pub const FAILED: &str = "FAILED";
}

/// Identifier of the resource a finding is about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    /// Device certificate id, set for certificate checks
    #[serde(default)]
    pub device_certificate_id: Option<String>,

    /// CA certificate id, set for CA checks
    #[serde(default)]
    pub ca_certificate_id: Option<String>,

    /// Client id, set for connection checks
    #[serde(default)]
    pub client_id: Option<String>,
}

/// The resource that failed an audit check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonCompliantResource {
    /// Resource type (e.g. `DEVICE_CERTIFICATE`)
    #[serde(default)]
    pub resource_type: Option<String>,

    /// Which resource
    #[serde(default)]
    pub resource_identifier: ResourceIdentifier,
}

/// One audit finding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    /// Finding id
    #[serde(default)]
    pub finding_id: Option<String>,

    /// Audit task that produced the finding
    #[serde(default)]
    pub task_id: Option<String>,

    /// Check that produced the finding
    #[serde(default)]
    pub check_name: Option<String>,

    /// Severity (LOW, MEDIUM, HIGH, CRITICAL)
    #[serde(default)]
    pub severity: Option<String>,

    /// The offending resource
    #[serde(default)]
    pub non_compliant_resource: NonCompliantResource,
}

impl AuditFinding {
    /// Id of the non-compliant device certificate.
    ///
    /// A finding without one cannot be acted on and is reported as malformed.
    pub fn device_certificate_id(&self) -> Result<&str> {
        self.non_compliant_resource
            .resource_identifier
            .device_certificate_id
            .as_deref()
            .ok_or_else(|| {
                FleetError::MalformedEvent(format!(
                    "finding {} has no deviceCertificateId",
                    self.finding_id.as_deref().unwrap_or("<unnamed>")
                ))
            })
    }
}

/// A set of findings, either from the audit API or from an S3 results object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingSet {
    /// The findings
    #[serde(default)]
    pub findings: Vec<AuditFinding>,

    /// Token for the next page (API only)
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Request body for listing findings of one check within one audit task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFindingsRequest {
    /// Audit task id
    pub task_id: String,

    /// Check name
    pub check_name: String,
}
