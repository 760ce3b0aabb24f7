//! Inbound audit-completion events.
//!
//! The audit service announces finished audits through a notification topic.
//! The handler receives the topic's delivery envelope, whose first record wraps
//! the audit message as a JSON string.

use serde::{Deserialize, Serialize};

use super::audit::{checks, run_status};
use crate::{FleetError, Result};

/// Notification delivery envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Delivered records; only the first one is read
    #[serde(rename = "Records")]
    pub records: Vec<NotificationRecord>,
}

/// One delivered notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Event source (e.g. `aws:sns`)
    #[serde(rename = "EventSource", default)]
    pub event_source: Option<String>,

    /// The notification itself
    #[serde(rename = "Sns")]
    pub sns: Notification,
}

/// Notification body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Topic the message was published to
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: Option<String>,

    /// Subject line
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,

    /// The audit message, JSON-encoded
    #[serde(rename = "Message")]
    pub message: String,
}

impl NotificationEnvelope {
    /// Parse a raw envelope and decode the audit message of its first record
    pub fn parse(raw: &str) -> Result<AuditCompletionMessage> {
        let envelope: Self = serde_json::from_str(raw)
            .map_err(|e| FleetError::MalformedEvent(format!("envelope: {e}")))?;
        envelope.audit_message()
    }

    /// Decode the audit message of the first record
    pub fn audit_message(&self) -> Result<AuditCompletionMessage> {
        let record = self
            .records
            .first()
            .ok_or_else(|| FleetError::MalformedEvent("envelope has no records".into()))?;

        serde_json::from_str(&record.sns.message)
            .map_err(|e| FleetError::MalformedEvent(format!("audit message: {e}")))
    }
}

/// Audit-completion message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCompletionMessage {
    /// Audit task id
    pub task_id: String,

    /// ON_DEMAND_AUDIT_TASK or SCHEDULED_AUDIT_TASK
    #[serde(default)]
    pub task_type: Option<String>,

    /// Overall task status
    #[serde(default)]
    pub task_status: Option<String>,

    /// Per-check results
    #[serde(default)]
    pub audit_details: Vec<AuditDetail>,
}

/// Result of one check within an audit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetail {
    /// Check name
    pub check_name: String,

    /// Check run status
    pub check_run_status: String,

    /// Number of non-compliant resources
    #[serde(default)]
    pub non_compliant_resources_count: Option<u64>,

    /// Number of resources checked
    #[serde(default)]
    pub total_resources_count: Option<u64>,

    /// Bucket holding precomputed findings
    #[serde(default)]
    pub results_s3_bucket: Option<String>,

    /// Key of the precomputed findings object
    #[serde(default)]
    pub results_s3_key: Option<String>,
}

impl AuditDetail {
    /// True for a completed expiring-certificate check that found violations
    #[must_use]
    pub fn is_expiring_certificate_violation(&self) -> bool {
        self.check_name == checks::DEVICE_CERTIFICATE_EXPIRING_CHECK
            && self.check_run_status == run_status::COMPLETED_NON_COMPLIANT
    }

    /// Bucket and key of the precomputed findings, when both are present
    #[must_use]
    pub fn results_location(&self) -> Option<(&str, &str)> {
        match (&self.results_s3_bucket, &self.results_s3_key) {
            (Some(bucket), Some(key)) => Some((bucket, key)),
            _ => None,
        }
    }
}
