//! Results of deploy, cleanup and purge runs.

use certfleet_core::{CertificateStatus, ValidityDays};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of revoking and deleting one certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemovalOutcome {
    /// Revoked and deleted
    Removed,
    /// Still registered
    Failed {
        /// Why the registry refused
        reason: String,
    },
}

impl RemovalOutcome {
    /// True when the certificate is gone
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// One certificate's removal result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalRecord {
    /// Registry id
    pub certificate_id: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: RemovalOutcome,
}

/// Per-certificate results of a cleanup or purge, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    records: Vec<RemovalRecord>,
}

impl RemovalReport {
    /// Record an outcome
    pub fn push(&mut self, certificate_id: impl Into<String>, outcome: RemovalOutcome) {
        self.records.push(RemovalRecord {
            certificate_id: certificate_id.into(),
            outcome,
        });
    }

    /// All records
    #[must_use]
    pub fn records(&self) -> &[RemovalRecord] {
        &self.records
    }

    /// Number of certificates processed
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was processed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of certificates removed
    #[must_use]
    pub fn removed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_removed()).count()
    }

    /// Ids that are still registered, in their original order
    #[must_use]
    pub fn retained(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_removed())
            .map(|r| r.certificate_id.clone())
            .collect()
    }

    /// True when every certificate was removed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|r| r.outcome.is_removed())
    }
}

/// Result of a cleanup run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "report", rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// No ledger existed; nothing was touched
    NothingToClean,
    /// Every recorded certificate was removed and the ledger deleted
    Drained(RemovalReport),
    /// Some certificates remain; the ledger now lists only those
    Partial(RemovalReport),
}

impl CleanupOutcome {
    /// The removal report, if cleanup ran
    #[must_use]
    pub const fn report(&self) -> Option<&RemovalReport> {
        match self {
            Self::NothingToClean => None,
            Self::Drained(report) | Self::Partial(report) => Some(report),
        }
    }
}

/// One certificate registered by a deploy run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredEntry {
    /// Registry id
    pub certificate_id: String,
    /// Initial status
    pub status: CertificateStatus,
    /// Validity window
    pub validity: ValidityDays,
}

/// Result of a deploy run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// Ledger the ids were appended to
    pub ledger: PathBuf,
    /// Registered certificates in issue order
    pub registered: Vec<RegisteredEntry>,
}

impl DeployReport {
    /// Count of certificates with the given status
    #[must_use]
    pub fn count(&self, status: CertificateStatus) -> usize {
        self.registered.iter().filter(|e| e.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retained_keeps_failures_in_order() {
        let mut report = RemovalReport::default();
        report.push("a", RemovalOutcome::Removed);
        report.push("b", RemovalOutcome::Failed { reason: "in use".into() });
        report.push("c", RemovalOutcome::Removed);
        report.push("d", RemovalOutcome::Failed { reason: "throttled".into() });

        assert_eq!(report.len(), 4);
        assert_eq!(report.removed(), 2);
        assert_eq!(report.retained(), vec!["b", "d"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = RemovalReport::default();
        report.push("b", RemovalOutcome::Failed { reason: "in use".into() });

        let json = serde_json::to_value(CleanupOutcome::Partial(report)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "result": "partial",
                "report": {
                    "records": [
                        {"certificate_id": "b", "outcome": "failed", "reason": "in use"}
                    ]
                }
            })
        );
        assert_eq!(
            serde_json::to_value(CleanupOutcome::NothingToClean).unwrap(),
            serde_json::json!({"result": "nothing_to_clean"})
        );
    }
}
