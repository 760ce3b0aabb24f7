//! Rotation notices for devices flagged by an expiring-certificate audit.

use certfleet_core::{
    rotation_topic, Acknowledgement, AuditCompletionMessage, AuditDetail, AuditService,
    CertificateRegistry, FindingSet, FleetError, MessagePublisher, NotificationEnvelope,
    ObjectStore, Qos, Result, RotationRequest,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Things listed per certificate; further pages are not fetched
pub const DEFAULT_MAX_THINGS: u32 = 100;

/// Turns audit-completion events into rotation requests on each owning thing's topic
pub struct RotationNotifier<'a> {
    registry: &'a dyn CertificateRegistry,
    audit: &'a dyn AuditService,
    objects: &'a dyn ObjectStore,
    publisher: &'a dyn MessagePublisher,
    scratch_dir: PathBuf,
    max_things: u32,
}

impl<'a> RotationNotifier<'a> {
    /// Create a notifier that downloads findings into `scratch_dir`
    pub fn new(
        registry: &'a dyn CertificateRegistry,
        audit: &'a dyn AuditService,
        objects: &'a dyn ObjectStore,
        publisher: &'a dyn MessagePublisher,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            audit,
            objects,
            publisher,
            scratch_dir: scratch_dir.into(),
            max_things: DEFAULT_MAX_THINGS,
        }
    }

    /// Change how many things are listed per certificate
    #[must_use]
    pub const fn with_max_things(mut self, max_things: u32) -> Self {
        self.max_things = max_things;
        self
    }

    /// Handle one raw notification envelope.
    ///
    /// Returns the fixed acknowledgement whether or not anything was published.
    /// Any failure aborts the whole event.
    pub async fn handle(&self, raw_event: &str) -> Result<Acknowledgement> {
        let message = NotificationEnvelope::parse(raw_event).map_err(|e| {
            error!("rejecting event: {e}");
            e
        })?;

        let published = self.process(&message).await?;
        info!(task_id = %message.task_id, published, "rotation notices sent");

        Ok(Acknowledgement::rotation_initiated())
    }

    /// Publish rotation requests for every expiring-certificate finding.
    ///
    /// Returns the number of messages published.
    pub async fn process(&self, message: &AuditCompletionMessage) -> Result<usize> {
        let mut published = 0;

        for detail in &message.audit_details {
            if !detail.is_expiring_certificate_violation() {
                debug!(
                    check = %detail.check_name,
                    status = %detail.check_run_status,
                    "skipping audit detail"
                );
                continue;
            }

            let findings = self.findings(&message.task_id, detail).await?;
            info!(
                task_id = %message.task_id,
                findings = findings.findings.len(),
                "processing expiring certificate findings"
            );

            for finding in &findings.findings {
                let certificate_id = finding.device_certificate_id().map_err(|e| {
                    error!("unusable finding: {e}");
                    e
                })?;
                published += self.notify_owners(certificate_id).await?;
            }
        }

        Ok(published)
    }

    /// Findings from the precomputed results object if the detail names one,
    /// otherwise from the audit service (first page only)
    async fn findings(&self, task_id: &str, detail: &AuditDetail) -> Result<FindingSet> {
        match detail.results_location() {
            Some((bucket, key)) => self.download_findings(bucket, key).await,
            None => {
                self.audit
                    .list_audit_findings(task_id, &detail.check_name)
                    .await
            }
        }
    }

    async fn download_findings(&self, bucket: &str, key: &str) -> Result<FindingSet> {
        let file_name = key.rsplit('/').next().unwrap_or(key);
        if file_name.is_empty() {
            let err = FleetError::MalformedEvent(format!("results key {key:?} names no object"));
            error!("{err}");
            return Err(err);
        }

        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|e| data_failure(&self.scratch_dir, e.into()))?;
        let destination = self.scratch_dir.join(file_name);

        self.objects
            .download(bucket, key, &destination)
            .await
            .map_err(|e| data_failure(&destination, e))?;
        debug!(bucket, key, path = %destination.display(), "downloaded audit results");

        let contents = tokio::fs::read_to_string(&destination)
            .await
            .map_err(|e| data_failure(&destination, e.into()))?;
        serde_json::from_str(&contents).map_err(|e| data_failure(&destination, e.into()))
    }

    /// Publish a rotation request to every thing attached to the certificate
    async fn notify_owners(&self, certificate_id: &str) -> Result<usize> {
        let arn = self.registry.certificate_arn(certificate_id).await?;
        let things = self.registry.principal_things(&arn, self.max_things).await?;

        let payload = serde_json::to_vec(&RotationRequest::default())?;
        for thing in &things {
            let topic = rotation_topic(thing, certificate_id);
            self.publisher
                .publish(&topic, Qos::AtLeastOnce, &payload)
                .await?;
            info!(thing = %thing, certificate_id, topic = %topic, "published rotation request");
        }

        Ok(things.len())
    }
}

fn data_failure(path: &Path, err: FleetError) -> FleetError {
    error!(path = %path.display(), "failed to load audit results: {err}");
    err
}
