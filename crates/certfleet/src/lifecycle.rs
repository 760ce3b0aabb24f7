//! Deploy, cleanup and purge of test certificate fleets.

use certfleet_core::{CertificateRegistry, CertificateStatus, Result};
use certfleet_pki::CertificateIssuer;
use rand::Rng;
use tracing::{error, info, warn};

use crate::ledger::Ledger;
use crate::plan::BatchPlan;
use crate::report::{CleanupOutcome, DeployReport, RegisteredEntry, RemovalOutcome, RemovalReport};
use crate::status::StatusWeights;

/// Registers batches of self-signed certificates and removes them again
pub struct CertificateFleet<'a> {
    registry: &'a dyn CertificateRegistry,
    issuer: &'a dyn CertificateIssuer,
    ledger: Ledger,
    weights: StatusWeights,
}

impl<'a> CertificateFleet<'a> {
    /// Create a fleet manager writing to `ledger`
    pub fn new(
        registry: &'a dyn CertificateRegistry,
        issuer: &'a dyn CertificateIssuer,
        ledger: Ledger,
    ) -> Self {
        Self {
            registry,
            issuer,
            ledger,
            weights: StatusWeights::default(),
        }
    }

    /// Override the ACTIVE:INACTIVE weighting
    #[must_use]
    pub const fn with_weights(mut self, weights: StatusWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The ledger in use
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Register one PEM certificate under a weighted-random status
    pub async fn register<R: Rng + ?Sized>(
        &self,
        certificate_pem: &str,
        rng: &mut R,
    ) -> Result<(String, CertificateStatus)> {
        let status = self.weights.choose(rng);
        let certificate_id = self
            .registry
            .register_certificate(certificate_pem, status)
            .await?;
        Ok((certificate_id, status))
    }

    /// Issue, register and record every certificate in `plan`, one at a time.
    ///
    /// Each id reaches the ledger before the next certificate is issued. The
    /// first failure ends the run, leaving the ids registered so far recorded.
    pub async fn deploy<R: Rng + ?Sized>(
        &self,
        plan: &BatchPlan,
        rng: &mut R,
    ) -> Result<DeployReport> {
        let mut writer = self.ledger.open_writer()?;
        let mut registered = Vec::with_capacity(plan.len());

        info!(count = plan.len(), ledger = %self.ledger.path().display(), "deploying certificates");

        for (index, &validity) in plan.validities().iter().enumerate() {
            let issued = self.issuer.issue(validity)?;
            let (certificate_id, status) = self.register(&issued.pem, rng).await?;
            writer.record(&certificate_id)?;

            info!(
                index,
                certificate_id = %certificate_id,
                %status,
                days = validity.days(),
                "registered certificate"
            );

            registered.push(RegisteredEntry {
                certificate_id,
                status,
                validity,
            });
        }

        Ok(DeployReport {
            ledger: self.ledger.path(),
            registered,
        })
    }

    /// Revoke and delete every certificate recorded in the ledger.
    ///
    /// A missing ledger is not an error and touches nothing. Otherwise the
    /// ledger is backed up, then rewritten to hold only the ids that could not
    /// be removed, and deleted once empty.
    pub async fn cleanup(&self) -> Result<CleanupOutcome> {
        if !self.ledger.exists() {
            info!(ledger = %self.ledger.path().display(), "no ledger, nothing to clean");
            return Ok(CleanupOutcome::NothingToClean);
        }

        let backup = self.ledger.backup()?;
        info!(backup = %backup.display(), "backed up ledger");

        let ids = self.ledger.read()?.unwrap_or_default();
        let mut report = RemovalReport::default();
        for certificate_id in ids {
            let outcome = self.revoke_and_delete(&certificate_id).await;
            report.push(certificate_id, outcome);
        }

        let retained = report.retained();
        if retained.is_empty() {
            self.ledger.remove()?;
            info!(removed = report.removed(), "all recorded certificates removed");
            Ok(CleanupOutcome::Drained(report))
        } else {
            self.ledger.rewrite(&retained)?;
            warn!(
                removed = report.removed(),
                retained = retained.len(),
                ledger = %self.ledger.path().display(),
                "some certificates could not be removed; manual follow-up needed"
            );
            Ok(CleanupOutcome::Partial(report))
        }
    }

    /// Revoke and delete every certificate in the registry, recorded or not.
    ///
    /// The full listing is collected before anything is removed, so deletions
    /// cannot shift the pages being walked. The ledger is not touched.
    pub async fn purge(&self) -> Result<RemovalReport> {
        let ids = all_certificate_ids(self.registry).await?;
        info!(count = ids.len(), "purging every registered certificate");

        let mut report = RemovalReport::default();
        for certificate_id in ids {
            let outcome = self.revoke_and_delete(&certificate_id).await;
            report.push(certificate_id, outcome);
        }

        info!(
            removed = report.removed(),
            failed = report.len() - report.removed(),
            "purge finished"
        );
        Ok(report)
    }

    /// Set REVOKED, then delete. Failures are logged and reported, never raised.
    pub async fn revoke_and_delete(&self, certificate_id: &str) -> RemovalOutcome {
        let result = async {
            self.registry
                .update_certificate_status(certificate_id, CertificateStatus::Revoked)
                .await?;
            self.registry.delete_certificate(certificate_id).await
        }
        .await;

        match result {
            Ok(()) => {
                info!(certificate_id, "revoked and deleted certificate");
                RemovalOutcome::Removed
            }
            Err(e) => {
                error!(
                    certificate_id,
                    remote = e.is_remote(),
                    status = ?e.status_code(),
                    "failed to remove certificate: {e}"
                );
                RemovalOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Walk every page of the registry listing
async fn all_certificate_ids(registry: &dyn CertificateRegistry) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let page = registry.list_certificates(marker.as_deref()).await?;
        ids.extend(page.ids().map(String::from));

        match page.next_marker {
            Some(next) if !next.is_empty() => marker = Some(next),
            _ => break,
        }
    }

    Ok(ids)
}
