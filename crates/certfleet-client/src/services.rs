//! Service-trait implementations backed by [`IotClient`].

use async_trait::async_trait;
use certfleet_core::{
    AuditService, CertificatePage, CertificateRegistry, CertificateStatus, FindingSet,
    MessagePublisher, ObjectStore, Qos, Result,
};
use std::path::Path;

use crate::IotClient;

#[async_trait]
impl CertificateRegistry for IotClient {
    async fn register_certificate(
        &self,
        certificate_pem: &str,
        status: CertificateStatus,
    ) -> Result<String> {
        let registered = self.certificates().register(certificate_pem, status).await?;
        Ok(registered.certificate_id)
    }

    async fn certificate_arn(&self, certificate_id: &str) -> Result<String> {
        let description = self.certificates().describe(certificate_id).await?;
        Ok(description.certificate_arn)
    }

    async fn principal_things(&self, principal: &str, max_results: u32) -> Result<Vec<String>> {
        let page = self
            .certificates()
            .principal_things(principal, max_results)
            .await?;
        Ok(page.things)
    }

    async fn update_certificate_status(
        &self,
        certificate_id: &str,
        status: CertificateStatus,
    ) -> Result<()> {
        self.certificates().update_status(certificate_id, status).await
    }

    async fn delete_certificate(&self, certificate_id: &str) -> Result<()> {
        self.certificates().delete(certificate_id).await
    }

    async fn list_certificates(&self, marker: Option<&str>) -> Result<CertificatePage> {
        self.certificates().list(marker).await
    }
}

#[async_trait]
impl AuditService for IotClient {
    async fn list_audit_findings(&self, task_id: &str, check_name: &str) -> Result<FindingSet> {
        self.audit().findings(task_id, check_name).await
    }
}

#[async_trait]
impl ObjectStore for IotClient {
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> Result<()> {
        self.objects().download(bucket, key, destination).await
    }
}

#[async_trait]
impl MessagePublisher for IotClient {
    async fn publish(&self, topic: &str, qos: Qos, payload: &[u8]) -> Result<()> {
        self.topics().publish(topic, qos, payload).await
    }
}
