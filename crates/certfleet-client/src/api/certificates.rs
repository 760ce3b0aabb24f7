//! Certificate registry endpoints.

use crate::client::{Service, ServiceRequest};
use crate::signing::uri_encode;
use crate::IotClient;
use certfleet_core::{
    CertificateDescription, CertificatePage, CertificateStatus, DescribeCertificateResponse,
    PrincipalThings, RegisterCertificateRequest, RegisteredCertificate, Result,
};
use reqwest::Method;

/// Largest page the registry returns for a certificate listing
pub const MAX_PAGE_SIZE: u32 = 250;

/// Certificate registry endpoints
pub struct CertificateApi<'a> {
    client: &'a IotClient,
}

impl<'a> CertificateApi<'a> {
    pub(crate) const fn new(client: &'a IotClient) -> Self {
        Self { client }
    }

    /// Register a PEM certificate that was not issued by a registered CA
    pub async fn register(
        &self,
        certificate_pem: &str,
        status: CertificateStatus,
    ) -> Result<RegisteredCertificate> {
        let body = RegisterCertificateRequest {
            certificate_pem: certificate_pem.to_string(),
            status,
        };
        let request = ServiceRequest::new(Service::Iot, Method::POST, "/certificate/register-no-ca")
            .json(&body)?;

        self.client.send_json(request).await
    }

    /// Get the registry record of a certificate
    pub async fn describe(&self, certificate_id: &str) -> Result<CertificateDescription> {
        let request = ServiceRequest::new(Service::Iot, Method::GET, certificate_path(certificate_id));
        let response: DescribeCertificateResponse = self.client.send_json(request).await?;
        Ok(response.certificate_description)
    }

    /// Change the status of a certificate
    pub async fn update_status(&self, certificate_id: &str, status: CertificateStatus) -> Result<()> {
        let request = ServiceRequest::new(Service::Iot, Method::PUT, certificate_path(certificate_id))
            .query("newStatus", status.as_str());

        self.client.send_empty(request).await
    }

    /// Delete a certificate
    pub async fn delete(&self, certificate_id: &str) -> Result<()> {
        let request =
            ServiceRequest::new(Service::Iot, Method::DELETE, certificate_path(certificate_id));

        self.client.send_empty(request).await
    }

    /// List one page of certificates, starting at `marker`
    pub async fn list(&self, marker: Option<&str>) -> Result<CertificatePage> {
        let mut request = ServiceRequest::new(Service::Iot, Method::GET, "/certificates")
            .query("pageSize", MAX_PAGE_SIZE.to_string());
        if let Some(marker) = marker {
            request = request.query("marker", marker);
        }

        self.client.send_json(request).await
    }

    /// List things attached to a principal (a certificate ARN)
    pub async fn principal_things(&self, principal: &str, max_results: u32) -> Result<PrincipalThings> {
        let request = ServiceRequest::new(Service::Iot, Method::GET, "/principals/things")
            .query("maxResults", max_results.to_string())
            .header("x-amzn-principal", principal);

        self.client.send_json(request).await
    }
}

fn certificate_path(certificate_id: &str) -> String {
    format!("/certificates/{}", uri_encode(certificate_id, true))
}
