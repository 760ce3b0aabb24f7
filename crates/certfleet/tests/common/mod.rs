//! In-memory stand-ins for the external services.

#![allow(dead_code)]

use async_trait::async_trait;
use certfleet::{
    AuditService, CertificateIssuer, CertificatePage, CertificateRegistry, CertificateStatus,
    CertificateSummary, FindingSet, FleetError, IssuedCertificate, MessagePublisher, ObjectStore,
    Qos, Result, ValidityDays,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Registry keeping certificates in memory and logging every call
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    next_id: usize,
    certificates: BTreeMap<String, CertificateStatus>,
    things: HashMap<String, Vec<String>>,
    fail_delete: HashSet<String>,
    fail_update: HashSet<String>,
    fail_register_at: Option<usize>,
    page_size: Option<usize>,
    calls: Vec<String>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a certificate
    pub fn insert(&self, id: &str, status: CertificateStatus) {
        self.state.lock().unwrap().certificates.insert(id.to_string(), status);
    }

    /// Attach things to a certificate id
    pub fn attach(&self, certificate_id: &str, things: &[&str]) {
        self.state.lock().unwrap().things.insert(
            certificate_id.to_string(),
            things.iter().map(ToString::to_string).collect(),
        );
    }

    /// Make deletes of this id fail
    pub fn fail_delete_of(&self, id: &str) {
        self.state.lock().unwrap().fail_delete.insert(id.to_string());
    }

    /// Make status updates of this id fail
    pub fn fail_update_of(&self, id: &str) {
        self.state.lock().unwrap().fail_update.insert(id.to_string());
    }

    /// Make the n-th registration (0-indexed) fail
    pub fn fail_register_at(&self, index: usize) {
        self.state.lock().unwrap().fail_register_at = Some(index);
    }

    /// Split listings into pages of this size
    pub fn paginate(&self, page_size: usize) {
        self.state.lock().unwrap().page_size = Some(page_size);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state.lock().unwrap().certificates.keys().cloned().collect()
    }

    pub fn status_of(&self, id: &str) -> Option<CertificateStatus> {
        self.state.lock().unwrap().certificates.get(id).copied()
    }
}

fn arn(id: &str) -> String {
    format!("arn:aws:iot:us-east-1:123456789012:cert/{id}")
}

#[async_trait]
impl CertificateRegistry for InMemoryRegistry {
    async fn register_certificate(&self, _pem: &str, status: CertificateStatus) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        let index = state.next_id;
        state.next_id += 1;
        state.calls.push(format!("register:{status}"));

        if state.fail_register_at == Some(index) {
            return Err(FleetError::Api {
                code: 400,
                message: "ResourceAlreadyExistsException".to_string(),
            });
        }

        let id = format!("cert-{index:04}");
        state.certificates.insert(id.clone(), status);
        Ok(id)
    }

    async fn certificate_arn(&self, certificate_id: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("describe:{certificate_id}"));
        Ok(arn(certificate_id))
    }

    async fn principal_things(&self, principal: &str, max_results: u32) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("things:{principal}:{max_results}"));
        let id = principal.rsplit('/').next().unwrap_or(principal);
        Ok(state.things.get(id).cloned().unwrap_or_default())
    }

    async fn update_certificate_status(
        &self,
        certificate_id: &str,
        status: CertificateStatus,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update:{certificate_id}:{status}"));
        if state.fail_update.contains(certificate_id) {
            return Err(FleetError::Throttled("Rate exceeded".to_string()));
        }
        match state.certificates.get_mut(certificate_id) {
            Some(current) => {
                *current = status;
                Ok(())
            }
            None => Err(FleetError::NotFound {
                resource: certificate_id.to_string(),
            }),
        }
    }

    async fn delete_certificate(&self, certificate_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete:{certificate_id}"));
        if state.fail_delete.contains(certificate_id) {
            return Err(FleetError::Api {
                code: 409,
                message: "DeleteConflictException: certificate is attached".to_string(),
            });
        }
        state.certificates.remove(certificate_id);
        Ok(())
    }

    async fn list_certificates(&self, marker: Option<&str>) -> Result<CertificatePage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list:{}", marker.unwrap_or("-")));

        let ids: Vec<String> = state.certificates.keys().cloned().collect();
        let start = marker.and_then(|m| m.parse::<usize>().ok()).unwrap_or(0);
        let size = state.page_size.unwrap_or(usize::MAX);
        let end = start.saturating_add(size).min(ids.len());

        let certificates = ids[start..end]
            .iter()
            .map(|id| CertificateSummary {
                certificate_id: id.clone(),
                certificate_arn: Some(arn(id)),
                status: state.certificates.get(id).copied(),
                creation_date: None,
            })
            .collect();

        Ok(CertificatePage {
            certificates,
            next_marker: (end < ids.len()).then(|| end.to_string()),
        })
    }
}

/// Audit service returning a fixed finding set
pub struct FixedAudit {
    findings: serde_json::Value,
    calls: Mutex<Vec<(String, String)>>,
}

impl FixedAudit {
    pub fn new(findings: serde_json::Value) -> Self {
        Self {
            findings,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(serde_json::json!({"findings": []}))
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditService for FixedAudit {
    async fn list_audit_findings(&self, task_id: &str, check_name: &str) -> Result<FindingSet> {
        self.calls
            .lock()
            .unwrap()
            .push((task_id.to_string(), check_name.to_string()));
        Ok(serde_json::from_value(self.findings.clone())?)
    }
}

/// Object store serving objects from memory
#[derive(Default)]
pub struct MemoryObjects {
    objects: HashMap<(String, String), String>,
    downloads: Mutex<Vec<String>>,
}

impl MemoryObjects {
    pub fn with_object(mut self, bucket: &str, key: &str, body: &str) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), body.to_string());
        self
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> Result<()> {
        self.downloads.lock().unwrap().push(format!("{bucket}/{key}"));
        let body = self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| FleetError::NotFound {
                resource: format!("{bucket}/{key}"),
            })?;
        std::fs::write(destination, body)?;
        Ok(())
    }
}

/// Publisher recording every message
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(String, Qos, String)>>,
}

impl RecordingPublisher {
    pub fn messages(&self) -> Vec<(String, Qos, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagePublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, qos: Qos, payload: &[u8]) -> Result<()> {
        self.messages.lock().unwrap().push((
            topic.to_string(),
            qos,
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }
}

/// Issuer producing placeholder PEM text without generating keys
#[derive(Default)]
pub struct FakeIssuer {
    issued: AtomicUsize,
    validities: Mutex<Vec<u32>>,
}

impl FakeIssuer {
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn validities(&self) -> Vec<u32> {
        self.validities.lock().unwrap().clone()
    }
}

impl CertificateIssuer for FakeIssuer {
    fn issue(&self, validity: ValidityDays) -> certfleet_pki::Result<IssuedCertificate> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        self.validities.lock().unwrap().push(validity.days());

        let now = time::OffsetDateTime::UNIX_EPOCH;
        Ok(IssuedCertificate {
            pem: format!("-----BEGIN CERTIFICATE-----\nFAKE{n}\n-----END CERTIFICATE-----\n"),
            serial_hex: format!("{n:040x}"),
            not_before: now,
            not_after: now + time::Duration::days(i64::from(validity.days())),
        })
    }
}
