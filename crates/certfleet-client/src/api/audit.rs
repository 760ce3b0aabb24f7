//! Device audit endpoints.

use crate::client::{Service, ServiceRequest};
use crate::IotClient;
use certfleet_core::{FindingSet, ListFindingsRequest, Result};
use reqwest::Method;

/// Device audit endpoints
pub struct AuditApi<'a> {
    client: &'a IotClient,
}

impl<'a> AuditApi<'a> {
    pub(crate) const fn new(client: &'a IotClient) -> Self {
        Self { client }
    }

    /// Findings of one check within one audit task (first page)
    pub async fn findings(&self, task_id: &str, check_name: &str) -> Result<FindingSet> {
        let body = ListFindingsRequest {
            task_id: task_id.to_string(),
            check_name: check_name.to_string(),
        };
        let request = ServiceRequest::new(Service::Iot, Method::POST, "/audit/findings").json(&body)?;

        self.client.send_json(request).await
    }
}
