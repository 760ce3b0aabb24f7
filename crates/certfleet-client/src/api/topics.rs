//! Data-plane publish endpoint.

use crate::client::{Service, ServiceRequest};
use crate::signing::uri_encode;
use crate::IotClient;
use certfleet_core::{Qos, Result};
use reqwest::Method;

/// Data-plane topic endpoints
pub struct TopicApi<'a> {
    client: &'a IotClient,
}

impl<'a> TopicApi<'a> {
    pub(crate) const fn new(client: &'a IotClient) -> Self {
        Self { client }
    }

    /// Publish raw bytes to a topic
    pub async fn publish(&self, topic: &str, qos: Qos, payload: &[u8]) -> Result<()> {
        let path = format!("/topics/{}", uri_encode(topic, true));
        let request = ServiceRequest::new(Service::IotData, Method::POST, path)
            .query("qos", qos.level().to_string())
            .bytes(payload.to_vec());

        self.client.send_empty(request).await
    }
}
