//! Object storage endpoints.

use crate::client::{Service, ServiceRequest};
use crate::signing::uri_encode;
use crate::IotClient;
use certfleet_core::Result;
use reqwest::Method;
use std::path::Path;
use tracing::debug;

/// Object storage endpoints
pub struct ObjectApi<'a> {
    client: &'a IotClient,
}

impl<'a> ObjectApi<'a> {
    pub(crate) const fn new(client: &'a IotClient) -> Self {
        Self { client }
    }

    /// Fetch an object's bytes
    pub async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = format!("/{}/{}", uri_encode(bucket, true), uri_encode(key, false));
        let request = ServiceRequest::new(Service::S3, Method::GET, path);

        self.client.send_bytes(request).await
    }

    /// Fetch an object and write it to `destination`
    pub async fn download(&self, bucket: &str, key: &str, destination: &Path) -> Result<()> {
        let bytes = self.get(bucket, key).await?;
        debug!(bucket, key, size = bytes.len(), path = %destination.display(), "writing object");
        tokio::fs::write(destination, bytes).await?;
        Ok(())
    }
}
