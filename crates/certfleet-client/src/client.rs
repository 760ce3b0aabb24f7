//! Main AWS client implementation.

use crate::api::*;
use crate::config::{region_from_env, Credentials, Endpoints, ThrottleConfig, DEFAULT_REGION};
use crate::signing::Signer;
use certfleet_core::{FleetError, Result};
use chrono::Utc;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Services the client signs requests for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    /// Registry and audit control plane
    Iot,
    /// Device messaging data plane
    IotData,
    /// Object storage
    S3,
}

impl Service {
    /// SigV4 signing name
    const fn signing_name(self) -> &'static str {
        match self {
            Self::Iot => "iot",
            Self::IotData => "iotdata",
            Self::S3 => "s3",
        }
    }
}

/// One request to one service, before signing
pub(crate) struct ServiceRequest {
    service: Service,
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    headers: Vec<(&'static str, String)>,
    content_type: Option<&'static str>,
    body: Vec<u8>,
}

impl ServiceRequest {
    /// A request with no query, headers or body. `path` must already be percent-encoded.
    pub(crate) fn new(service: Service, method: Method, path: impl Into<String>) -> Self {
        Self {
            service,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Add a query parameter
    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Add a header
    pub(crate) fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set a JSON body
    pub(crate) fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = serde_json::to_vec(body)?;
        self.content_type = Some("application/json");
        Ok(self)
    }

    /// Set a raw body
    pub(crate) fn bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// Client for the IoT registry, audit, data plane and S3 APIs
#[derive(Clone)]
pub struct IotClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    signer: Signer,
    endpoints: Endpoints,
    limiter: DefaultDirectRateLimiter,
}

impl IotClient {
    /// Create a client for a region using default settings
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Result<Self> {
        IotClientBuilder::new(credentials).region(region).build()
    }

    /// Create a client from the standard AWS environment variables
    pub fn from_env() -> Result<Self> {
        IotClientBuilder::new(Credentials::from_env()?).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(credentials: Credentials) -> IotClientBuilder {
        IotClientBuilder::new(credentials)
    }

    /// Region requests are signed for
    #[must_use]
    pub fn region(&self) -> &str {
        self.inner.signer.region()
    }

    /// Endpoints in use
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Access certificate registry endpoints
    #[must_use]
    pub fn certificates(&self) -> CertificateApi<'_> {
        CertificateApi::new(self)
    }

    /// Access audit endpoints
    #[must_use]
    pub fn audit(&self) -> AuditApi<'_> {
        AuditApi::new(self)
    }

    /// Access data-plane topic endpoints
    #[must_use]
    pub fn topics(&self) -> TopicApi<'_> {
        TopicApi::new(self)
    }

    /// Access object storage endpoints
    #[must_use]
    pub fn objects(&self) -> ObjectApi<'_> {
        ObjectApi::new(self)
    }

    /// Send a request and decode a JSON response
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: ServiceRequest) -> Result<T> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| FleetError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(FleetError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Send a request whose response body is ignored
    pub(crate) async fn send_empty(&self, request: ServiceRequest) -> Result<()> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Send a request and return the raw response body
    pub(crate) async fn send_bytes(&self, request: ServiceRequest) -> Result<Vec<u8>> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| FleetError::Http(e.to_string()))?;
            Ok(body.to_vec())
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Throttle, sign and send
    async fn send(&self, request: ServiceRequest) -> Result<reqwest::Response> {
        let url = self.build_url(&request)?;

        let mut headers = HeaderMap::new();
        if let Some(content_type) = request.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        for (name, value) in &request.headers {
            let value = HeaderValue::from_str(value)
                .map_err(|e| FleetError::Config(format!("invalid {name} header: {e}")))?;
            headers.insert(HeaderName::from_static(name), value);
        }

        self.inner.limiter.until_ready().await;

        self.inner.signer.sign(
            request.service.signing_name(),
            &request.method,
            &url,
            &mut headers,
            &request.body,
            Utc::now(),
        )?;

        debug!(
            service = request.service.signing_name(),
            method = %request.method,
            url = %url,
            "sending request"
        );

        self.inner
            .http
            .request(request.method, url)
            .headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| FleetError::Http(e.to_string()))
    }

    fn build_url(&self, request: &ServiceRequest) -> Result<Url> {
        let base = match request.service {
            Service::Iot => &self.inner.endpoints.iot,
            Service::IotData => &self.inner.endpoints.iot_data,
            Service::S3 => &self.inner.endpoints.s3,
        };

        let mut url = Url::parse(&format!("{base}{}", request.path))
            .map_err(|e| FleetError::Config(format!("invalid endpoint URL {base}: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Convert an error response to a [`FleetError`]
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(':').next().unwrap_or(v).to_string())
            .unwrap_or_default();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, &error_type);

        match status {
            401 | 403 => Err(FleetError::Unauthorized(message)),
            404 => Err(FleetError::NotFound { resource: message }),
            429 => {
                warn!("throttled by AWS: {message}");
                Err(FleetError::Throttled(message))
            }
            _ if error_type == "ThrottlingException" => {
                warn!("throttled by AWS: {message}");
                Err(FleetError::Throttled(message))
            }
            _ => Err(FleetError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Pull a human-readable message out of a JSON or XML error body
fn error_message(body: &str, error_type: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .or_else(|| xml_element(body, "Message"))
        .unwrap_or_else(|| body.trim().to_string());

    if error_type.is_empty() {
        message
    } else {
        format!("{error_type}: {message}")
    }
}

fn xml_element(body: &str, name: &str) -> Option<String> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(body[start..end].to_string())
}

/// Builder for configuring an [`IotClient`]
pub struct IotClientBuilder {
    credentials: Credentials,
    region: Option<String>,
    endpoints: Option<Endpoints>,
    timeout: Duration,
    user_agent: String,
    throttle: ThrottleConfig,
}

impl IotClientBuilder {
    /// Create a new builder with the given credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            region: None,
            endpoints: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("certfleet/{}", env!("CARGO_PKG_VERSION")),
            throttle: ThrottleConfig::default(),
        }
    }

    /// Set the region (defaults to the environment, then `us-east-1`)
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the service endpoints (useful for testing)
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the client-side rate limit
    #[must_use]
    pub const fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<IotClient> {
        let region = self
            .region
            .or_else(region_from_env)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoints = self
            .endpoints
            .unwrap_or_else(|| Endpoints::for_region(&region));

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| FleetError::Config(format!("failed to build HTTP client: {e}")))?;

        let limiter = RateLimiter::direct(Quota::per_second(self.throttle.requests_per_second));

        Ok(IotClient {
            inner: Arc::new(ClientInner {
                http,
                signer: Signer::new(self.credentials, region),
                endpoints,
                limiter,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_json() {
        let body = r#"{"message": "The certificate is in use"}"#;
        assert_eq!(
            error_message(body, "CertificateStateException"),
            "CertificateStateException: The certificate is in use"
        );
    }

    #[test]
    fn test_error_message_xml() {
        let body = "<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message></Error>";
        assert_eq!(error_message(body, ""), "The specified key does not exist.");
    }

    #[test]
    fn test_error_message_plain() {
        assert_eq!(error_message("  upstream timeout \n", ""), "upstream timeout");
    }

    #[test]
    fn test_build_url_with_query() {
        let client = IotClient::builder(Credentials::new("a", "b"))
            .region("eu-central-1")
            .build()
            .unwrap();
        let request = ServiceRequest::new(Service::Iot, Method::GET, "/certificates")
            .query("pageSize", "250")
            .query("marker", "abc+/=");

        let url = client.build_url(&request).unwrap();
        assert_eq!(url.host_str(), Some("iot.eu-central-1.amazonaws.com"));
        assert_eq!(url.path(), "/certificates");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("pageSize".to_string(), "250".to_string()),
                ("marker".to_string(), "abc+/=".to_string()),
            ]
        );
        assert_eq!(client.region(), "eu-central-1");
    }
}
