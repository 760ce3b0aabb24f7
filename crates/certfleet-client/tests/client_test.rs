use certfleet_client::{Credentials, Endpoints, IotClient, ThrottleConfig};
use certfleet_core::{
    AuditService, CertificateRegistry, CertificateStatus, FleetError, MessagePublisher,
    ObjectStore, Qos,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> IotClient {
    IotClient::builder(Credentials::new("AKIDTEST", "secret"))
        .region("us-east-1")
        .endpoints(Endpoints::uniform(server.uri()))
        .throttle(ThrottleConfig::new().requests_per_second(1000))
        .build()
        .unwrap()
}

#[tokio::test]
async fn register_certificate_is_signed_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/certificate/register-no-ca"))
        .and(body_partial_json(json!({"status": "INACTIVE"})))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certificateId": "abc123",
            "certificateArn": "arn:aws:iot:us-east-1:123456789012:cert/abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client
        .register_certificate("-----BEGIN CERTIFICATE-----", CertificateStatus::Inactive)
        .await
        .unwrap();

    assert_eq!(id, "abc123");
}

#[tokio::test]
async fn describe_resolves_arn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates/cert-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certificateDescription": {
                "certificateId": "cert-123",
                "certificateArn": "arn:aws:iot:us-east-1:123456789012:cert/cert-123",
                "status": "ACTIVE"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let arn = client.certificate_arn("cert-123").await.unwrap();

    assert_eq!(arn, "arn:aws:iot:us-east-1:123456789012:cert/cert-123");
}

#[tokio::test]
async fn revoke_then_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/certificates/cert-1"))
        .and(query_param("newStatus", "REVOKED"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/certificates/cert-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .update_certificate_status("cert-1", CertificateStatus::Revoked)
        .await
        .unwrap();
    client.delete_certificate("cert-1").await.unwrap();
}

#[tokio::test]
async fn list_certificates_passes_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates"))
        .and(query_param("pageSize", "250"))
        .and(query_param("marker", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certificates": [{"certificateId": "c3", "status": "ACTIVE"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.list_certificates(Some("page-2")).await.unwrap();

    assert_eq!(page.ids().collect::<Vec<_>>(), vec!["c3"]);
    assert!(page.next_marker.is_none());
}

#[tokio::test]
async fn principal_things_sends_principal_header() {
    let server = MockServer::start().await;
    let arn = "arn:aws:iot:us-east-1:123456789012:cert/cert-123";
    Mock::given(method("GET"))
        .and(path("/principals/things"))
        .and(query_param("maxResults", "100"))
        .and(header("x-amzn-principal", arn))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "things": ["thing-A", "thing-B"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let things = client.principal_things(arn, 100).await.unwrap();

    assert_eq!(things, vec!["thing-A", "thing-B"]);
}

#[tokio::test]
async fn audit_findings_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audit/findings"))
        .and(body_json(json!({
            "taskId": "task-1",
            "checkName": "DEVICE_CERTIFICATE_EXPIRING_CHECK"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "findings": [{
                "nonCompliantResource": {
                    "resourceIdentifier": {"deviceCertificateId": "cert-9"}
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let set = client
        .list_audit_findings("task-1", "DEVICE_CERTIFICATE_EXPIRING_CHECK")
        .await
        .unwrap();

    assert_eq!(set.findings[0].device_certificate_id().unwrap(), "cert-9");
}

#[tokio::test]
async fn publish_encodes_topic_into_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/thing%2Fthing-A%2Fcert%2Fcert-123%2Frotate"))
        .and(query_param("qos", "1"))
        .and(body_json(json!({"task": "Rotate Certificate!"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .publish(
            "thing/thing-A/cert/cert-123/rotate",
            Qos::AtLeastOnce,
            br#"{"task":"Rotate Certificate!"}"#,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn download_writes_object_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/audit-results/reports/task-1.json"))
        .and(header_exists("x-amz-content-sha256"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"findings": []}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("task-1.json");

    let client = client_for(&server);
    client
        .download("audit-results", "reports/task-1.json", &destination)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&destination).unwrap(),
        r#"{"findings": []}"#
    );
}

#[tokio::test]
async fn error_responses_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/certificates/in-use"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("x-amzn-ErrorType", "CertificateStateException:http://internal.amazon.com/")
                .set_body_json(json!({"message": "Certificate must be deactivated"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/certificates/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/certificates/busy"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"message": "Rate exceeded"})))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.delete_certificate("in-use").await.unwrap_err();
    match err {
        FleetError::Api { code, message } => {
            assert_eq!(code, 409);
            assert_eq!(
                message,
                "CertificateStateException: Certificate must be deactivated"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.delete_certificate("missing").await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));

    let err = client.delete_certificate("busy").await.unwrap_err();
    assert!(matches!(err, FleetError::Throttled(_)));
    assert!(err.is_remote());
}
