//! AWS Signature Version 4 request signing via `ring::hmac`.

use certfleet_core::{FleetError, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, HOST};
use reqwest::Method;
use ring::{digest, hmac};
use std::collections::BTreeMap;
use url::Url;

use crate::config::Credentials;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

const X_AMZ_DATE: HeaderName = HeaderName::from_static("x-amz-date");
const X_AMZ_CONTENT_SHA256: HeaderName = HeaderName::from_static("x-amz-content-sha256");
const X_AMZ_SECURITY_TOKEN: HeaderName = HeaderName::from_static("x-amz-security-token");

/// Percent-encode a string the way SigV4 expects.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through. `/` passes
/// through unless `encode_slash` is set. Everything else becomes `%XX`.
#[must_use]
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            b'/' if !encode_slash => encoded.push('/'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Signs requests for one region with one set of credentials
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
}

impl Signer {
    /// Create a signer
    #[must_use]
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    /// Region requests are scoped to
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Add the date, host, token and authorization headers to a request.
    ///
    /// Every header already in `headers` is signed.
    pub fn sign(
        &self,
        service: &str,
        method: &Method,
        url: &Url,
        headers: &mut HeaderMap,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(digest::digest(&digest::SHA256, body));

        headers.insert(HOST, header_value(&host_header(url)?)?);
        headers.insert(X_AMZ_DATE, header_value(&amz_date)?);
        if service == "s3" {
            headers.insert(X_AMZ_CONTENT_SHA256, header_value(&payload_hash)?);
        }
        if let Some(token) = &self.credentials.session_token {
            headers.insert(X_AMZ_SECURITY_TOKEN, header_value(token)?);
        }

        let (canonical_request, signed_headers) =
            canonical_request(service, method, url, headers, &payload_hash)?;

        let scope = format!("{date}/{}/{service}/aws4_request", self.region);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(digest::digest(&digest::SHA256, canonical_request.as_bytes()))
        );

        let key = hmac::Key::new(hmac::HMAC_SHA256, &self.signing_key(&date, service));
        let signature = hex::encode(hmac::sign(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );
        headers.insert(AUTHORIZATION, header_value(&authorization)?);

        Ok(())
    }

    /// Derive the per-day, per-service signing key
    fn signing_key(&self, date: &str, service: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| FleetError::Config(format!("invalid header value: {e}")))
}

fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| FleetError::Config(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Build the canonical request and the signed-headers list
fn canonical_request(
    service: &str,
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    payload_hash: &str,
) -> Result<(String, String)> {
    // S3 signs the path as sent; every other service signs it encoded once more.
    let path = if url.path().is_empty() { "/" } else { url.path() };
    let canonical_uri = if service == "s3" {
        path.to_string()
    } else {
        uri_encode(path, false)
    };

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k, true), uri_encode(&v, true)))
        .collect();
    query.sort();
    let canonical_query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut canonical: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        if *name == AUTHORIZATION {
            continue;
        }
        let value = value
            .to_str()
            .map_err(|e| FleetError::Config(format!("unsignable header {name}: {e}")))?;
        canonical
            .entry(name.as_str())
            .or_default()
            .push(value.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    let canonical_headers: String = canonical
        .iter()
        .map(|(name, values)| format!("{name}:{}\n", values.join(",")))
        .collect();
    let signed_headers = canonical.keys().copied().collect::<Vec<_>>().join(";");

    let request = format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    );

    Ok((request, signed_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::CONTENT_TYPE;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    // Worked example from the SigV4 documentation (IAM ListUsers).
    fn example_signer() -> Signer {
        Signer::new(
            Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
            "us-east-1",
        )
    }

    fn example_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
        );
        headers
    }

    fn example_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("thing/A b", true), "thing%2FA%20b");
        assert_eq!(uri_encode("reports/2024/x.json", false), "reports/2024/x.json");
        assert_eq!(uri_encode("a+b=c~d", true), "a%2Bb%3Dc~d");
    }

    #[test]
    fn test_signing_key() {
        let key = example_signer().signing_key("20150830", "iam");
        assert_eq!(
            hex::encode(key),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_canonical_request() {
        let url = Url::parse("https://iam.amazonaws.com/?Version=2010-05-08&Action=ListUsers").unwrap();
        let mut headers = example_headers();
        headers.insert(HOST, HeaderValue::from_static("iam.amazonaws.com"));
        headers.insert(X_AMZ_DATE, HeaderValue::from_static("20150830T123600Z"));

        let (request, signed) =
            canonical_request("iam", &Method::GET, &url, &headers, EMPTY_SHA256).unwrap();

        assert_eq!(signed, "content-type;host;x-amz-date");
        assert_eq!(
            request,
            "GET\n/\nAction=ListUsers&Version=2010-05-08\n\
             content-type:application/x-www-form-urlencoded; charset=utf-8\n\
             host:iam.amazonaws.com\n\
             x-amz-date:20150830T123600Z\n\n\
             content-type;host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sign_documented_example() {
        let url = Url::parse("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08").unwrap();
        let mut headers = example_headers();

        example_signer()
            .sign("iam", &Method::GET, &url, &mut headers, b"", example_time())
            .unwrap();

        assert_eq!(
            headers[AUTHORIZATION].to_str().unwrap(),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
        );
        assert_eq!(headers[X_AMZ_DATE], "20150830T123600Z");
        assert!(headers.get(X_AMZ_CONTENT_SHA256).is_none());
    }

    #[test]
    fn test_non_s3_paths_are_double_encoded() {
        let url = Url::parse("https://data.example.com/topics/thing%2FA%2Frotate?qos=1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("data.example.com"));

        let (request, _) =
            canonical_request("iotdata", &Method::POST, &url, &headers, EMPTY_SHA256).unwrap();
        assert!(request.starts_with("POST\n/topics/thing%252FA%252Frotate\nqos=1\n"));

        let (request, _) =
            canonical_request("s3", &Method::POST, &url, &headers, EMPTY_SHA256).unwrap();
        assert!(request.starts_with("POST\n/topics/thing%2FA%2Frotate\n"));
    }

    #[test]
    fn test_s3_and_session_token_headers() {
        let signer = Signer::new(Credentials::new("AKID", "secret").with_session_token("tok"), "eu-west-1");
        let url = Url::parse("http://127.0.0.1:9000/bucket/key.json").unwrap();
        let mut headers = HeaderMap::new();

        signer
            .sign("s3", &Method::GET, &url, &mut headers, b"", example_time())
            .unwrap();

        assert_eq!(headers[HOST], "127.0.0.1:9000");
        assert_eq!(headers[X_AMZ_CONTENT_SHA256], EMPTY_SHA256);
        assert_eq!(headers[X_AMZ_SECURITY_TOKEN], "tok");
        let auth = headers[AUTHORIZATION].to_str().unwrap();
        assert!(auth.contains("Credential=AKID/20150830/eu-west-1/s3/aws4_request"));
        assert!(auth.contains(
            "SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token"
        ));
    }
}
