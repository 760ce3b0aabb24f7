//! Self-signed device certificates.

use certfleet_core::ValidityDays;
use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, SerialNumber, PKCS_RSA_SHA256};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::Result;

/// Common name used as both subject and issuer
pub const SUBJECT_COMMON_NAME: &str = "Test Certificate";

/// RSA modulus size
const KEY_BITS: usize = 2048;

/// Serial number length in bytes
const SERIAL_LEN: usize = 20;

/// A freshly issued certificate. The private key is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    /// PEM-encoded certificate
    pub pem: String,
    /// Serial number (hex)
    pub serial_hex: String,
    /// Not valid before
    pub not_before: OffsetDateTime,
    /// Not valid after
    pub not_after: OffsetDateTime,
}

/// Something that can produce a certificate for a validity window.
///
/// The lifecycle workflows take this as a trait object so tests can skip RSA
/// key generation.
pub trait CertificateIssuer: Send + Sync {
    /// Issue one certificate valid from now for `validity` days
    fn issue(&self, validity: ValidityDays) -> Result<IssuedCertificate>;
}

/// Issues RSA 2048 certificates signed by their own key
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfSignedIssuer;

impl SelfSignedIssuer {
    /// Create an issuer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CertificateIssuer for SelfSignedIssuer {
    fn issue(&self, validity: ValidityDays) -> Result<IssuedCertificate> {
        let private_key = RsaPrivateKey::new(&mut OsRng, KEY_BITS)?;
        let key_pem = private_key.to_pkcs8_pem(LineEnding::LF)?;
        let key_pair = KeyPair::from_pem_and_sign_algo(&key_pem, &PKCS_RSA_SHA256)?;

        let mut params = CertificateParams::default();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, SUBJECT_COMMON_NAME);
        params.distinguished_name = dn;

        let not_before = OffsetDateTime::now_utc();
        let not_after = not_before + Duration::days(i64::from(validity.days()));
        params.not_before = not_before;
        params.not_after = not_after;

        let serial = random_serial();
        params.serial_number = Some(SerialNumber::from(serial.clone()));

        let certificate = params.self_signed(&key_pair)?;
        let serial_hex = hex::encode(&serial);

        debug!(serial = %serial_hex, days = validity.days(), "issued self-signed certificate");

        Ok(IssuedCertificate {
            pem: certificate.pem(),
            serial_hex,
            not_before,
            not_after,
        })
    }
}

/// 20 random bytes with the top bit cleared, so the DER integer is positive
fn random_serial() -> Vec<u8> {
    let mut serial = vec![0u8; SERIAL_LEN];
    OsRng.fill_bytes(&mut serial);
    serial[0] &= 0x7f;
    serial
}
