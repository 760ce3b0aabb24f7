use certfleet_core::FleetError;
use thiserror::Error;

/// Result type alias for certificate issuance
pub type Result<T> = std::result::Result<T, PkiError>;

/// Errors raised while generating a certificate
#[derive(Error, Debug)]
pub enum PkiError {
    /// RSA key generation failed
    #[error("key generation failed: {0}")]
    KeyGeneration(#[from] rsa::Error),

    /// The private key could not be encoded for signing
    #[error("key encoding failed: {0}")]
    KeyEncoding(#[from] rsa::pkcs8::Error),

    /// Certificate assembly or signing failed
    #[error("certificate generation failed: {0}")]
    Certificate(#[from] rcgen::Error),
}

impl From<PkiError> for FleetError {
    fn from(err: PkiError) -> Self {
        Self::Crypto(err.to_string())
    }
}
