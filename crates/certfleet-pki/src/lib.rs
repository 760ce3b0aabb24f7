//! # certfleet-pki
//!
//! Self-signed X.509 certificates for seeding test device fleets.
//!
//! Every certificate carries the common name `Test Certificate` as both
//! subject and issuer, an RSA 2048 key and a SHA-256 with RSA signature. The
//! private key never leaves [`SelfSignedIssuer::issue`].
//!
//! ```rust,ignore
//! use certfleet_pki::{CertificateIssuer, SelfSignedIssuer};
//! use certfleet_core::ValidityDays;
//!
//! let issued = SelfSignedIssuer::new().issue(ValidityDays::new(30)?)?;
//! println!("{}", issued.pem);
//! ```

mod error;
mod issuer;

pub use error::{PkiError, Result};
pub use issuer::{CertificateIssuer, IssuedCertificate, SelfSignedIssuer, SUBJECT_COMMON_NAME};
