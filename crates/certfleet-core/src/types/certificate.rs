use serde::{Deserialize, Serialize};

use crate::{FleetError, Result};

/// Lifecycle status of a certificate in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Usable for authentication
    Active,
    /// Registered but not usable
    Inactive,
    /// Permanently disabled, the only status from which a delete is accepted
    Revoked,
    /// Being transferred to another account
    PendingTransfer,
    /// Registered inactive through a CA registration
    RegisterInactive,
    /// Waiting for activation by a CA registration
    PendingActivation,
}

impl CertificateStatus {
    /// Wire name of the status
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Revoked => "REVOKED",
            Self::PendingTransfer => "PENDING_TRANSFER",
            Self::RegisterInactive => "REGISTER_INACTIVE",
            Self::PendingActivation => "PENDING_ACTIVATION",
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of days a generated certificate stays valid.
///
/// Always within [`ValidityDays::MIN`]..=[`ValidityDays::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ValidityDays(u32);

impl ValidityDays {
    /// One day
    pub const MIN: u32 = 1;
    /// Six years
    pub const MAX: u32 = 6 * 365;

    /// Create a validity window, rejecting values outside the allowed range
    pub fn new(days: u32) -> Result<Self> {
        if days < Self::MIN || days > Self::MAX {
            return Err(FleetError::InvalidValidity {
                days,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(days))
    }

    /// The shortest allowed window
    #[must_use]
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }

    /// The longest allowed window
    #[must_use]
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }

    /// Number of days
    #[must_use]
    pub const fn days(self) -> u32 {
        self.0
    }

    /// The window `offset` days longer than `self`, capped at `limit`
    #[must_use]
    pub const fn offset_within(self, offset: u32, limit: Self) -> Self {
        let days = self.0.saturating_add(offset);
        if days > limit.0 {
            limit
        } else {
            Self(days)
        }
    }
}

impl TryFrom<u32> for ValidityDays {
    type Error = FleetError;

    fn try_from(days: u32) -> Result<Self> {
        Self::new(days)
    }
}

impl From<ValidityDays> for u32 {
    fn from(validity: ValidityDays) -> Self {
        validity.0
    }
}

impl std::fmt::Display for ValidityDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// Request body for registering a certificate without a CA
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCertificateRequest {
    /// PEM-encoded certificate
    pub certificate_pem: String,

    /// Initial status
    pub status: CertificateStatus,
}

/// Registry response to a certificate registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCertificate {
    /// Registry-assigned identifier
    pub certificate_id: String,

    /// Certificate ARN
    pub certificate_arn: String,
}

/// Detailed registry record of a certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDescription {
    /// Registry-assigned identifier
    pub certificate_id: String,

    /// Certificate ARN, used as the principal for thing bindings
    pub certificate_arn: String,

    /// Current status
    pub status: CertificateStatus,

    /// PEM-encoded certificate
    #[serde(default)]
    pub certificate_pem: Option<String>,

    /// Account that owns the certificate
    #[serde(default)]
    pub owned_by: Option<String>,

    /// Creation time (epoch seconds)
    #[serde(default)]
    pub creation_date: Option<f64>,
}

/// Envelope returned by the describe-certificate call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeCertificateResponse {
    /// The certificate record
    pub certificate_description: CertificateDescription,
}

/// One entry of a certificate listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    /// Registry-assigned identifier
    pub certificate_id: String,

    /// Certificate ARN
    #[serde(default)]
    pub certificate_arn: Option<String>,

    /// Current status
    #[serde(default)]
    pub status: Option<CertificateStatus>,

    /// Creation time (epoch seconds)
    #[serde(default)]
    pub creation_date: Option<f64>,
}

/// One page of a certificate listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePage {
    /// Certificates on this page
    #[serde(default)]
    pub certificates: Vec<CertificateSummary>,

    /// Marker for the next page, absent on the last page
    #[serde(default)]
    pub next_marker: Option<String>,
}

impl CertificatePage {
    /// Identifiers of the certificates on this page
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.certificates.iter().map(|c| c.certificate_id.as_str())
    }
}

/// Things bound to a principal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalThings {
    /// Thing names
    #[serde(default)]
    pub things: Vec<String>,

    /// Token for the next page
    #[serde(default)]
    pub next_token: Option<String>,
}
