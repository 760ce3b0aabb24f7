//! Batch sizes and validity windows for a deploy run.

use certfleet_core::{FleetError, Result, ValidityDays};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest batch a deploy run generates
pub const MIN_NUM_CERTS: u32 = 100;

/// Largest batch a deploy run generates
pub const MAX_NUM_CERTS: u32 = 200;

/// Bounds for batch size and certificate validity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    min_certificates: u32,
    max_certificates: u32,
    min_days: ValidityDays,
    max_days: ValidityDays,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            min_certificates: MIN_NUM_CERTS,
            max_certificates: MAX_NUM_CERTS,
            min_days: ValidityDays::minimum(),
            max_days: ValidityDays::maximum(),
        }
    }
}

impl BatchLimits {
    /// Validate and build limits.
    ///
    /// Batch sizes must be non-zero and ordered. Day bounds must be ordered
    /// and each must be a valid validity window.
    pub fn new(
        min_certificates: u32,
        max_certificates: u32,
        min_days: u32,
        max_days: u32,
    ) -> Result<Self> {
        if min_certificates == 0 || min_certificates > max_certificates {
            return Err(FleetError::Config(format!(
                "batch size range {min_certificates}..={max_certificates} is empty or starts at zero"
            )));
        }
        if min_days > max_days {
            return Err(FleetError::Config(format!(
                "validity range {min_days}..={max_days} days is empty"
            )));
        }

        Ok(Self {
            min_certificates,
            max_certificates,
            min_days: ValidityDays::new(min_days)?,
            max_days: ValidityDays::new(max_days)?,
        })
    }

    /// Smallest batch size
    #[must_use]
    pub const fn min_certificates(&self) -> u32 {
        self.min_certificates
    }

    /// Largest batch size
    #[must_use]
    pub const fn max_certificates(&self) -> u32 {
        self.max_certificates
    }

    /// Shortest validity
    #[must_use]
    pub const fn min_days(&self) -> ValidityDays {
        self.min_days
    }

    /// Longest validity
    #[must_use]
    pub const fn max_days(&self) -> ValidityDays {
        self.max_days
    }

    /// Pick a batch size uniformly from the configured range
    pub fn batch_size<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min_certificates..=self.max_certificates)
    }

    /// Pick a validity uniformly from the configured range
    pub fn validity<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidityDays {
        let span = self.max_days.days() - self.min_days.days();
        self.min_days
            .offset_within(rng.gen_range(0..=span), self.max_days)
    }
}

/// How validity windows are spread across a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Each certificate gets an independent uniform validity
    Random,
    /// Validities step evenly from the shortest towards the longest
    Even,
}

/// The validity of every certificate in one deploy run, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    validities: Vec<ValidityDays>,
}

impl BatchPlan {
    /// Plan a batch with the given distribution and a random size
    pub fn generate<R: Rng + ?Sized>(
        distribution: Distribution,
        limits: &BatchLimits,
        rng: &mut R,
    ) -> Self {
        match distribution {
            Distribution::Random => Self::random(limits, rng),
            Distribution::Even => Self::even(limits, rng),
        }
    }

    /// Random size, independent uniform validities
    pub fn random<R: Rng + ?Sized>(limits: &BatchLimits, rng: &mut R) -> Self {
        let size = limits.batch_size(rng);
        let validities = (0..size).map(|_| limits.validity(rng)).collect();
        Self { validities }
    }

    /// Random size, evenly distributed validities
    pub fn even<R: Rng + ?Sized>(limits: &BatchLimits, rng: &mut R) -> Self {
        let size = limits.batch_size(rng);
        Self::evenly_distributed(size, limits)
    }

    /// `size` certificates where the i-th gets `min + i * (max - min) / size` days
    #[must_use]
    pub fn evenly_distributed(size: u32, limits: &BatchLimits) -> Self {
        let span = u64::from(limits.max_days.days() - limits.min_days.days());
        let n = u64::from(size.max(1));

        let validities = (0..u64::from(size))
            .map(|i| {
                // i < n keeps the step below span
                let step = u32::try_from(i * span / n).unwrap_or(u32::MAX);
                limits.min_days.offset_within(step, limits.max_days)
            })
            .collect();

        Self { validities }
    }

    /// Build a plan from explicit validities
    #[must_use]
    pub fn from_validities(validities: Vec<ValidityDays>) -> Self {
        Self { validities }
    }

    /// Number of certificates
    #[must_use]
    pub fn len(&self) -> usize {
        self.validities.len()
    }

    /// True when the plan issues nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validities.is_empty()
    }

    /// Validities in issue order
    #[must_use]
    pub fn validities(&self) -> &[ValidityDays] {
        &self.validities
    }
}
