//! Weighted choice of a certificate's initial registry status.

use certfleet_core::{CertificateStatus, FleetError, Result};
use rand::Rng;

/// Relative weights of ACTIVE and INACTIVE at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWeights {
    active: u32,
    inactive: u32,
}

impl Default for StatusWeights {
    /// Five active certificates for every inactive one
    fn default() -> Self {
        Self {
            active: 5,
            inactive: 1,
        }
    }
}

impl StatusWeights {
    /// Build weights; at least one must be non-zero
    pub fn new(active: u32, inactive: u32) -> Result<Self> {
        if active == 0 && inactive == 0 {
            return Err(FleetError::Config(format!(
                "status weights {active}:{inactive} cannot be used"
            )));
        }
        Ok(Self { active, inactive })
    }

    /// Weight of ACTIVE
    #[must_use]
    pub const fn active(&self) -> u32 {
        self.active
    }

    /// Weight of INACTIVE
    #[must_use]
    pub const fn inactive(&self) -> u32 {
        self.inactive
    }

    /// Draw a status
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> CertificateStatus {
        let total = u64::from(self.active) + u64::from(self.inactive);
        if rng.gen_range(0..total) < u64::from(self.active) {
            CertificateStatus::Active
        } else {
            CertificateStatus::Inactive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weighted_ratio() {
        let weights = StatusWeights::default();
        let mut rng = StdRng::seed_from_u64(42);

        let trials = 10_000;
        let active = (0..trials)
            .filter(|_| weights.choose(&mut rng) == CertificateStatus::Active)
            .count();
        let inactive = trials - active;

        let ratio = active as f64 / inactive as f64;
        assert!((4.0..6.25).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn test_degenerate_weights() {
        let mut rng = StdRng::seed_from_u64(1);

        let only_active = StatusWeights::new(1, 0).unwrap();
        assert!((0..100).all(|_| only_active.choose(&mut rng) == CertificateStatus::Active));

        let only_inactive = StatusWeights::new(0, 3).unwrap();
        assert!((0..100).all(|_| only_inactive.choose(&mut rng) == CertificateStatus::Inactive));

        assert!(StatusWeights::new(0, 0).is_err());
    }
}
