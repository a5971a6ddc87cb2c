// Local Crate Imports
use crate::{Peak, PeakWeighting};

// Public API ==========================================================================================================

impl PeakWeighting {
    /// The composite weighting of Stein & Scott (1994): `m/z³ · intensity^0.6`
    pub const STEIN_SCOTT: Self = Self::new(3.0, 0.6);
    /// Leaves intensities untouched, turning a weighted dot product back into a simple one
    pub const UNWEIGHTED: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(mz_exponent: f64, intensity_exponent: f64) -> Self {
        Self {
            mz_exponent,
            intensity_exponent,
        }
    }

    #[must_use]
    pub fn weigh(&self, peak: &Peak) -> f64 {
        peak.mz.powf(self.mz_exponent) * peak.intensity.powf(self.intensity_exponent)
    }
}

impl Default for PeakWeighting {
    fn default() -> Self {
        Self::STEIN_SCOTT
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;

    use super::*;

    #[test]
    fn weigh_peaks() {
        let peak = Peak::new(10.0, 32.0);
        assert_float_absolute_eq!(PeakWeighting::UNWEIGHTED.weigh(&peak), 32.0);
        assert_float_absolute_eq!(PeakWeighting::new(1.0, 0.0).weigh(&peak), 10.0);
        assert_float_absolute_eq!(PeakWeighting::new(2.0, 0.2).weigh(&peak), 200.0);
        assert_float_absolute_eq!(PeakWeighting::default().weigh(&Peak::new(2.0, 1.0)), 8.0);
    }
}
