// Local Crate Imports
use crate::Peak;

// Public API ==========================================================================================================

impl Peak {
    #[must_use]
    pub const fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.mz.is_finite() && self.intensity.is_finite() && self.intensity >= 0.0
    }
}

impl From<(f64, f64)> for Peak {
    fn from((mz, intensity): (f64, f64)) -> Self {
        Self::new(mz, intensity)
    }
}

// Module Tests ========================================================================================================
