// Local Crate Imports
use crate::SimilarityDecay;

// Public API ==========================================================================================================

impl SimilarityDecay {
    /// Maps a difference to a similarity in `[0, 1]`: exactly `1` for a zero difference, falling towards `0` as `|Δ|`
    /// approaches `tolerance`. A non-positive tolerance only tolerates exact agreement.
    #[must_use]
    pub fn similarity(self, difference: f64, tolerance: f64) -> f64 {
        if difference.is_nan() {
            return 0.0;
        }

        if tolerance.is_nan() || tolerance <= 0.0 {
            return if difference == 0.0 { 1.0 } else { 0.0 };
        }

        let ratio = difference.abs() / tolerance;
        let similarity = match self {
            Self::Gaussian => (-0.5 * (3.0 * ratio).powi(2)).exp(),
            Self::Linear => 1.0 - ratio,
        };
        if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

// Module Tests ========================================================================================================
