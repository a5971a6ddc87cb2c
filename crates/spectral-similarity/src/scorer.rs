// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::{
    Alignment, NEUTRAL_MATCHED_PEAKS_PERCENTAGE, Peak, PeakWeighting, SpectralSimilarity,
    SpectralSimilarityScorer, Spectrum,
};

// Public API ==========================================================================================================

impl SpectralSimilarityScorer {
    #[must_use]
    pub const fn new(tolerance: f64, weighting: PeakWeighting) -> Self {
        Self {
            tolerance,
            weighting,
        }
    }

    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub const fn weighting(&self) -> PeakWeighting {
        self.weighting
    }

    #[must_use]
    pub fn score(&self, target: &Spectrum, reference: &Spectrum) -> SpectralSimilarity {
        if target.is_empty() {
            return SpectralSimilarity::default();
        }

        if reference.is_empty() {
            return SpectralSimilarity {
                matched_peaks_percentage: NEUTRAL_MATCHED_PEAKS_PERCENTAGE,
                ..SpectralSimilarity::default()
            };
        }

        let alignment = Alignment::new(target, reference, self.tolerance);
        let raw = |peak: &Peak| peak.intensity;
        let weighted = |peak: &Peak| self.weighting.weigh(peak);

        let matched_peaks_count = alignment.len();
        let matched_peaks_percentage = matched_peaks_count as f64 / reference.len() as f64;

        SpectralSimilarity {
            weighted_dot_product: dot_product(&alignment, target, reference, weighted),
            simple_dot_product: dot_product(&alignment, target, reference, raw),
            reverse_dot_product: reverse_dot_product(&alignment, target, reference, weighted),
            matched_peaks_percentage,
            matched_peaks_count,
        }
    }
}

impl Default for SpectralSimilarityScorer {
    fn default() -> Self {
        Self::new(0.025, PeakWeighting::default())
    }
}

// Private Functions ===================================================================================================

fn dot_product(
    alignment: &Alignment,
    target: &Spectrum,
    reference: &Spectrum,
    value: impl Fn(&Peak) -> f64 + Copy,
) -> f64 {
    let numerator = aligned_sum(alignment, target, reference, value);
    let denominator = norm(target.iter(), value) * norm(reference.iter(), value);
    clamped_ratio(numerator, denominator)
}

// NOTE: Only target peaks that found a partner enter the target-side norm, so extra (unexplained) target peaks don't
// drag the score down. Every reference peak still counts on the reference side.
fn reverse_dot_product(
    alignment: &Alignment,
    target: &Spectrum,
    reference: &Spectrum,
    value: impl Fn(&Peak) -> f64 + Copy,
) -> f64 {
    let numerator = aligned_sum(alignment, target, reference, value);
    let matched_target = alignment.target_indices().map(|t| &target[t]);
    let denominator = norm(matched_target, value) * norm(reference.iter(), value);
    clamped_ratio(numerator, denominator)
}

// ---------------------------------------------------------------------------------------------------------------------

fn aligned_sum(
    alignment: &Alignment,
    target: &Spectrum,
    reference: &Spectrum,
    value: impl Fn(&Peak) -> f64,
) -> f64 {
    alignment
        .pairs()
        .iter()
        .map(|&(t, r)| value(&target[t]) * value(&reference[r]))
        .sum()
}

fn norm<'s>(peaks: impl Iterator<Item = &'s Peak>, value: impl Fn(&Peak) -> f64) -> f64 {
    peaks.map(|peak| value(peak).powi(2)).sum::<f64>().sqrt()
}

fn clamped_ratio(numerator: f64, denominator: f64) -> f64 {
    let ratio = numerator / denominator;
    if denominator > 0.0 && ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Debugging Helpers ===================================================================================================

impl std::fmt::Display for SpectralSimilarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scores = [
            ("weighted", self.weighted_dot_product),
            ("simple", self.simple_dot_product),
            ("reverse", self.reverse_dot_product),
            ("matched", self.matched_peaks_percentage),
        ]
        .iter()
        .map(|(name, score)| format!("{name}={score:.3}"))
        .join(", ");
        write!(f, "{scores} ({} peaks)", self.matched_peaks_count)
    }
}

// Module Tests ========================================================================================================
