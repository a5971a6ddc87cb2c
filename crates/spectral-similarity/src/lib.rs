//! Pairwise comparison of MS2 spectra: greedy peak alignment followed by several dot-product similarity variants

mod alignment;
mod peak;
mod scorer;
mod spectrum;
mod weighting;

// External Crate Imports
use serde::{Deserialize, Serialize};

// Public API ==========================================================================================================

/// The `matched_peaks_percentage` reported when the reference spectrum has no peaks, but the target does
pub const NEUTRAL_MATCHED_PEAKS_PERCENTAGE: f64 = 0.5;

#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// A centroided MS2 spectrum, with peaks always kept in ascending m/z order
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Peak>")]
pub struct Spectrum(Vec<Peak>);

/// Rescales a peak to `mz^mz_exponent * intensity^intensity_exponent` before it enters a weighted dot product
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PeakWeighting {
    pub mz_exponent: f64,
    pub intensity_exponent: f64,
}

/// Pairs of `(target_index, reference_index)`, where each reference peak appears at most once
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Alignment(Vec<(usize, usize)>);

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpectralSimilarityScorer {
    tolerance: f64,
    weighting: PeakWeighting,
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct SpectralSimilarity {
    pub weighted_dot_product: f64,
    pub simple_dot_product: f64,
    pub reverse_dot_product: f64,
    pub matched_peaks_percentage: f64,
    pub matched_peaks_count: usize,
}
