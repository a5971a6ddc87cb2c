// External Crate Imports
use knuffel::{Decode, span::Span};
use miette::Result;
use spectral_similarity::PeakWeighting;
use tracing::debug;

// Local Crate Imports
use crate::{SearchParameters, SimilarityDecay, SpectralWeights};

// Public API ==========================================================================================================

impl SearchParameters {
    /// Reads parameters from KDL, falling back to [`SearchParameters::default()`] for any that are left out
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed: SearchParametersKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let parameters = parsed.into_parameters(Self::default());
        debug!(file_name = file_name.as_ref(), ?parameters, "loaded search parameters");
        Ok(parameters)
    }

    #[must_use]
    pub fn ms1_tolerance(self, ms1_tolerance: f64) -> Self {
        Self {
            ms1_tolerance,
            ..self
        }
    }

    #[must_use]
    pub fn ms2_tolerance(self, ms2_tolerance: f64) -> Self {
        Self {
            ms2_tolerance,
            ..self
        }
    }

    #[must_use]
    pub fn secondary_coordinate_tolerance(self, secondary_coordinate_tolerance: f64) -> Self {
        Self {
            secondary_coordinate_tolerance,
            ..self
        }
    }

    #[must_use]
    pub fn use_secondary_coordinate_for_filtering(self, enabled: bool) -> Self {
        Self {
            use_secondary_coordinate_for_filtering: enabled,
            ..self
        }
    }

    #[must_use]
    pub fn use_secondary_coordinate_for_scoring(self, enabled: bool) -> Self {
        Self {
            use_secondary_coordinate_for_scoring: enabled,
            ..self
        }
    }

    #[must_use]
    pub fn weighted_dot_product_cutoff(self, weighted_dot_product_cutoff: f64) -> Self {
        Self {
            weighted_dot_product_cutoff,
            ..self
        }
    }

    #[must_use]
    pub fn simple_dot_product_cutoff(self, simple_dot_product_cutoff: f64) -> Self {
        Self {
            simple_dot_product_cutoff,
            ..self
        }
    }

    #[must_use]
    pub fn reverse_dot_product_cutoff(self, reverse_dot_product_cutoff: f64) -> Self {
        Self {
            reverse_dot_product_cutoff,
            ..self
        }
    }

    #[must_use]
    pub fn matched_peaks_percentage_cutoff(self, matched_peaks_percentage_cutoff: f64) -> Self {
        Self {
            matched_peaks_percentage_cutoff,
            ..self
        }
    }

    #[must_use]
    pub fn minimum_spectrum_match_count(self, minimum_spectrum_match_count: usize) -> Self {
        Self {
            minimum_spectrum_match_count,
            ..self
        }
    }

    #[must_use]
    pub fn total_score_cutoff(self, total_score_cutoff: f64) -> Self {
        Self {
            total_score_cutoff,
            ..self
        }
    }

    #[must_use]
    pub fn similarity_decay(self, similarity_decay: SimilarityDecay) -> Self {
        Self {
            similarity_decay,
            ..self
        }
    }

    #[must_use]
    pub fn spectral_weights(self, spectral_weights: SpectralWeights) -> Self {
        Self {
            spectral_weights,
            ..self
        }
    }

    #[must_use]
    pub fn peak_weighting(self, peak_weighting: PeakWeighting) -> Self {
        Self {
            peak_weighting,
            ..self
        }
    }

    /// Whether the secondary coordinate takes part in the search at all
    #[must_use]
    pub const fn uses_secondary_coordinate(&self) -> bool {
        self.use_secondary_coordinate_for_filtering || self.use_secondary_coordinate_for_scoring
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            ms1_tolerance: 0.01,
            ms2_tolerance: 0.025,
            secondary_coordinate_tolerance: 0.5,
            use_secondary_coordinate_for_filtering: false,
            use_secondary_coordinate_for_scoring: true,
            weighted_dot_product_cutoff: 0.6,
            simple_dot_product_cutoff: 0.6,
            reverse_dot_product_cutoff: 0.8,
            matched_peaks_percentage_cutoff: 0.25,
            minimum_spectrum_match_count: 3,
            total_score_cutoff: 0.8,
            similarity_decay: SimilarityDecay::default(),
            spectral_weights: SpectralWeights::default(),
            peak_weighting: PeakWeighting::default(),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl SpectralWeights {
    #[must_use]
    pub const fn new(weighted: f64, simple: f64, reverse: f64) -> Self {
        Self {
            weighted,
            simple,
            reverse,
            matched_peaks: 1.0,
        }
    }

    #[must_use]
    pub const fn matched_peaks(self, matched_peaks: f64) -> Self {
        Self {
            matched_peaks,
            ..self
        }
    }

    /// The weighted mean of the three dot products, or `0` if the weights don't sum to anything positive
    #[must_use]
    pub fn combine(&self, weighted: f64, simple: f64, reverse: f64) -> f64 {
        let total_weight = self.weighted + self.simple + self.reverse;
        if total_weight.is_nan() || total_weight <= 0.0 {
            return 0.0;
        }

        let combined =
            (self.weighted * weighted + self.simple * simple + self.reverse * reverse) / total_weight;
        if combined.is_finite() {
            combined.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for SpectralWeights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct SearchParametersKdl {
    #[knuffel(child, unwrap(argument))]
    ms1_tolerance: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    ms2_tolerance: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    secondary_coordinate_tolerance: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    use_secondary_coordinate_for_filtering: Option<bool>,
    #[knuffel(child, unwrap(argument))]
    use_secondary_coordinate_for_scoring: Option<bool>,
    #[knuffel(child, unwrap(argument))]
    weighted_dot_product_cutoff: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    simple_dot_product_cutoff: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    reverse_dot_product_cutoff: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    matched_peaks_percentage_cutoff: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    minimum_spectrum_match_count: Option<usize>,
    #[knuffel(child, unwrap(argument))]
    total_score_cutoff: Option<f64>,
    #[knuffel(child, unwrap(argument))]
    similarity_decay: Option<SimilarityDecay>,
    #[knuffel(child)]
    spectral_weights: Option<SpectralWeightsKdl>,
    #[knuffel(child)]
    peak_weighting: Option<PeakWeightingKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct SpectralWeightsKdl {
    #[knuffel(property)]
    weighted: Option<f64>,
    #[knuffel(property)]
    simple: Option<f64>,
    #[knuffel(property)]
    reverse: Option<f64>,
    #[knuffel(property)]
    matched_peaks: Option<f64>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct PeakWeightingKdl {
    #[knuffel(property)]
    mz_exponent: Option<f64>,
    #[knuffel(property)]
    intensity_exponent: Option<f64>,
}

// Infallible Conversions =============================================================================================

impl SearchParametersKdl {
    fn into_parameters(self, defaults: SearchParameters) -> SearchParameters {
        let weights = defaults.spectral_weights;
        let spectral_weights = self.spectral_weights.map_or(weights, |kdl| SpectralWeights {
            weighted: kdl.weighted.unwrap_or(weights.weighted),
            simple: kdl.simple.unwrap_or(weights.simple),
            reverse: kdl.reverse.unwrap_or(weights.reverse),
            matched_peaks: kdl.matched_peaks.unwrap_or(weights.matched_peaks),
        });

        let weighting = defaults.peak_weighting;
        let peak_weighting = self.peak_weighting.map_or(weighting, |kdl| {
            PeakWeighting::new(
                kdl.mz_exponent.unwrap_or(weighting.mz_exponent),
                kdl.intensity_exponent.unwrap_or(weighting.intensity_exponent),
            )
        });

        SearchParameters {
            ms1_tolerance: self.ms1_tolerance.unwrap_or(defaults.ms1_tolerance),
            ms2_tolerance: self.ms2_tolerance.unwrap_or(defaults.ms2_tolerance),
            secondary_coordinate_tolerance: self
                .secondary_coordinate_tolerance
                .unwrap_or(defaults.secondary_coordinate_tolerance),
            use_secondary_coordinate_for_filtering: self
                .use_secondary_coordinate_for_filtering
                .unwrap_or(defaults.use_secondary_coordinate_for_filtering),
            use_secondary_coordinate_for_scoring: self
                .use_secondary_coordinate_for_scoring
                .unwrap_or(defaults.use_secondary_coordinate_for_scoring),
            weighted_dot_product_cutoff: self
                .weighted_dot_product_cutoff
                .unwrap_or(defaults.weighted_dot_product_cutoff),
            simple_dot_product_cutoff: self
                .simple_dot_product_cutoff
                .unwrap_or(defaults.simple_dot_product_cutoff),
            reverse_dot_product_cutoff: self
                .reverse_dot_product_cutoff
                .unwrap_or(defaults.reverse_dot_product_cutoff),
            matched_peaks_percentage_cutoff: self
                .matched_peaks_percentage_cutoff
                .unwrap_or(defaults.matched_peaks_percentage_cutoff),
            minimum_spectrum_match_count: self
                .minimum_spectrum_match_count
                .unwrap_or(defaults.minimum_spectrum_match_count),
            total_score_cutoff: self.total_score_cutoff.unwrap_or(defaults.total_score_cutoff),
            similarity_decay: self.similarity_decay.unwrap_or(defaults.similarity_decay),
            spectral_weights,
            peak_weighting,
        }
    }
}

// Module Tests ========================================================================================================
