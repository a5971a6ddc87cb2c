//! Compound identification for chromatographic peak features
//!
//! An [`AnnotationEngine`] looks up every plausible reference compound for a [`PeakFeature`], scores each candidate
//! by precursor mass, secondary coordinate (retention time or CCS) and MS2 spectral similarity, checks those scores
//! against the cutoffs in [`SearchParameters`], and finally resolves a single [`MatchResult`] with a
//! [`Classification`].

mod candidate_filter;
mod engine;
mod errors;
mod match_result;
mod match_state;
mod match_validator;
mod peak_feature;
mod result_aggregator;
mod score_calculator;
mod search_parameters;
mod similarity_decay;
#[cfg(test)]
mod testing_tools;

// External Crate Imports
use derive_more::{Display, IsVariant};
use reference_db::{Identity, IsotopePattern, RecordId, ReferenceDatabase, SecondaryCoordinate};
use serde::{Deserialize, Serialize};
use spectral_similarity::{PeakWeighting, SpectralSimilarity, Spectrum};

pub use errors::FeatureError;
pub use match_result::ISOTOPE_NOT_EVALUATED;

// Public API ==========================================================================================================

/// An observed chromatographic peak feature, awaiting identification
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct PeakFeature {
    pub precursor_mz: f64,
    pub secondary: SecondaryCoordinate,
    pub spectrum: Spectrum,
    pub isotopes: Option<IsotopePattern>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SearchParameters {
    pub ms1_tolerance: f64,
    pub ms2_tolerance: f64,
    pub secondary_coordinate_tolerance: f64,
    pub use_secondary_coordinate_for_filtering: bool,
    pub use_secondary_coordinate_for_scoring: bool,
    pub weighted_dot_product_cutoff: f64,
    pub simple_dot_product_cutoff: f64,
    pub reverse_dot_product_cutoff: f64,
    pub matched_peaks_percentage_cutoff: f64,
    pub minimum_spectrum_match_count: usize,
    pub total_score_cutoff: f64,
    pub similarity_decay: SimilarityDecay,
    pub spectral_weights: SpectralWeights,
    pub peak_weighting: PeakWeighting,
}

/// How mass and secondary-coordinate similarities fall off as a difference approaches its tolerance
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display, IsVariant, Serialize, Deserialize)]
#[derive(knuffel::DecodeScalar)]
pub enum SimilarityDecay {
    /// `exp(-½(Δ/σ)²)` with `σ = tolerance / 3`
    #[default]
    #[display("gaussian")]
    Gaussian,
    /// `max(0, 1 - |Δ| / tolerance)`
    #[display("linear")]
    Linear,
}

/// Relative weights of the three dot-product variants when they're averaged into a single spectral score, plus the
/// weight the matched peak percentage carries in a strict total score (where every other term counts once)
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SpectralWeights {
    pub weighted: f64,
    pub simple: f64,
    pub reverse: f64,
    pub matched_peaks: f64,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display, IsVariant, Serialize, Deserialize)]
pub enum ScoringMode {
    /// Mass, secondary coordinate, and spectral evidence all count towards the total score
    #[default]
    #[display("strict")]
    Strict,
    /// Only mass and secondary coordinate evidence count towards the total score
    #[display("soft")]
    Soft,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, IsVariant, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Unmatched,
    PrecursorOnly,
    SpectrumOnly,
    Both,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display, IsVariant, Serialize, Deserialize)]
pub enum Classification {
    #[display("reference matched")]
    ReferenceMatched,
    #[display("suggested")]
    Suggested,
    #[default]
    #[display("unknown")]
    Unknown,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    record_id: Option<RecordId>,
    identity: Option<Identity>,
    scoring_mode: ScoringMode,
    precursor_mz_difference: f64,
    secondary_coordinate_difference: Option<f64>,
    accurate_mass_similarity: f64,
    secondary_coordinate_similarity: f64,
    secondary_coordinate_scored: bool,
    #[serde(flatten)]
    spectral: SpectralSimilarity,
    isotope_similarity: f64,
    total_score: f64,
    state: MatchState,
    is_secondary_coordinate_match: bool,
    classification: Classification,
}

// NOTE: The pipeline stages below only borrow the parameters they're configured with; the `AnnotationEngine` owns them

#[derive(Copy, Clone, Debug)]
pub struct CandidateFilter<'p> {
    parameters: &'p SearchParameters,
}

#[derive(Copy, Clone, Debug)]
pub struct ScoreCalculator<'p> {
    parameters: &'p SearchParameters,
}

#[derive(Copy, Clone, Debug)]
pub struct MatchValidator<'p> {
    parameters: &'p SearchParameters,
}

#[derive(Copy, Clone, Debug)]
pub struct ResultAggregator<'p> {
    parameters: &'p SearchParameters,
}

/// Annotates peak features against a borrowed, read-only [`ReferenceDatabase`]
#[derive(Clone, Debug)]
pub struct AnnotationEngine<'db> {
    database: &'db ReferenceDatabase,
    parameters: SearchParameters,
}
