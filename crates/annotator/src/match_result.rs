// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use reference_db::{Identity, RecordId};
use spectral_similarity::SpectralSimilarity;

// Local Crate Imports
use crate::{Classification, MatchResult, MatchState, ScoringMode};

// Public API ==========================================================================================================

/// The `isotope_similarity` reported when either the feature or the reference lacks an isotope pattern
pub const ISOTOPE_NOT_EVALUATED: f64 = -1.0;

impl MatchResult {
    /// The result of an annotation that couldn't be resolved to any reference record
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            record_id: None,
            identity: None,
            scoring_mode: ScoringMode::default(),
            precursor_mz_difference: 0.0,
            secondary_coordinate_difference: None,
            accurate_mass_similarity: 0.0,
            secondary_coordinate_similarity: 0.0,
            secondary_coordinate_scored: false,
            spectral: SpectralSimilarity::default(),
            isotope_similarity: ISOTOPE_NOT_EVALUATED,
            total_score: 0.0,
            state: MatchState::Unmatched,
            is_secondary_coordinate_match: false,
            classification: Classification::Unknown,
        }
    }

    #[must_use]
    pub const fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn scoring_mode(&self) -> ScoringMode {
        self.scoring_mode
    }

    /// The signed `target - reference` precursor m/z difference
    #[must_use]
    pub const fn precursor_mz_difference(&self) -> f64 {
        self.precursor_mz_difference
    }

    /// The signed `target - reference` secondary coordinate difference, if the two coordinates were comparable
    #[must_use]
    pub const fn secondary_coordinate_difference(&self) -> Option<f64> {
        self.secondary_coordinate_difference
    }

    #[must_use]
    pub const fn accurate_mass_similarity(&self) -> f64 {
        self.accurate_mass_similarity
    }

    #[must_use]
    pub const fn secondary_coordinate_similarity(&self) -> f64 {
        self.secondary_coordinate_similarity
    }

    /// Whether the secondary coordinate similarity was averaged into the total score
    #[must_use]
    pub const fn secondary_coordinate_scored(&self) -> bool {
        self.secondary_coordinate_scored
    }

    #[must_use]
    pub const fn spectral_similarity(&self) -> &SpectralSimilarity {
        &self.spectral
    }

    #[must_use]
    pub const fn weighted_dot_product(&self) -> f64 {
        self.spectral.weighted_dot_product
    }

    #[must_use]
    pub const fn simple_dot_product(&self) -> f64 {
        self.spectral.simple_dot_product
    }

    #[must_use]
    pub const fn reverse_dot_product(&self) -> f64 {
        self.spectral.reverse_dot_product
    }

    #[must_use]
    pub const fn matched_peaks_percentage(&self) -> f64 {
        self.spectral.matched_peaks_percentage
    }

    #[must_use]
    pub const fn matched_peaks_count(&self) -> usize {
        self.spectral.matched_peaks_count
    }

    /// Either a similarity in `[0, 1]`, or [`ISOTOPE_NOT_EVALUATED`]
    #[must_use]
    pub const fn isotope_similarity(&self) -> f64 {
        self.isotope_similarity
    }

    #[must_use]
    pub const fn total_score(&self) -> f64 {
        self.total_score
    }

    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    #[must_use]
    pub const fn is_precursor_mz_match(&self) -> bool {
        self.state.is_precursor_mz_match()
    }

    #[must_use]
    pub const fn is_spectrum_match(&self) -> bool {
        self.state.is_spectrum_match()
    }

    #[must_use]
    pub const fn is_secondary_coordinate_match(&self) -> bool {
        self.is_secondary_coordinate_match
    }

    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    #[must_use]
    pub fn is_reference_matched(&self) -> bool {
        self.classification.is_reference_matched()
    }

    #[must_use]
    pub fn is_annotation_suggested(&self) -> bool {
        self.classification.is_suggested()
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::unknown()
    }
}

// Crate-Private API ===================================================================================================

/// The raw scores for a single candidate, before any cutoffs are applied
#[derive(Clone, Debug)]
pub(crate) struct Scores {
    pub record_id: RecordId,
    pub identity: Identity,
    pub scoring_mode: ScoringMode,
    pub precursor_mz_difference: f64,
    pub secondary_coordinate_difference: Option<f64>,
    pub accurate_mass_similarity: f64,
    pub secondary_coordinate_similarity: f64,
    pub secondary_coordinate_scored: bool,
    pub spectral: SpectralSimilarity,
    pub isotope_similarity: f64,
    pub total_score: f64,
}

impl MatchResult {
    pub(crate) fn from_scores(scores: Scores) -> Self {
        Self {
            record_id: Some(scores.record_id),
            identity: Some(scores.identity),
            scoring_mode: scores.scoring_mode,
            precursor_mz_difference: scores.precursor_mz_difference,
            secondary_coordinate_difference: scores.secondary_coordinate_difference,
            accurate_mass_similarity: scores.accurate_mass_similarity,
            secondary_coordinate_similarity: scores.secondary_coordinate_similarity,
            secondary_coordinate_scored: scores.secondary_coordinate_scored,
            spectral: scores.spectral,
            isotope_similarity: scores.isotope_similarity,
            total_score: scores.total_score,
            state: MatchState::Unmatched,
            is_secondary_coordinate_match: false,
            classification: Classification::Unknown,
        }
    }

    pub(crate) fn with_flags(self, state: MatchState, is_secondary_coordinate_match: bool) -> Self {
        Self {
            state,
            is_secondary_coordinate_match,
            ..self
        }
    }

    pub(crate) fn with_classification(self, classification: Classification) -> Self {
        Self {
            classification,
            ..self
        }
    }
}

// Debugging Helpers ===================================================================================================

impl Display for MatchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (Some(id), Some(identity)) = (self.record_id, &self.identity) else {
            return write!(f, "{}", self.classification);
        };

        write!(
            f,
            "{} #{id} {} ({} mode): total={:.3}, mass={:.3}",
            identity.name,
            self.classification,
            self.scoring_mode,
            self.total_score,
            self.accurate_mass_similarity,
        )?;
        if self.secondary_coordinate_scored {
            write!(f, ", secondary={:.3}", self.secondary_coordinate_similarity)?;
        }
        write!(f, ", {}", self.spectral)?;
        if self.isotope_similarity >= 0.0 {
            write!(f, ", isotopes={:.3}", self.isotope_similarity)?;
        }
        Ok(())
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use insta::assert_snapshot;

    use super::*;

    fn scores() -> Scores {
        Scores {
            record_id: RecordId::from(1),
            identity: Identity::new("Caffeine"),
            scoring_mode: ScoringMode::Strict,
            precursor_mz_difference: 0.0,
            secondary_coordinate_difference: Some(-0.1),
            accurate_mass_similarity: 1.0,
            secondary_coordinate_similarity: 0.9,
            secondary_coordinate_scored: true,
            spectral: SpectralSimilarity {
                weighted_dot_product: 1.0,
                simple_dot_product: 1.0,
                reverse_dot_product: 1.0,
                matched_peaks_percentage: 1.0,
                matched_peaks_count: 4,
            },
            isotope_similarity: ISOTOPE_NOT_EVALUATED,
            total_score: 0.975,
        }
    }

    #[test]
    fn unknown_results_are_empty() {
        let unknown = MatchResult::unknown();
        assert_eq!(unknown.record_id(), None);
        assert_eq!(unknown.identity(), None);
        assert_float_absolute_eq!(unknown.total_score(), 0.0);
        assert_float_absolute_eq!(unknown.accurate_mass_similarity(), 0.0);
        assert_float_absolute_eq!(unknown.matched_peaks_percentage(), 0.0);
        assert_float_absolute_eq!(unknown.isotope_similarity(), -1.0);
        assert_eq!(unknown.matched_peaks_count(), 0);
        assert!(!unknown.is_precursor_mz_match());
        assert!(!unknown.is_spectrum_match());
        assert!(!unknown.is_secondary_coordinate_match());
        assert!(!unknown.is_reference_matched());
        assert!(!unknown.is_annotation_suggested());
        assert_eq!(unknown.classification(), Classification::Unknown);
        assert_eq!(unknown, MatchResult::default());
    }

    #[test]
    fn results_start_unvalidated() {
        let result = MatchResult::from_scores(scores());
        assert_eq!(result.record_id(), Some(RecordId::from(1)));
        assert_eq!(result.identity().map(|i| i.name.as_str()), Some("Caffeine"));
        assert_eq!(result.state(), MatchState::Unmatched);
        assert_eq!(result.classification(), Classification::Unknown);
        assert_eq!(result.secondary_coordinate_difference(), Some(-0.1));

        let result = result
            .with_flags(MatchState::Both, true)
            .with_classification(Classification::ReferenceMatched);
        assert!(result.is_precursor_mz_match());
        assert!(result.is_spectrum_match());
        assert!(result.is_secondary_coordinate_match());
        assert!(result.is_reference_matched());
        assert!(!result.is_annotation_suggested());
    }

    #[test]
    fn display_results() {
        assert_snapshot!(MatchResult::unknown(), @"unknown");

        let result = MatchResult::from_scores(scores())
            .with_flags(MatchState::Both, true)
            .with_classification(Classification::ReferenceMatched);
        assert_snapshot!(
            result,
            @"Caffeine #1 reference matched (strict mode): total=0.975, mass=1.000, secondary=0.900, weighted=1.000, simple=1.000, reverse=1.000, matched=1.000 (4 peaks)"
        );

        let mut scores = scores();
        scores.scoring_mode = ScoringMode::Soft;
        scores.secondary_coordinate_scored = false;
        scores.isotope_similarity = 0.95;
        let result = MatchResult::from_scores(scores).with_classification(Classification::Suggested);
        assert_snapshot!(
            result,
            @"Caffeine #1 suggested (soft mode): total=0.975, mass=1.000, weighted=1.000, simple=1.000, reverse=1.000, matched=1.000 (4 peaks), isotopes=0.950"
        );
    }
}
