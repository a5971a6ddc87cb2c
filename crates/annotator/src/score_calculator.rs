// External Crate Imports
use reference_db::ReferenceRecord;
use spectral_similarity::SpectralSimilarityScorer;

// Local Crate Imports
use crate::{
    ISOTOPE_NOT_EVALUATED, MatchResult, PeakFeature, ScoreCalculator, ScoringMode, SearchParameters,
    match_result::Scores,
};

// Public API ==========================================================================================================

impl<'p> ScoreCalculator<'p> {
    #[must_use]
    pub const fn new(parameters: &'p SearchParameters) -> Self {
        Self { parameters }
    }

    /// Scores `target` against a single `candidate`. The returned result carries every metric, but none of the
    /// match flags; those are set by [`crate::MatchValidator::validate()`].
    #[must_use]
    pub fn calculate_score(
        &self,
        target: &PeakFeature,
        candidate: &ReferenceRecord,
        mode: ScoringMode,
    ) -> MatchResult {
        let SearchParameters {
            ms1_tolerance,
            ms2_tolerance,
            secondary_coordinate_tolerance,
            use_secondary_coordinate_for_scoring,
            similarity_decay,
            spectral_weights,
            peak_weighting,
            ..
        } = *self.parameters;

        let precursor_mz_difference = target.precursor_mz - candidate.precursor_mz();
        let accurate_mass_similarity =
            similarity_decay.similarity(precursor_mz_difference, ms1_tolerance);

        let secondary_coordinate_difference = target.secondary.difference(&candidate.secondary());
        let (secondary_coordinate_similarity, secondary_coordinate_scored) =
            match secondary_coordinate_difference {
                Some(difference) if use_secondary_coordinate_for_scoring => (
                    similarity_decay.similarity(difference, secondary_coordinate_tolerance),
                    true,
                ),
                _ => (0.0, false),
            };

        let spectral = SpectralSimilarityScorer::new(ms2_tolerance, peak_weighting)
            .score(&target.spectrum, candidate.spectrum());

        let isotope_similarity = match (&target.isotopes, candidate.isotopes()) {
            (Some(observed), Some(reference)) => observed.similarity(reference),
            _ => ISOTOPE_NOT_EVALUATED,
        };

        // (score, weight) pairs
        let mut terms = vec![(accurate_mass_similarity, 1.0)];
        if secondary_coordinate_scored {
            terms.push((secondary_coordinate_similarity, 1.0));
        }
        if mode == ScoringMode::Strict {
            let combined_spectral_score = spectral_weights.combine(
                spectral.weighted_dot_product,
                spectral.simple_dot_product,
                spectral.reverse_dot_product,
            );
            terms.extend([
                (combined_spectral_score, 1.0),
                (spectral.matched_peaks_percentage, spectral_weights.matched_peaks),
            ]);
        }
        let total_score = weighted_mean(&terms);

        MatchResult::from_scores(Scores {
            record_id: candidate.id(),
            identity: candidate.identity().clone(),
            scoring_mode: mode,
            precursor_mz_difference,
            secondary_coordinate_difference,
            accurate_mass_similarity,
            secondary_coordinate_similarity,
            secondary_coordinate_scored,
            spectral,
            isotope_similarity,
            total_score,
        })
    }
}

// Private Functions ===================================================================================================

// NOTE: Non-positive or non-finite weights drop their term entirely
fn weighted_mean(terms: &[(f64, f64)]) -> f64 {
    let (sum, total_weight) = terms
        .iter()
        .filter(|&&(_, weight)| weight.is_finite() && weight > 0.0)
        .fold((0.0, 0.0), |(sum, total_weight), &(score, weight)| {
            (sum + score * weight, total_weight + weight)
        });
    if total_weight > 0.0 { sum / total_weight } else { 0.0 }
}

// Module Tests ========================================================================================================
