// Local Crate Imports
use crate::{MatchResult, MatchState, MatchValidator, SearchParameters};

// Public API ==========================================================================================================

impl<'p> MatchValidator<'p> {
    #[must_use]
    pub const fn new(parameters: &'p SearchParameters) -> Self {
        Self { parameters }
    }

    /// Sets the precursor, secondary coordinate, and spectrum match flags of a freshly scored `result`
    #[must_use]
    pub fn validate(&self, result: MatchResult) -> MatchResult {
        let is_precursor_mz_match = self.is_precursor_mz_match(&result);
        let is_spectrum_match = self.is_spectrum_match(&result);
        let is_secondary_coordinate_match = self.is_secondary_coordinate_match(&result);

        result.with_flags(
            MatchState::new(is_precursor_mz_match, is_spectrum_match),
            is_secondary_coordinate_match,
        )
    }
}

// Private Functions ===================================================================================================

impl MatchValidator<'_> {
    fn is_precursor_mz_match(&self, result: &MatchResult) -> bool {
        result.precursor_mz_difference().abs() <= self.parameters.ms1_tolerance
    }

    // NOTE: Results without a comparable coordinate have nothing to disagree with, so they pass
    fn is_secondary_coordinate_match(&self, result: &MatchResult) -> bool {
        if !self.parameters.uses_secondary_coordinate() {
            return true;
        }
        result
            .secondary_coordinate_difference()
            .is_none_or(|difference| difference.abs() <= self.parameters.secondary_coordinate_tolerance)
    }

    fn is_spectrum_match(&self, result: &MatchResult) -> bool {
        let p = self.parameters;
        result.weighted_dot_product() >= p.weighted_dot_product_cutoff
            && result.simple_dot_product() >= p.simple_dot_product_cutoff
            && result.reverse_dot_product() >= p.reverse_dot_product_cutoff
            && result.matched_peaks_percentage() >= p.matched_peaks_percentage_cutoff
            && result.matched_peaks_count() >= p.minimum_spectrum_match_count
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use reference_db::SecondaryCoordinate;

    use crate::{
        ScoreCalculator, ScoringMode,
        testing_tools::{SPECTRUM, feature, record},
    };

    use super::*;

    fn validated(
        parameters: &SearchParameters,
        target_mz: f64,
        target_rt: f64,
        reference_peaks: &[(f64, f64)],
    ) -> MatchResult {
        let target = feature(target_mz, SecondaryCoordinate::RetentionTime(target_rt), SPECTRUM);
        let candidate = record(1, 100.0, SecondaryCoordinate::RetentionTime(5.0), reference_peaks);
        let result =
            ScoreCalculator::new(parameters).calculate_score(&target, &candidate, ScoringMode::Strict);
        MatchValidator::new(parameters).validate(result)
    }

    #[test]
    fn everything_matches() {
        let parameters = SearchParameters::default();
        let result = validated(&parameters, 100.0, 5.0, SPECTRUM);
        assert_eq!(result.state(), MatchState::Both);
        assert!(result.is_precursor_mz_match());
        assert!(result.is_spectrum_match());
        assert!(result.is_secondary_coordinate_match());
    }

    #[test]
    fn precursor_tolerance_is_inclusive() {
        let parameters = SearchParameters::default().ms1_tolerance(0.5);
        assert!(validated(&parameters, 100.5, 5.0, SPECTRUM).is_precursor_mz_match());
        assert!(validated(&parameters, 99.5, 5.0, SPECTRUM).is_precursor_mz_match());

        let result = validated(&parameters, 100.75, 5.0, SPECTRUM);
        assert_eq!(result.state(), MatchState::SpectrumOnly);
    }

    #[test]
    fn spectrum_cutoffs() {
        let parameters = SearchParameters::default();

        let disjoint = validated(&parameters, 100.0, 5.0, &[(500.0, 1.0)]);
        assert_eq!(disjoint.state(), MatchState::PrecursorOnly);

        // Two perfectly matched peaks still fall short of the minimum count of three
        let two_peaks = validated(&parameters, 100.0, 5.0, &SPECTRUM[2..]);
        assert_eq!(two_peaks.matched_peaks_count(), 2);
        assert!(!two_peaks.is_spectrum_match());

        let lenient = parameters.minimum_spectrum_match_count(2);
        assert!(validated(&lenient, 100.0, 5.0, &SPECTRUM[2..]).is_spectrum_match());

        let impossible = SearchParameters::default().reverse_dot_product_cutoff(1.1);
        assert!(!validated(&impossible, 100.0, 5.0, SPECTRUM).is_spectrum_match());
    }

    #[test]
    fn secondary_coordinate_flag() {
        let parameters = SearchParameters::default();
        assert!(validated(&parameters, 100.0, 5.5, SPECTRUM).is_secondary_coordinate_match());
        assert!(!validated(&parameters, 100.0, 6.0, SPECTRUM).is_secondary_coordinate_match());

        let filtering_only = parameters
            .clone()
            .use_secondary_coordinate_for_scoring(false)
            .use_secondary_coordinate_for_filtering(true);
        assert!(!validated(&filtering_only, 100.0, 6.0, SPECTRUM).is_secondary_coordinate_match());

        let disabled = parameters.use_secondary_coordinate_for_scoring(false);
        assert!(validated(&disabled, 100.0, 6.0, SPECTRUM).is_secondary_coordinate_match());
    }

    #[test]
    fn incomparable_coordinates_pass() {
        let parameters = SearchParameters::default();
        let target = feature(100.0, SecondaryCoordinate::None, SPECTRUM);
        let candidate = record(1, 100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);
        let result = ScoreCalculator::new(&parameters).calculate_score(&target, &candidate, ScoringMode::Soft);
        assert!(MatchValidator::new(&parameters).validate(result).is_secondary_coordinate_match());
    }

    #[test]
    fn validation_keeps_scores() {
        let parameters = SearchParameters::default();
        let target = feature(100.002, SecondaryCoordinate::RetentionTime(5.1), SPECTRUM);
        let candidate = record(1, 100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);
        let scored =
            ScoreCalculator::new(&parameters).calculate_score(&target, &candidate, ScoringMode::Strict);
        let validated = MatchValidator::new(&parameters).validate(scored.clone());

        assert_eq!(validated.total_score(), scored.total_score());
        assert_eq!(validated.spectral_similarity(), scored.spectral_similarity());
        assert_eq!(validated.classification(), scored.classification());
    }
}
