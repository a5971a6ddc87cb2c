// Local Crate Imports
use crate::{MatchResult, ResultAggregator, SearchParameters};

// Public API ==========================================================================================================

impl<'p> ResultAggregator<'p> {
    #[must_use]
    pub const fn new(parameters: &'p SearchParameters) -> Self {
        Self { parameters }
    }

    /// Validated results that match on precursor and spectrum, and clear the total score cutoff. The secondary
    /// coordinate flag plays no part here.
    #[must_use]
    pub fn filter_by_threshold<'r>(&self, results: &'r [MatchResult]) -> Vec<&'r MatchResult> {
        results
            .iter()
            .filter(|r| {
                r.is_precursor_mz_match()
                    && r.is_spectrum_match()
                    && r.total_score() >= self.parameters.total_score_cutoff
            })
            .collect()
    }

    /// The subset of [`Self::filter_by_threshold()`] that also agrees on the secondary coordinate, whenever that
    /// coordinate is being scored
    #[must_use]
    pub fn select_reference_match_results<'r>(&self, results: &'r [MatchResult]) -> Vec<&'r MatchResult> {
        self.filter_by_threshold(results)
            .into_iter()
            .filter(|r| self.is_secondary_compatible(r))
            .collect()
    }

    /// Results backed by mass (and secondary coordinate) evidence alone: they match on precursor, but not on spectrum
    #[must_use]
    pub fn select_suggested_results<'r>(&self, results: &'r [MatchResult]) -> Vec<&'r MatchResult> {
        results
            .iter()
            .filter(|r| {
                r.is_precursor_mz_match() && !r.is_spectrum_match() && self.is_secondary_compatible(r)
            })
            .collect()
    }

    /// The result with the highest total score. Ties go to whichever result came first.
    #[must_use]
    pub fn select_top_hit<'r>(results: impl IntoIterator<Item = &'r MatchResult>) -> Option<&'r MatchResult> {
        results
            .into_iter()
            .reduce(|best, next| if next.total_score() > best.total_score() { next } else { best })
    }
}

// Private Functions ===================================================================================================

impl ResultAggregator<'_> {
    const fn is_secondary_compatible(&self, result: &MatchResult) -> bool {
        !self.parameters.use_secondary_coordinate_for_scoring || result.is_secondary_coordinate_match()
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::ptr;

    use reference_db::SecondaryCoordinate;

    use crate::{
        MatchValidator, ScoreCalculator, ScoringMode,
        testing_tools::{SPECTRUM, feature, record},
    };

    use super::*;

    // (precursor m/z, retention time, reference peaks) of each candidate, scored against a target at m/z 100, 5 min
    type Candidate<'a> = (f64, f64, &'a [(f64, f64)]);

    fn results(parameters: &SearchParameters, candidates: &[Candidate<'_>]) -> Vec<MatchResult> {
        let target = feature(100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);
        let calculator = ScoreCalculator::new(parameters);
        let validator = MatchValidator::new(parameters);
        candidates
            .iter()
            .zip(0..)
            .map(|(&(mz, rt, peaks), id)| {
                let candidate = record(id, mz, SecondaryCoordinate::RetentionTime(rt), peaks);
                validator.validate(calculator.calculate_score(&target, &candidate, ScoringMode::Strict))
            })
            .collect()
    }

    fn ids(results: &[&MatchResult]) -> Vec<u32> {
        results.iter().filter_map(|r| r.record_id()).map(u32::from).collect()
    }

    const CANDIDATES: &[Candidate<'static>] = &[
        // Perfect
        (100.0, 5.0, SPECTRUM),
        // Right spectrum, wrong retention time
        (100.0, 9.0, SPECTRUM),
        // Right mass and time, wrong spectrum
        (100.0, 5.0, &[(500.0, 1.0)]),
        // Slightly off mass and time
        (100.002, 5.1, SPECTRUM),
    ];

    #[test]
    fn filter_by_threshold() {
        let parameters = SearchParameters::default().use_secondary_coordinate_for_scoring(false);
        let results = results(&parameters, CANDIDATES);
        let aggregator = ResultAggregator::new(&parameters);

        // Without a secondary term, the far-off retention time doesn't matter
        assert_eq!(ids(&aggregator.filter_by_threshold(&results)), vec![0, 1, 3]);

        let strict_cutoff = parameters.total_score_cutoff(0.999);
        let aggregator = ResultAggregator::new(&strict_cutoff);
        assert_eq!(ids(&aggregator.filter_by_threshold(&results)), vec![0, 1]);
    }

    #[test]
    fn filtering_ignores_the_secondary_flag() {
        let parameters = SearchParameters::default().total_score_cutoff(0.7);
        let results = results(&parameters, CANDIDATES);
        let aggregator = ResultAggregator::new(&parameters);

        assert!(!results[1].is_secondary_coordinate_match());
        assert_eq!(ids(&aggregator.filter_by_threshold(&results)), vec![0, 1, 3]);
        assert_eq!(ids(&aggregator.select_reference_match_results(&results)), vec![0, 3]);
    }

    #[test]
    fn reference_matches_are_a_subset() {
        let base = SearchParameters::default();
        let configurations = [
            base.clone(),
            base.clone().total_score_cutoff(0.0),
            base.clone().use_secondary_coordinate_for_scoring(false),
            base.clone().use_secondary_coordinate_for_filtering(true),
            base.clone().secondary_coordinate_tolerance(0.05).total_score_cutoff(0.5),
            base.minimum_spectrum_match_count(0).matched_peaks_percentage_cutoff(0.0),
        ];

        for parameters in configurations {
            let results = results(&parameters, CANDIDATES);
            let aggregator = ResultAggregator::new(&parameters);
            let filtered = aggregator.filter_by_threshold(&results);
            for reference_match in aggregator.select_reference_match_results(&results) {
                assert!(filtered.iter().any(|r| ptr::eq(*r, reference_match)));
            }
        }
    }

    #[test]
    fn suggested_results() {
        let parameters = SearchParameters::default();
        let results = results(&parameters, CANDIDATES);
        let aggregator = ResultAggregator::new(&parameters);
        assert_eq!(ids(&aggregator.select_suggested_results(&results)), vec![2]);

        let unscored = parameters.use_secondary_coordinate_for_scoring(false);
        let results = self::results(&unscored, &[(100.0, 9.0, &[(500.0, 1.0)]), (100.5, 5.0, &[])]);
        let aggregator = ResultAggregator::new(&unscored);
        assert_eq!(ids(&aggregator.select_suggested_results(&results)), vec![0]);
    }

    #[test]
    fn top_hit_is_the_first_maximum() {
        let parameters = SearchParameters::default();
        let results = results(
            &parameters,
            &[(100.002, 5.1, SPECTRUM), (100.0, 5.0, SPECTRUM), (100.0, 5.0, SPECTRUM)],
        );

        let top_hit = ResultAggregator::select_top_hit(&results).unwrap();
        assert!(ptr::eq(top_hit, &results[1]));

        // Idempotent, down to the identity of the returned element
        let again = ResultAggregator::select_top_hit([top_hit]).unwrap();
        assert!(ptr::eq(again, top_hit));
        let again = ResultAggregator::select_top_hit(&results).unwrap();
        assert!(ptr::eq(again, top_hit));
    }

    #[test]
    fn no_top_hit_without_results() {
        let results: Vec<MatchResult> = Vec::new();
        assert!(ResultAggregator::select_top_hit(&results).is_none());
        assert!(ResultAggregator::select_top_hit(std::iter::empty()).is_none());
    }
}
