// Standard Library Imports
use std::ptr;

// External Crate Imports
use rayon::prelude::*;
use reference_db::{ReferenceDatabase, ReferenceRecord};
use tracing::{debug, trace};

// Local Crate Imports
use crate::{
    AnnotationEngine, CandidateFilter, Classification, MatchResult, MatchValidator, PeakFeature,
    ResultAggregator, ScoreCalculator, ScoringMode, SearchParameters,
};

// Public API ==========================================================================================================

impl<'db> AnnotationEngine<'db> {
    #[must_use]
    pub const fn new(database: &'db ReferenceDatabase, parameters: SearchParameters) -> Self {
        Self {
            database,
            parameters,
        }
    }

    #[must_use]
    pub const fn database(&self) -> &'db ReferenceDatabase {
        self.database
    }

    #[must_use]
    pub const fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// The unscored candidates for `target`, for browsing
    #[must_use]
    pub fn search(&self, target: &PeakFeature) -> Vec<&'db ReferenceRecord> {
        CandidateFilter::new(&self.parameters).find_candidates(target, self.database)
    }

    /// Every candidate for `target`, scored in `mode` and validated, from the highest total score to the lowest
    #[must_use]
    pub fn score_candidates(&self, target: &PeakFeature, mode: ScoringMode) -> Vec<MatchResult> {
        let mut results = self.score_all(&self.search(target), target, mode);
        results.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));
        results
    }

    /// Resolves `target` to its best reference match, falling back to a mass-only suggestion, and finally to an
    /// [`Classification::Unknown`] result
    #[must_use]
    #[tracing::instrument(level = "trace", skip_all, fields(precursor_mz = target.precursor_mz))]
    pub fn annotate(&self, target: &PeakFeature) -> MatchResult {
        let candidates = self.search(target);
        if candidates.is_empty() {
            trace!("no candidates to score");
            return MatchResult::unknown();
        }

        let aggregator = ResultAggregator::new(&self.parameters);

        let strict_results = self.score_all(&candidates, target, ScoringMode::Strict);
        let reference_matches = aggregator.select_reference_match_results(&strict_results);
        if let Some(top_hit) =
            ResultAggregator::select_top_hit(aggregator.filter_by_threshold(&strict_results))
        {
            // NOTE: Membership is checked by identity, since two candidates can produce equal results
            if reference_matches.iter().any(|&r| ptr::eq(r, top_hit)) {
                trace!(id = ?top_hit.record_id(), "reference matched");
                return top_hit.clone().with_classification(Classification::ReferenceMatched);
            }
        }

        let soft_results = self.score_all(&candidates, target, ScoringMode::Soft);
        ResultAggregator::select_top_hit(aggregator.select_suggested_results(&soft_results)).map_or_else(
            || {
                trace!("no reference match or suggestion");
                MatchResult::unknown()
            },
            |suggestion| {
                trace!(id = ?suggestion.record_id(), "suggested");
                suggestion.clone().with_classification(Classification::Suggested)
            },
        )
    }

    /// Annotates every feature in `targets` in parallel, returning results in the same order
    #[must_use]
    pub fn annotate_all(&self, targets: &[PeakFeature]) -> Vec<MatchResult> {
        let results: Vec<_> = targets.par_iter().map(|target| self.annotate(target)).collect();

        let resolved = results.iter().filter(|r| !r.classification().is_unknown()).count();
        debug!(features = targets.len(), resolved, "annotated peak features");
        results
    }

    /// Looks up the reference record behind `result`. This is `None` for unknown results, or when the record no longer
    /// exists in this engine's database.
    #[must_use]
    pub fn refer(&self, result: &MatchResult) -> Option<&'db ReferenceRecord> {
        let record = self.database.get(result.record_id()?)?;
        // NOTE: An id reused by a different compound (say, after swapping databases) doesn't count as a match
        (Some(record.identity()) == result.identity()).then_some(record)
    }
}

// Private Functions ===================================================================================================

impl AnnotationEngine<'_> {
    fn score_all(
        &self,
        candidates: &[&ReferenceRecord],
        target: &PeakFeature,
        mode: ScoringMode,
    ) -> Vec<MatchResult> {
        let calculator = ScoreCalculator::new(&self.parameters);
        let validator = MatchValidator::new(&self.parameters);
        candidates
            .iter()
            .map(|candidate| validator.validate(calculator.calculate_score(target, candidate, mode)))
            .collect()
    }
}

// Module Tests ========================================================================================================
