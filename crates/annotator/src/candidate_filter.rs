// External Crate Imports
use reference_db::{ReferenceDatabase, ReferenceRecord};
use tracing::{debug, warn};

// Local Crate Imports
use crate::{CandidateFilter, PeakFeature, SearchParameters};

// Public API ==========================================================================================================

impl<'p> CandidateFilter<'p> {
    #[must_use]
    pub const fn new(parameters: &'p SearchParameters) -> Self {
        Self { parameters }
    }

    /// Every reference record within the MS1 tolerance of `target`, in ascending precursor m/z order. When secondary
    /// filtering is enabled and `target` carries a coordinate, candidates must also carry a comparable coordinate
    /// within the secondary tolerance.
    #[must_use]
    pub fn find_candidates<'db>(
        &self,
        target: &PeakFeature,
        database: &'db ReferenceDatabase,
    ) -> Vec<&'db ReferenceRecord> {
        if target.spectrum.is_empty() {
            return Vec::new();
        }
        if !target.is_well_formed() {
            warn!(precursor_mz = target.precursor_mz, "skipping a malformed peak feature");
            return Vec::new();
        }

        let filter_secondary =
            self.parameters.use_secondary_coordinate_for_filtering && target.secondary.value().is_some();

        let candidates: Vec<_> = database
            .precursor_window(target.precursor_mz, self.parameters.ms1_tolerance)
            .filter(|candidate| {
                if candidate.is_well_formed() {
                    true
                } else {
                    warn!(id = %candidate.id(), "skipping a malformed reference record");
                    false
                }
            })
            .filter(|candidate| !filter_secondary || self.secondary_matches(target, candidate))
            .collect();

        debug!(
            precursor_mz = target.precursor_mz,
            candidates = candidates.len(),
            "found candidates"
        );
        candidates
    }
}

// Private Functions ===================================================================================================

impl CandidateFilter<'_> {
    fn secondary_matches(&self, target: &PeakFeature, candidate: &ReferenceRecord) -> bool {
        target
            .secondary
            .difference(&candidate.secondary())
            .is_some_and(|difference| difference.abs() <= self.parameters.secondary_coordinate_tolerance)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use reference_db::{Identity, RecordId, SecondaryCoordinate};
    use spectral_similarity::Peak;

    use crate::testing_tools::{SPECTRUM, feature, isobaric_database, record};

    use super::*;

    fn ids(candidates: &[&ReferenceRecord]) -> Vec<u32> {
        candidates.iter().map(|c| c.id().into()).collect()
    }

    #[test]
    fn precursor_window_only() {
        let db = isobaric_database();
        let parameters = SearchParameters::default();
        let filter = CandidateFilter::new(&parameters);

        let target = feature(100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![0, 1, 4, 2]);

        let target = feature(99.9, SecondaryCoordinate::None, SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![3]);

        let target = feature(250.0, SecondaryCoordinate::None, SPECTRUM);
        assert!(filter.find_candidates(&target, &db).is_empty());
    }

    #[test]
    fn secondary_filtering() {
        let db = isobaric_database();
        let parameters = SearchParameters::default().use_secondary_coordinate_for_filtering(true);
        let filter = CandidateFilter::new(&parameters);

        let target = feature(100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![0, 1, 2]);

        let target = feature(100.0, SecondaryCoordinate::RetentionTime(8.1), SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![4]);

        // Targets without a coordinate aren't filtered on one
        let target = feature(100.0, SecondaryCoordinate::None, SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![0, 1, 4, 2]);

        // But targets with an incomparable coordinate exclude everything
        let target = feature(100.0, SecondaryCoordinate::CollisionCrossSection(5.0), SPECTRUM);
        assert!(filter.find_candidates(&target, &db).is_empty());
    }

    #[test]
    fn candidates_without_coordinates_are_filtered_out() {
        let db = ReferenceDatabase::new([
            record(1, 100.0, SecondaryCoordinate::None, SPECTRUM),
            record(2, 100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM),
        ])
        .unwrap();
        let target = feature(100.0, SecondaryCoordinate::RetentionTime(5.0), SPECTRUM);

        let parameters = SearchParameters::default().use_secondary_coordinate_for_filtering(true);
        assert_eq!(ids(&CandidateFilter::new(&parameters).find_candidates(&target, &db)), vec![2]);

        let parameters = SearchParameters::default();
        assert_eq!(ids(&CandidateFilter::new(&parameters).find_candidates(&target, &db)), vec![1, 2]);
    }

    #[test]
    fn precursor_outside_tolerance_is_always_excluded() {
        let db = isobaric_database();
        let parameters = SearchParameters::default();
        let filter = CandidateFilter::new(&parameters);

        for mz in [99.95, 100.02, 99.98, 100.0] {
            let target = feature(mz, SecondaryCoordinate::None, SPECTRUM);
            for candidate in filter.find_candidates(&target, &db) {
                assert!((candidate.precursor_mz() - mz).abs() <= parameters.ms1_tolerance);
            }
        }
    }

    #[test]
    fn empty_inputs() {
        let parameters = SearchParameters::default();
        let filter = CandidateFilter::new(&parameters);

        let empty_db = ReferenceDatabase::default();
        let target = feature(100.0, SecondaryCoordinate::None, SPECTRUM);
        assert!(filter.find_candidates(&target, &empty_db).is_empty());

        let db = isobaric_database();
        let no_spectrum = feature(100.0, SecondaryCoordinate::None, &[]);
        assert!(filter.find_candidates(&no_spectrum, &db).is_empty());
    }

    #[test]
    fn malformed_inputs_are_skipped() {
        let parameters = SearchParameters::default();
        let filter = CandidateFilter::new(&parameters);

        let db = ReferenceDatabase::new([
            record(1, 100.0, SecondaryCoordinate::None, SPECTRUM),
            ReferenceRecord::new(RecordId::from(2), Identity::new("Broken"), 100.0)
                .with_spectrum(vec![Peak::new(100.0, f64::NAN)]),
        ])
        .unwrap();

        let target = feature(100.0, SecondaryCoordinate::None, SPECTRUM);
        assert_eq!(ids(&filter.find_candidates(&target, &db)), vec![1]);

        let malformed = feature(100.0, SecondaryCoordinate::RetentionTime(f64::NAN), SPECTRUM);
        assert!(filter.find_candidates(&malformed, &db).is_empty());
    }

    #[test]
    fn degenerate_tolerances() {
        let db = isobaric_database();
        let target = feature(100.0, SecondaryCoordinate::None, SPECTRUM);

        let exact = SearchParameters::default().ms1_tolerance(0.0);
        assert_eq!(ids(&CandidateFilter::new(&exact).find_candidates(&target, &db)), vec![1, 4]);

        let negative = SearchParameters::default().ms1_tolerance(-0.01);
        assert!(CandidateFilter::new(&negative).find_candidates(&target, &db).is_empty());
    }
}
