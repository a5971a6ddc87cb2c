// Local Crate Imports
use crate::{Alignment, Spectrum};

// Public API ==========================================================================================================

impl Alignment {
    /// Walks the target peaks in ascending m/z, greedily binding each one to the nearest still-unbound reference peak
    /// within `tolerance`. Ties go to the lower-m/z reference peak.
    #[must_use]
    pub fn new(target: &Spectrum, reference: &Spectrum, tolerance: f64) -> Self {
        let mut bound = vec![false; reference.len()];
        let mut pairs = Vec::new();

        for (target_index, peak) in target.iter().enumerate() {
            let distance = |reference_index: usize| (reference[reference_index].mz - peak.mz).abs();
            let nearest = reference
                .window(peak.mz, tolerance)
                .filter(|&r| !bound[r] && distance(r) <= tolerance)
                .min_by(|&a, &b| distance(a).total_cmp(&distance(b)));

            if let Some(reference_index) = nearest {
                bound[reference_index] = true;
                pairs.push((target_index, reference_index));
            }
        }

        Self(pairs)
    }

    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn target_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|&(t, _)| t)
    }
}

// Module Tests ========================================================================================================
