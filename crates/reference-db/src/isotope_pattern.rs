// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::IsotopePattern;

// Public API ==========================================================================================================

impl IsotopePattern {
    #[must_use]
    pub fn new(abundances: impl IntoIterator<Item = f64>) -> Self {
        Self(abundances.into_iter().collect())
    }

    #[must_use]
    pub fn abundances(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(|a| a.is_finite() && *a >= 0.0)
    }

    /// `1 - mean(|a_i - b_i|)` over the isotopologues present in both patterns, floored at zero. Patterns sharing no
    /// positions at all have nothing in common, so they score zero.
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f64 {
        let differences = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b).abs())
            .collect_vec();

        if differences.is_empty() {
            return 0.0;
        }

        let mean_difference = differences.iter().sum::<f64>() / differences.len() as f64;
        let similarity = 1.0 - mean_difference;
        if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;

    use super::*;

    #[test]
    fn identical_patterns() {
        let caffeine = IsotopePattern::new([0.0977, 0.0113]);
        assert_float_absolute_eq!(caffeine.similarity(&caffeine), 1.0);
        assert_eq!(caffeine.abundances(), &[0.0977, 0.0113]);
    }

    #[test]
    fn only_shared_positions_are_compared() {
        let short = IsotopePattern::new([0.1]);
        let long = IsotopePattern::new([0.3, 0.9]);
        assert_float_absolute_eq!(short.similarity(&long), 0.8);
        assert_float_absolute_eq!(long.similarity(&short), 0.8);
    }

    #[test]
    fn mean_absolute_difference() {
        let observed = IsotopePattern::new([0.10, 0.02, 0.005]);
        let reference = IsotopePattern::new([0.12, 0.01, 0.005]);
        assert_float_absolute_eq!(observed.similarity(&reference), 0.99);
    }

    #[test]
    fn similarity_is_floored_at_zero() {
        let observed = IsotopePattern::new([3.0]);
        let reference = IsotopePattern::new([0.5]);
        assert_float_absolute_eq!(observed.similarity(&reference), 0.0);
    }

    #[test]
    fn empty_patterns_share_nothing() {
        let empty = IsotopePattern::default();
        assert_float_absolute_eq!(empty.similarity(&IsotopePattern::new([0.1])), 0.0);
        assert_float_absolute_eq!(empty.similarity(&empty), 0.0);
    }

    #[test]
    fn well_formed_patterns() {
        assert!(IsotopePattern::new([0.1, 0.0]).is_well_formed());
        assert!(!IsotopePattern::new([0.1, -0.2]).is_well_formed());
        assert!(!IsotopePattern::new([f64::NAN]).is_well_formed());
    }
}
