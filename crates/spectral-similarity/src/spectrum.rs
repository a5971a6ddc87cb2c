// Standard Library Imports
use std::ops::{Index, Range};

// Local Crate Imports
use crate::{Peak, Spectrum};

// Public API ==========================================================================================================

impl Spectrum {
    pub fn new(peaks: impl IntoIterator<Item = impl Into<Peak>>) -> Self {
        let mut peaks: Vec<Peak> = peaks.into_iter().map(Into::into).collect();
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self(peaks)
    }

    #[must_use]
    pub fn peaks(&self) -> &[Peak] {
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

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(Peak::is_well_formed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peak> {
        self.0.iter()
    }
}

impl Index<usize> for Spectrum {
    type Output = Peak;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Peak>> for Spectrum {
    fn from(peaks: Vec<Peak>) -> Self {
        Self::new(peaks)
    }
}

impl<P: Into<Peak>> FromIterator<P> for Spectrum {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'s> IntoIterator for &'s Spectrum {
    type Item = &'s Peak;
    type IntoIter = std::slice::Iter<'s, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Crate-Private API ===================================================================================================

impl Spectrum {
    // NOTE: The returned range may over-select by a floating-point hair at either edge, so callers still need to check
    // the exact `|Δm/z| <= tolerance` condition themselves. A negative tolerance yields an empty range.
    pub(crate) fn window(&self, mz: f64, tolerance: f64) -> Range<usize> {
        let start = self.0.partition_point(|peak| peak.mz < mz - tolerance);
        let end = self.0.partition_point(|peak| peak.mz <= mz + tolerance);
        start..end.max(start)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_new_sorts_by_mz() {
        let spectrum = Spectrum::new([(300.0, 1.0), (100.0, 2.0), (200.0, 3.0)]);
        let mzs: Vec<_> = spectrum.iter().map(|peak| peak.mz).collect();
        assert_eq!(mzs, vec![100.0, 200.0, 300.0]);
        assert_eq!(spectrum[0], Peak::new(100.0, 2.0));
        assert_eq!(spectrum.len(), 3);
        assert!(!spectrum.is_empty());
    }

    #[test]
    fn spectrum_collects_from_peaks_and_tuples() {
        let from_tuples: Spectrum = [(200.0, 5.0), (100.0, 10.0)].into_iter().collect();
        let from_peaks: Spectrum = [Peak::new(100.0, 10.0), Peak::new(200.0, 5.0)]
            .into_iter()
            .collect();
        assert_eq!(from_tuples, from_peaks);
        assert_eq!(Spectrum::from(vec![Peak::new(200.0, 5.0), Peak::new(100.0, 10.0)]), from_peaks);
    }

    #[test]
    fn spectrum_is_well_formed() {
        assert!(Spectrum::default().is_well_formed());
        assert!(Spectrum::new([(100.0, 1.0)]).is_well_formed());
        assert!(!Spectrum::new([(100.0, 1.0), (101.0, -3.0)]).is_well_formed());
    }

    #[test]
    fn spectrum_window() {
        let spectrum = Spectrum::new([(99.0, 1.0), (99.9, 1.0), (100.0, 1.0), (100.05, 1.0), (101.0, 1.0)]);
        assert_eq!(spectrum.window(100.0, 0.5), 1..4);
        assert_eq!(spectrum.window(100.0, 0.0), 2..3);
        assert_eq!(spectrum.window(100.0, 5.0), 0..5);
        assert_eq!(spectrum.window(150.0, 1.0), 5..5);
        assert!(spectrum.window(100.0, -1.0).is_empty());
    }
}
