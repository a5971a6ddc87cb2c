// Standard Library Imports
use std::ops::RangeInclusive;

// External Crate Imports
use ordered_float::OrderedFloat;

// Local Crate Imports
use crate::RecordId;

// Public API ==========================================================================================================

pub type Mz = OrderedFloat<f64>;

// NOTE: The `id` breaks ties between records sharing a precursor m/z, so no two keys ever collide
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RecordKey {
    pub precursor: Mz,
    pub id: RecordId,
}

impl RecordKey {
    pub fn new(precursor: f64, id: RecordId) -> Self {
        Self {
            precursor: Mz::from(precursor),
            id,
        }
    }

    /// Every key with a precursor in `[mz - tolerance, mz + tolerance]`. This is `None` when that window is empty,
    /// since `BTreeMap::range()` panics when handed a start bound past its end bound.
    pub fn tolerance_window(mz: f64, tolerance: f64) -> Option<RangeInclusive<Self>> {
        let start = Self::new(mz - tolerance, RecordId::from(u32::MIN));
        let end = Self::new(mz + tolerance, RecordId::from(u32::MAX));
        (start <= end).then_some(start..=end)
    }
}

// Module Tests ========================================================================================================
