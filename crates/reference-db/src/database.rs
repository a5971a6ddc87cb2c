// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use tracing::debug;

// Local Crate Imports
use crate::{
    DatabaseError, RecordId, ReferenceDatabase, ReferenceRecord, SecondaryKind,
    record_key::RecordKey,
};

// Public API ==========================================================================================================

impl ReferenceDatabase {
    /// Indexes `records` by precursor m/z and id. Fails if two records share an id, or if the records mix retention
    /// times and collision cross sections.
    pub fn new(records: impl IntoIterator<Item = ReferenceRecord>) -> Result<Self, DatabaseError> {
        let records: Vec<_> = records.into_iter().collect();

        let mut by_id = HashMap::with_capacity(records.len());
        let mut secondary_kind: Option<SecondaryKind> = None;
        for (index, record) in records.iter().enumerate() {
            match by_id.entry(record.id()) {
                Entry::Occupied(_) => return Err(DatabaseError::duplicate_record_id(record.id())),
                Entry::Vacant(e) => e.insert(index),
            };

            if let Some(found) = record.secondary().kind() {
                match secondary_kind {
                    Some(expected) if expected != found => {
                        return Err(DatabaseError::mixed_secondary_kinds(
                            record.id(),
                            expected,
                            found,
                        ));
                    }
                    _ => secondary_kind = Some(found),
                }
            }
        }

        let by_precursor = records
            .iter()
            .enumerate()
            .map(|(index, record)| (RecordKey::new(record.precursor_mz(), record.id()), index))
            .collect();

        debug!(records = records.len(), ?secondary_kind, "built reference database");

        Ok(Self {
            records,
            by_precursor,
            by_id,
            secondary_kind,
        })
    }

    /// Every record whose precursor m/z lies within `tolerance` of `mz`, in ascending m/z order. A negative (or NaN)
    /// tolerance matches nothing.
    pub fn precursor_window(
        &self,
        mz: f64,
        tolerance: f64,
    ) -> impl Iterator<Item = &ReferenceRecord> + '_ {
        RecordKey::tolerance_window(mz, tolerance)
            .into_iter()
            .flat_map(move |window| self.by_precursor.range(window))
            .map(move |(_, &index)| &self.records[index])
            // NOTE: The key window is computed as `mz ± tolerance`, which can round differently from `|Δm/z|`
            .filter(move |record| (record.precursor_mz() - mz).abs() <= tolerance)
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&ReferenceRecord> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The kind of secondary coordinate carried by this database's records, if any of them carry one
    #[must_use]
    pub const fn secondary_kind(&self) -> Option<SecondaryKind> {
        self.secondary_kind
    }
}

impl<'d> IntoIterator for &'d ReferenceDatabase {
    type Item = &'d ReferenceRecord;
    type IntoIter = std::slice::Iter<'d, ReferenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Module Tests ========================================================================================================
