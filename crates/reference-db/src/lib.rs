//! An immutable, precursor-indexed library of reference compounds and their MS2 spectra

mod database;
mod errors;
mod isotope_pattern;
mod kdl;
mod record;
mod record_key;
mod secondary_coordinate;
#[cfg(test)]
mod testing_tools;

// Standard Library Imports
use std::collections::BTreeMap;

// External Crate Imports
use ahash::HashMap;
use derive_more::{Display, From, Into, IsVariant};
use serde::{Deserialize, Serialize};
use spectral_similarity::Spectrum;

// Local Crate Imports
use crate::record_key::RecordKey;

pub use errors::DatabaseError;

// Public API ==========================================================================================================

/// A small reference library shipped with the crate, handy for demos and smoke tests
pub const DEFAULT_KDL: &str = include_str!("../data/reference_library.kdl");

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Into)]
#[derive(Serialize, Deserialize)]
pub struct RecordId(u32);

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub inchikey: Option<String>,
    pub formula: Option<String>,
    pub adduct: Option<String>,
    pub ontology: Option<String>,
}

/// An orthogonal separation dimension, used to tell isobaric compounds apart
#[derive(Copy, Clone, PartialEq, Debug, Default, IsVariant, Serialize, Deserialize)]
pub enum SecondaryCoordinate {
    #[default]
    None,
    /// In minutes
    RetentionTime(f64),
    /// In Å²
    CollisionCrossSection(f64),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Serialize, Deserialize)]
pub enum SecondaryKind {
    #[display("retention time")]
    RetentionTime,
    #[display("collision cross section")]
    CollisionCrossSection,
}

/// Relative abundances of the M+1, M+2, … isotopologues, with the monoisotopic peak taken as `1.0`
#[derive(Clone, PartialEq, Debug, Default, From, Serialize, Deserialize)]
pub struct IsotopePattern(Vec<f64>);

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ReferenceRecord {
    id: RecordId,
    identity: Identity,
    precursor_mz: f64,
    secondary: SecondaryCoordinate,
    spectrum: Spectrum,
    isotopes: Option<IsotopePattern>,
}

// NOTE: Records are only ever handed out by shared reference, so the database is immutable once built and can be read
// from any number of threads at once
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ReferenceDatabase {
    records: Vec<ReferenceRecord>,
    by_precursor: BTreeMap<RecordKey, usize>,
    by_id: HashMap<RecordId, usize>,
    secondary_kind: Option<SecondaryKind>,
}
