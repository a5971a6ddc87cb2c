// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{
    Decode,
    span::{Span, Spanned},
};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use spectral_similarity::{Peak, Spectrum};
use thiserror::Error;
use tracing::debug;

// Local Crate Imports
use crate::{
    Identity, IsotopePattern, RecordId, ReferenceDatabase, ReferenceRecord, SecondaryCoordinate,
    SecondaryKind,
};

// Public API ==========================================================================================================

impl ReferenceDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_library: ReferenceLibraryKdl =
            knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let records = parsed_library
            .validate(())
            .map_err(|e| e.finalize(file_name.as_ref(), kdl_text.as_ref()))?;

        debug!(
            file_name = file_name.as_ref(),
            records = records.len(),
            "loaded reference library"
        );
        Ok(Self::new(records)?)
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ReferenceLibraryKdl {
    #[knuffel(children(name = "compound"))]
    compounds: Vec<CompoundKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct CompoundKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    id: u32,
    #[knuffel(argument)]
    name: String,
    #[knuffel(child, unwrap(argument))]
    inchikey: Option<String>,
    #[knuffel(child, unwrap(argument))]
    formula: Option<String>,
    #[knuffel(child, unwrap(argument))]
    adduct: Option<String>,
    #[knuffel(child, unwrap(argument))]
    ontology: Option<String>,
    #[knuffel(child, unwrap(argument))]
    precursor_mz: Spanned<f64, Span>,
    #[knuffel(child, unwrap(argument))]
    retention_time: Option<Spanned<f64, Span>>,
    #[knuffel(child, unwrap(argument))]
    ccs: Option<Spanned<f64, Span>>,
    #[knuffel(child)]
    isotope: Option<IsotopeKdl>,
    #[knuffel(children(name = "peak"))]
    peaks: Vec<PeakKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct IsotopeKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(arguments)]
    abundances: Vec<f64>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct PeakKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    mz: f64,
    #[knuffel(argument)]
    intensity: f64,
}

// Contextual Validation Trait  ========================================================================================

type LibraryResult<T> = std::result::Result<T, LibraryErrorKind>;

trait ValidateInto<'c, T> {
    type Context: 'c;

    fn validate(self, ctx: Self::Context) -> LibraryResult<T>;
}

// Reference Library Validation ========================================================================================

impl ValidateInto<'_, Vec<ReferenceRecord>> for ReferenceLibraryKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> LibraryResult<Vec<ReferenceRecord>> {
        let mut seen_ids = HashMap::with_capacity(self.compounds.len());
        let mut first_secondary: Option<(SecondaryKind, Span)> = None;
        let mut records = Vec::with_capacity(self.compounds.len());

        for compound in self.compounds {
            match seen_ids.entry(compound.id) {
                Entry::Occupied(e) => {
                    let (id, first_defined_at) = e.remove_entry();
                    return Err(LibraryErrorKind::DuplicateRecordId(
                        first_defined_at,
                        compound.span,
                        id,
                    ));
                }
                Entry::Vacant(e) => e.insert(compound.span),
            };

            let (record, secondary_span) = compound.validate(())?;

            if let (Some(found), Some(span)) = (record.secondary().kind(), secondary_span) {
                match first_secondary {
                    Some((expected, first_span)) if expected != found => {
                        return Err(LibraryErrorKind::MixedSecondaryKinds(
                            first_span, span, expected, found,
                        ));
                    }
                    None => first_secondary = Some((found, span)),
                    Some(_) => (),
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}

// Validate Compounds ==================================================================================================

type CompoundEntry = (ReferenceRecord, Option<Span>);

impl ValidateInto<'_, CompoundEntry> for CompoundKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> LibraryResult<CompoundEntry> {
        let precursor_mz = *self.precursor_mz;
        if !precursor_mz.is_finite() || precursor_mz <= 0.0 {
            return Err(LibraryErrorKind::InvalidPrecursorMz(
                *self.precursor_mz.span(),
                precursor_mz,
            ));
        }

        let (secondary, secondary_span) = match (self.retention_time, self.ccs) {
            (Some(rt), Some(ccs)) => {
                return Err(LibraryErrorKind::ConflictingSecondaryCoordinates(
                    *rt.span(),
                    *ccs.span(),
                ));
            }
            (Some(rt), None) => (SecondaryCoordinate::RetentionTime(*rt), Some(*rt.span())),
            (None, Some(ccs)) => (
                SecondaryCoordinate::CollisionCrossSection(*ccs),
                Some(*ccs.span()),
            ),
            (None, None) => (SecondaryCoordinate::None, None),
        };

        let spectrum: Spectrum = self
            .peaks
            .into_iter()
            .map(|p| p.validate(()))
            .collect::<LibraryResult<_>>()?;

        let identity = Identity {
            name: self.name,
            inchikey: self.inchikey,
            formula: self.formula,
            adduct: self.adduct,
            ontology: self.ontology,
        };

        let mut record = ReferenceRecord::new(RecordId::from(self.id), identity, precursor_mz)
            .with_secondary(secondary)
            .with_spectrum(spectrum);
        if let Some(isotope) = self.isotope {
            record = record.with_isotopes(isotope.validate(())?);
        }

        Ok((record, secondary_span))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl ValidateInto<'_, Peak> for PeakKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> LibraryResult<Peak> {
        let peak = Peak::new(self.mz, self.intensity);
        if peak.is_well_formed() {
            Ok(peak)
        } else {
            Err(LibraryErrorKind::InvalidPeak(self.span, self.mz, self.intensity))
        }
    }
}

impl ValidateInto<'_, IsotopePattern> for IsotopeKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> LibraryResult<IsotopePattern> {
        let pattern = IsotopePattern::new(self.abundances);
        if pattern.is_well_formed() {
            Ok(pattern)
        } else {
            Err(LibraryErrorKind::InvalidIsotopePattern(self.span))
        }
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate reference library file")]
struct LibraryError {
    kdl: NamedSource<String>,
    #[source]
    kind: LibraryErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for LibraryError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum LibraryErrorKind {
    #[error("the record id {2} has already been used")]
    #[diagnostic(help("every compound needs its own id, consider renumbering one of them"))]
    DuplicateRecordId(Span, Span, u32),

    #[error("a compound can have a retention time or a collision cross section, but not both")]
    #[diagnostic(help("remove whichever coordinate doesn't belong to this library"))]
    ConflictingSecondaryCoordinates(Span, Span),

    #[error("this compound has a {3}, but earlier compounds used a {2}")]
    #[diagnostic(help("a single library must stick to one kind of secondary coordinate"))]
    MixedSecondaryKinds(Span, Span, SecondaryKind, SecondaryKind),

    #[error("the precursor m/z must be a positive number, but got {1}")]
    InvalidPrecursorMz(Span, f64),

    #[error("peaks need a finite m/z and a non-negative intensity, but got ({1}, {2})")]
    InvalidPeak(Span, f64, f64),

    #[error("isotope abundances must all be non-negative numbers")]
    InvalidIsotopePattern(Span),
}

impl LibraryErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateRecordId(s1, s2, _) => {
                vec![(s1, "first used here"), (s2, "then again here")]
            }
            Self::ConflictingSecondaryCoordinates(s1, s2) => {
                vec![(s1, "retention time"), (s2, "collision cross section")]
            }
            Self::MixedSecondaryKinds(s1, s2, _, _) => {
                vec![(s1, "first coordinate kind"), (s2, "conflicting kind")]
            }
            Self::InvalidPrecursorMz(s, _) => vec![(s, "invalid precursor m/z")],
            Self::InvalidPeak(s, _, _) => vec![(s, "invalid peak")],
            Self::InvalidIsotopePattern(s) => vec![(s, "invalid isotope pattern")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> LibraryError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        LibraryError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
