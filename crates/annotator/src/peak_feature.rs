// External Crate Imports
use knuffel::{
    Decode,
    span::{Span, Spanned},
};
use miette::{NamedSource, Result};
use reference_db::{IsotopePattern, SecondaryCoordinate};
use spectral_similarity::{Peak, Spectrum};
use tracing::debug;

// Local Crate Imports
use crate::{FeatureError, PeakFeature};

// Public API ==========================================================================================================

impl PeakFeature {
    #[must_use]
    pub fn new(precursor_mz: f64) -> Self {
        Self {
            precursor_mz,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_secondary(self, secondary: SecondaryCoordinate) -> Self {
        Self { secondary, ..self }
    }

    #[must_use]
    pub fn with_spectrum(self, spectrum: impl Into<Spectrum>) -> Self {
        Self {
            spectrum: spectrum.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_isotopes(self, isotopes: impl Into<IsotopePattern>) -> Self {
        Self {
            isotopes: Some(isotopes.into()),
            ..self
        }
    }

    /// Features with a non-positive precursor, non-finite coordinates, or malformed peaks are never annotated
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let secondary_is_finite = self.secondary.value().is_none_or(f64::is_finite);
        let isotopes_are_valid = self.isotopes.as_ref().is_none_or(IsotopePattern::is_well_formed);

        self.precursor_mz.is_finite()
            && self.precursor_mz > 0.0
            && secondary_is_finite
            && isotopes_are_valid
            && self.spectrum.is_well_formed()
    }

    /// Reads every `feature` node from a KDL document
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Vec<Self>> {
        let parsed: FeaturesKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let features = parsed
            .features
            .into_iter()
            .map(FeatureKdl::validate)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.finalize(file_name.as_ref(), kdl_text.as_ref()))?;

        debug!(file_name = file_name.as_ref(), features = features.len(), "read peak features");
        Ok(features)
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct FeaturesKdl {
    #[knuffel(children(name = "feature"))]
    features: Vec<FeatureKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct FeatureKdl {
    #[knuffel(argument)]
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

// Feature Validation ==================================================================================================

impl FeatureKdl {
    fn validate(self) -> std::result::Result<PeakFeature, FeatureErrorKind> {
        let precursor_mz = *self.precursor_mz;
        if !precursor_mz.is_finite() || precursor_mz <= 0.0 {
            return Err(FeatureErrorKind::InvalidPrecursorMz(
                *self.precursor_mz.span(),
                precursor_mz,
            ));
        }

        let secondary = match (self.retention_time, self.ccs) {
            (Some(rt), Some(ccs)) => {
                return Err(FeatureErrorKind::ConflictingSecondaryCoordinates(
                    *rt.span(),
                    *ccs.span(),
                ));
            }
            (Some(rt), None) => SecondaryCoordinate::RetentionTime(*rt),
            (None, Some(ccs)) => SecondaryCoordinate::CollisionCrossSection(*ccs),
            (None, None) => SecondaryCoordinate::None,
        };

        let spectrum: Spectrum = self
            .peaks
            .into_iter()
            .map(|p| {
                let peak = Peak::new(p.mz, p.intensity);
                if peak.is_well_formed() {
                    Ok(peak)
                } else {
                    Err(FeatureErrorKind::InvalidPeak(p.span, p.mz, p.intensity))
                }
            })
            .collect::<std::result::Result<_, _>>()?;

        let mut feature = PeakFeature::new(precursor_mz)
            .with_secondary(secondary)
            .with_spectrum(spectrum);
        if let Some(isotope) = self.isotope {
            let pattern = IsotopePattern::new(isotope.abundances);
            if !pattern.is_well_formed() {
                return Err(FeatureErrorKind::InvalidIsotopePattern(isotope.span));
            }
            feature = feature.with_isotopes(pattern);
        }

        Ok(feature)
    }
}

#[derive(Copy, Clone, Debug)]
enum FeatureErrorKind {
    ConflictingSecondaryCoordinates(Span, Span),
    InvalidPrecursorMz(Span, f64),
    InvalidPeak(Span, f64, f64),
    InvalidIsotopePattern(Span),
}

impl FeatureErrorKind {
    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> FeatureError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        match self {
            Self::ConflictingSecondaryCoordinates(rt, ccs) => {
                FeatureError::ConflictingSecondaryCoordinates {
                    kdl,
                    retention_time: rt.into(),
                    ccs: ccs.into(),
                }
            }
            Self::InvalidPrecursorMz(span, mz) => FeatureError::InvalidPrecursorMz {
                kdl,
                span: span.into(),
                mz,
            },
            Self::InvalidPeak(span, mz, intensity) => FeatureError::InvalidPeak {
                kdl,
                span: span.into(),
                mz,
                intensity,
            },
            Self::InvalidIsotopePattern(span) => FeatureError::InvalidIsotopePattern {
                kdl,
                span: span.into(),
            },
        }
    }
}

// Module Tests ========================================================================================================
