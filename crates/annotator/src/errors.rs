use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
pub enum FeatureError {
    #[error("a feature can have a retention time or a collision cross section, but not both")]
    #[diagnostic(help("keep whichever coordinate your reference library was built with"))]
    ConflictingSecondaryCoordinates {
        #[source_code]
        kdl: NamedSource<String>,
        #[label("retention time")]
        retention_time: SourceSpan,
        #[label("collision cross section")]
        ccs: SourceSpan,
    },

    #[error("the precursor m/z must be a positive number, but got {mz}")]
    InvalidPrecursorMz {
        #[source_code]
        kdl: NamedSource<String>,
        #[label("invalid precursor m/z")]
        span: SourceSpan,
        mz: f64,
    },

    #[error("peaks need a finite m/z and a non-negative intensity, but got ({mz}, {intensity})")]
    InvalidPeak {
        #[source_code]
        kdl: NamedSource<String>,
        #[label("invalid peak")]
        span: SourceSpan,
        mz: f64,
        intensity: f64,
    },

    #[error("isotope abundances must all be non-negative numbers")]
    InvalidIsotopePattern {
        #[source_code]
        kdl: NamedSource<String>,
        #[label("invalid isotope pattern")]
        span: SourceSpan,
    },
}
