use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use reference_db::{Identity, RecordId, ReferenceDatabase, ReferenceRecord, SecondaryCoordinate};
use spectral_similarity::Spectrum;

use crate::PeakFeature;

/// A four-peak MS2 spectrum shared by targets and references that are meant to match perfectly
pub const SPECTRUM: &[(f64, f64)] = &[
    (85.0284, 12.0),
    (109.0396, 35.0),
    (150.0550, 100.0),
    (167.0815, 48.0),
];

pub fn feature(precursor_mz: f64, secondary: SecondaryCoordinate, peaks: &[(f64, f64)]) -> PeakFeature {
    PeakFeature::new(precursor_mz)
        .with_secondary(secondary)
        .with_spectrum(Spectrum::new(peaks.iter().copied()))
}

pub fn record(
    id: u32,
    precursor_mz: f64,
    secondary: SecondaryCoordinate,
    peaks: &[(f64, f64)],
) -> ReferenceRecord {
    ReferenceRecord::new(RecordId::from(id), Identity::new(format!("Compound {id}")), precursor_mz)
        .with_secondary(secondary)
        .with_spectrum(Spectrum::new(peaks.iter().copied()))
}

/// Five records, ids `0..5`, clustered around m/z 100 with distinct retention times. Records 1 and 4 share a precursor,
/// but only record 1 elutes at 5.0 minutes.
pub fn isobaric_database() -> ReferenceDatabase {
    let rt = SecondaryCoordinate::RetentionTime;
    ReferenceDatabase::new([
        record(0, 99.991, rt(4.8), SPECTRUM),
        record(1, 100.000, rt(5.0), SPECTRUM),
        record(2, 100.009, rt(5.2), SPECTRUM),
        record(3, 99.900, rt(5.1), SPECTRUM),
        record(4, 100.000, rt(8.0), SPECTRUM),
    ])
    .unwrap()
}

pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(120)
        .render_report(&mut out, diagnostic)
        .unwrap();
    out
}
