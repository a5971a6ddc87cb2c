use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::{Identity, RecordId, ReferenceRecord};

pub fn record_at(id: u32, precursor_mz: f64) -> ReferenceRecord {
    ReferenceRecord::new(RecordId::from(id), Identity::new(format!("Compound {id}")), precursor_mz)
}

pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(120)
        .render_report(&mut out, diagnostic)
        .unwrap();
    out
}
