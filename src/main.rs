use std::{env, fmt::Write, fs};

use annotator::{AnnotationEngine, MatchResult, PeakFeature, ScoringMode, SearchParameters};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Result};
use reference_db::{DEFAULT_KDL, ReferenceDatabase};
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

// NOTE: Usage is `metannotate [LIBRARY.kdl [PARAMETERS.kdl]]`, falling back to the bundled library and default
// parameters. Set `RUST_LOG=debug` (or `trace`) to watch the engine work.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let database = match args.next() {
        Some(path) => ReferenceDatabase::from_kdl(&path, fs::read_to_string(&path).into_diagnostic()?)?,
        None => ReferenceDatabase::from_kdl("reference_library.kdl", DEFAULT_KDL)?,
    };
    let parameters = match args.next() {
        Some(path) => SearchParameters::from_kdl(&path, fs::read_to_string(&path).into_diagnostic()?)?,
        None => SearchParameters::default(),
    };
    let engine = AnnotationEngine::new(&database, parameters);

    println!("Loaded {} reference compounds", database.len());
    println!("Enter features as KDL, like: 195.0877 {{ retention-time 3.2; peak 138.0662 100; peak 110.0713 22.5 }}");

    let mut rl = DefaultEditor::new().into_diagnostic()?;
    while let Ok(line) = rl.readline("Feature: ") {
        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(&line).into_diagnostic()?;
        match annotation_info(&engine, &line) {
            Ok(info) => print!("{info}"),
            Err(report) => render_error(&*report),
        }
    }

    Ok(())
}

fn annotation_info(engine: &AnnotationEngine<'_>, input: &str) -> Result<String> {
    let kdl = if input.trim_start().starts_with("feature") {
        input.to_owned()
    } else {
        format!("feature {input}")
    };
    let features = PeakFeature::from_kdl("input", kdl)?;

    let mut buf = String::new();
    for feature in &features {
        let annotation = engine.annotate(feature);
        writeln!(buf, "Annotation: {annotation}").into_diagnostic()?;

        if let Some(record) = engine.refer(&annotation) {
            let identity = record.identity();
            for (label, value) in [
                ("InChIKey", &identity.inchikey),
                ("Formula", &identity.formula),
                ("Adduct", &identity.adduct),
                ("Ontology", &identity.ontology),
            ] {
                if let Some(value) = value {
                    writeln!(buf, "  {label}: {value}").into_diagnostic()?;
                }
            }
            writeln!(buf, "  Reference m/z: {:.4}", record.precursor_mz()).into_diagnostic()?;
        }

        let candidates = engine.score_candidates(feature, ScoringMode::Strict);
        writeln!(buf, "Candidates: {}", candidates.len()).into_diagnostic()?;
        for (rank, candidate) in candidates.iter().enumerate() {
            writeln!(buf, "  {}. {}", rank + 1, candidate_summary(candidate)).into_diagnostic()?;
        }
        writeln!(buf).into_diagnostic()?;
    }

    Ok(buf)
}

fn candidate_summary(candidate: &MatchResult) -> String {
    let name = candidate.identity().map_or("?", |i| i.name.as_str());
    let id = candidate
        .record_id()
        .map_or_else(|| "?".to_owned(), |id| id.to_string());
    let flag = |matched| if matched { "yes" } else { "no" };

    format!(
        "{name} #{id}: total={:.3}, Δm/z={:+.4}, precursor match: {}, spectrum match: {}, secondary match: {}",
        candidate.total_score(),
        candidate.precursor_mz_difference(),
        flag(candidate.is_precursor_mz_match()),
        flag(candidate.is_spectrum_match()),
        flag(candidate.is_secondary_coordinate_match()),
    )
}

fn render_error(diagnostic: &dyn Diagnostic) {
    let mut buf = String::new();
    // NOTE: Writing into a `String` can't fail, so there's nothing to report if it somehow does
    if GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic)
        .is_ok()
    {
        println!("{buf}");
    }
}
