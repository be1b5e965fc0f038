//! Generate command implementation

// this_file: crates/feagen-cli/src/commands/generate.rs

use crate::cli::GenerateArgs;
use feagen::{
    error::{FeagenError, Result},
    FontSource, Severity, Synthesizer,
};
use std::fs;
use std::io::Write;

pub fn run(args: &GenerateArgs) -> Result<()> {
    let font = FontSource::load(&args.font)?;
    let mut doc = super::load_features(args.features_json.as_deref())?;

    let mut builder = Synthesizer::builder();
    for spec in &args.writers {
        builder = builder.spec(spec.as_str());
    }
    if let Some(mode) = args.mode {
        builder = builder.mode(mode.into());
    }
    let synth = builder.build()?;
    let report = synth.run(&font, &mut doc);

    for diagnostic in report.diagnostics.iter() {
        let level = match diagnostic.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        eprintln!("{level}: {diagnostic}");
    }
    for (tag, error) in report.failures() {
        eprintln!("error: feature '{tag}' not written: {error}");
    }

    let rendered = if args.json {
        doc.to_json()?
    } else {
        doc.to_string()
    };
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            log::info!("Wrote {}", path.display());
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        },
    }

    let failures = report.failures().count();
    if failures > 0 {
        return Err(FeagenError::Config(format!(
            "{failures} feature(s) could not be written"
        )));
    }
    if args.strict && report.diagnostics.has_warnings() {
        return Err(FeagenError::Config(format!(
            "{} diagnostic(s) reported in strict mode",
            report.diagnostics.len()
        )));
    }
    Ok(())
}
