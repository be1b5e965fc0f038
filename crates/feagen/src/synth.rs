//! Running several writers against one document
//!
//! Writers generate from the same snapshot of the document, in parallel,
//! and are spliced one after the other in writer order (kern, mark, GDEF,
//! curs). The document is only touched during splicing.

// this_file: crates/feagen/src/synth.rs

use crate::writer::Writer;
use feagen_core::{
    ast::FeatureFile,
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::{splice, Contribution, Placement, TagOutcome},
    types::{FeatureTag, Mode},
    FeatureWriter,
};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// What a synthesis pass did
#[derive(Debug, Default)]
pub struct SynthesisReport {
    pub diagnostics: Diagnostics,
    /// One entry per spliced feature tag, in splice order
    pub outcomes: Vec<TagOutcome>,
}

impl SynthesisReport {
    /// Tags that could not be written, by generation or insertion failure
    pub fn failures(&self) -> impl Iterator<Item = (FeatureTag, &FeagenError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.tag, e)))
    }

    /// Tags that were written, with where they went
    pub fn placements(&self) -> impl Iterator<Item = (FeatureTag, Placement)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|p| (o.tag, *p)))
    }

    pub fn written(&self) -> BTreeSet<FeatureTag> {
        self.placements()
            .filter(|(_, p)| *p != Placement::Skipped)
            .map(|(tag, _)| tag)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Runs a fixed set of writers against fonts
///
/// ```ignore
/// use feagen::{Synthesizer, FeatureFile, FontSource};
///
/// let synth = Synthesizer::builder()
///     .spec("kern(quantization=5)")
///     .spec("mark")
///     .build()?;
/// let mut doc = FeatureFile::new();
/// let report = synth.run(&font, &mut doc);
/// println!("{doc}");
/// ```
#[derive(Debug)]
pub struct Synthesizer {
    writers: Vec<Writer>,
}

struct Generated {
    todo: BTreeSet<FeatureTag>,
    mode: Mode,
    result: Result<Contribution>,
    diagnostics: Diagnostics,
}

fn generate(
    writer: &dyn FeatureWriter,
    font: &FontSource,
    doc: &FeatureFile,
) -> Option<Generated> {
    let todo = writer.todo(doc);
    if todo.is_empty() {
        log::debug!("{}: nothing to do", writer.name());
        return None;
    }
    let mut diagnostics = Diagnostics::new();
    let result = writer.generate(font, doc, &todo, &mut diagnostics);
    Some(Generated {
        todo,
        mode: writer.mode(),
        result,
        diagnostics,
    })
}

/// Generate with every writer, then splice the results in the given order
///
/// A writer whose generation fails contributes one failed outcome per tag
/// it was about to write; the others are spliced as usual.
fn synthesize(
    writers: &[&dyn FeatureWriter],
    font: &FontSource,
    doc: &mut FeatureFile,
) -> SynthesisReport {
    let snapshot: &FeatureFile = doc;
    let generated: Vec<Option<Generated>> = writers
        .par_iter()
        .map(|writer| generate(*writer, font, snapshot))
        .collect();

    let mut report = SynthesisReport::default();
    for (writer, generated) in writers.iter().zip(generated) {
        let Some(Generated {
            todo,
            mode,
            result,
            diagnostics,
        }) = generated
        else {
            continue;
        };
        report.diagnostics.extend(diagnostics);
        match result {
            Ok(contribution) if contribution.is_empty() => {
                log::debug!("{}: no features generated", writer.name());
            },
            Ok(contribution) => report.outcomes.extend(splice(doc, contribution, mode)),
            Err(e) => {
                log::error!("Writer '{}' failed: {e}", writer.name());
                let reason = e.to_string();
                report.outcomes.extend(todo.into_iter().map(|tag| TagOutcome {
                    tag,
                    result: Err(FeagenError::WriterFailed {
                        writer: writer.name().to_string(),
                        reason: reason.clone(),
                    }),
                }));
            },
        }
    }

    for (tag, error) in report.failures() {
        log::warn!("Feature '{tag}' was not written: {error}");
    }
    log::info!(
        "Synthesis done: {} feature(s) written, {} diagnostic(s)",
        report.written().len(),
        report.diagnostics.len()
    );
    report
}

impl Synthesizer {
    pub fn builder() -> SynthesizerBuilder {
        SynthesizerBuilder::new()
    }

    /// Writers in splice order
    pub fn writers(&self) -> &[Writer] {
        &self.writers
    }

    /// Generate every writer's features and splice them into `doc`
    ///
    /// Nothing here aborts the pass. A writer that fails to generate and a
    /// tag that cannot be inserted both show up as failed entries in
    /// [`SynthesisReport::outcomes`]; every other writer is still spliced.
    pub fn run(&self, font: &FontSource, doc: &mut FeatureFile) -> SynthesisReport {
        let writers: Vec<&dyn FeatureWriter> =
            self.writers.iter().map(|w| w as &dyn FeatureWriter).collect();
        synthesize(&writers, font, doc)
    }
}

/// Builder for [`Synthesizer`]; specs are parsed and validated in `build`
#[derive(Debug, Default)]
pub struct SynthesizerBuilder {
    writers: Vec<Writer>,
    specs: Vec<String>,
    mode: Option<Mode>,
}

impl SynthesizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already configured writer
    pub fn writer(mut self, writer: Writer) -> Self {
        self.writers.push(writer);
        self
    }

    /// Add a writer by spec, e.g. `kern(mode=append)`
    pub fn spec(mut self, spec: impl Into<String>) -> Self {
        self.specs.push(spec.into());
        self
    }

    /// Merge mode for writers whose spec does not set one
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Validate specs; without any writer, `kern` and `mark` run with defaults
    pub fn build(self) -> Result<Synthesizer> {
        let mut writers = self.writers;
        for text in &self.specs {
            let mut spec: feagen_core::config::WriterSpec = text.parse()?;
            if let Some(mode) = self.mode {
                spec.set_default("mode", mode.as_str());
            }
            writers.push(Writer::from_writer_spec(spec)?);
        }
        if writers.is_empty() {
            for name in crate::writer::DEFAULT_WRITERS {
                writers.push(Writer::with_defaults(name, self.mode)?);
            }
        }

        writers.sort_by_key(Writer::order);
        if let Some(pair) = writers.windows(2).find(|w| w[0].order() == w[1].order()) {
            return Err(FeagenError::Config(format!(
                "writer '{}' configured more than once",
                pair[0].name()
            )));
        }

        log::debug!(
            "Synthesizer writers: {}",
            writers.iter().map(|w| w.name()).collect::<Vec<_>>().join(", ")
        );
        Ok(Synthesizer { writers })
    }
}
