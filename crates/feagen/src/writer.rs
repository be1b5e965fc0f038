//! The closed set of feature writers

// this_file: crates/feagen/src/writer.rs

use feagen_core::{
    ast::FeatureFile,
    config::WriterSpec,
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::Contribution,
    types::{FeatureTag, Mode},
    FeatureWriter,
};
use feagen_curs::CursFeatureWriter;
use feagen_gdef::GdefFeatureWriter;
use feagen_kern::KernFeatureWriter;
use feagen_mark::MarkFeatureWriter;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Names accepted by [`Writer::from_spec`], in splice order
pub const WRITER_NAMES: [&str; 4] = ["kern", "mark", "gdef", "curs"];

/// Writers that run when none is requested
pub const DEFAULT_WRITERS: [&str; 2] = ["kern", "mark"];

/// One of the built-in feature writers
#[derive(Debug)]
pub enum Writer {
    Kern(KernFeatureWriter),
    Mark(MarkFeatureWriter),
    Gdef(GdefFeatureWriter),
    Curs(CursFeatureWriter),
}

impl Writer {
    /// Parse a spec such as `kern(mode=append, quantization=5)`
    pub fn from_spec(spec: &str) -> Result<Self> {
        spec.parse::<WriterSpec>().and_then(Self::from_writer_spec)
    }

    pub fn from_writer_spec(spec: WriterSpec) -> Result<Self> {
        match spec.name.as_str() {
            "kern" => KernFeatureWriter::from_spec(spec).map(Writer::Kern),
            "mark" => MarkFeatureWriter::from_spec(spec).map(Writer::Mark),
            "gdef" => GdefFeatureWriter::from_spec(spec).map(Writer::Gdef),
            "curs" => CursFeatureWriter::from_spec(spec).map(Writer::Curs),
            other => Err(FeagenError::UnknownWriter(other.to_string())),
        }
    }

    /// Default writer for a name, with an optional merge mode
    pub fn with_defaults(name: &str, mode: Option<Mode>) -> Result<Self> {
        let mut spec = WriterSpec::new(name.to_ascii_lowercase());
        if let Some(mode) = mode {
            spec.set_default("mode", mode.as_str());
        }
        Self::from_writer_spec(spec)
    }

    /// Position in the splice order
    pub fn order(&self) -> usize {
        match self {
            Writer::Kern(_) => 0,
            Writer::Mark(_) => 1,
            Writer::Gdef(_) => 2,
            Writer::Curs(_) => 3,
        }
    }

    fn inner(&self) -> &dyn FeatureWriter {
        match self {
            Writer::Kern(writer) => writer,
            Writer::Mark(writer) => writer,
            Writer::Gdef(writer) => writer,
            Writer::Curs(writer) => writer,
        }
    }
}

impl FromStr for Writer {
    type Err = FeagenError;

    fn from_str(spec: &str) -> Result<Self> {
        Self::from_spec(spec)
    }
}

impl FeatureWriter for Writer {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn features(&self) -> &BTreeSet<FeatureTag> {
        self.inner().features()
    }

    fn mode(&self) -> Mode {
        self.inner().mode()
    }

    fn generate(
        &self,
        font: &FontSource,
        doc: &FeatureFile,
        todo: &BTreeSet<FeatureTag>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Contribution> {
        self.inner().generate(font, doc, todo, diagnostics)
    }
}
