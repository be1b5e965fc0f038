//! The GDEF table writer

// this_file: crates/feagen-gdef/src/writer.rs

use crate::categories::glyph_categories;
use crate::carets::ligature_carets;
use feagen_core::{
    ast::{FeatureFile, GdefClasses},
    config::{default_mode, WriterSpec},
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::Contribution,
    types::{FeatureTag, Mode},
    FeatureWriter,
};
use std::collections::BTreeSet;

const SUPPORTED: [FeatureTag; 1] = [FeatureTag::Gdef];

/// Generates the `GDEF` table from OpenType categories and caret anchors
///
/// The table is merged into the document whatever the mode: an existing
/// `GlyphClassDef` or caret list is kept, and only the missing part is
/// generated. A document whose table already has both gets nothing.
#[derive(Debug, Clone)]
pub struct GdefFeatureWriter {
    features: BTreeSet<FeatureTag>,
    mode: Mode,
}

impl GdefFeatureWriter {
    pub fn builder() -> GdefFeatureWriterBuilder {
        GdefFeatureWriterBuilder::new()
    }

    /// Build from a parsed spec such as `gdef` or `gdef(mode=append)`
    pub fn from_spec(mut spec: WriterSpec) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(mode) = spec.take_mode()? {
            builder = builder.mode(mode);
        }
        if let Some(features) = spec.take_features()? {
            builder = builder.features(features);
        }
        spec.finish()?;
        builder.build()
    }
}

impl FeatureWriter for GdefFeatureWriter {
    fn name(&self) -> &'static str {
        "gdef"
    }

    fn features(&self) -> &BTreeSet<FeatureTag> {
        &self.features
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn generate(
        &self,
        font: &FontSource,
        doc: &FeatureFile,
        todo: &BTreeSet<FeatureTag>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Contribution> {
        if !todo.contains(&FeatureTag::Gdef) {
            return Ok(Contribution::default());
        }
        let existing = doc.gdef();
        let want_classes = existing.map_or(true, |table| !table.has_class_def());
        let want_carets = existing.map_or(true, |table| table.carets.is_empty());

        let mut table = GdefClasses::default();
        if want_classes && !font.categories.is_empty() {
            let classes = glyph_categories(font, diagnostics);
            table.base = Some(classes.base);
            table.ligature = Some(classes.ligature);
            table.mark = Some(classes.mark);
            table.component = Some(classes.component);
        }
        if want_carets {
            table.carets = ligature_carets(font);
        }

        if !table.has_class_def() && table.carets.is_empty() {
            log::debug!("Nothing to add to GDEF");
            return Ok(Contribution::default());
        }
        log::info!(
            "Generated GDEF with{} glyph classes and {} ligature caret(s)",
            if table.has_class_def() { "" } else { "out" },
            table.carets.len()
        );
        Ok(Contribution {
            gdef: Some(table),
            ..Default::default()
        })
    }
}

/// Builder for [`GdefFeatureWriter`]
#[derive(Debug, Default)]
pub struct GdefFeatureWriterBuilder {
    features: Option<BTreeSet<FeatureTag>>,
    mode: Option<Mode>,
}

impl GdefFeatureWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted for uniformity with the other writers; GDEF merging ignores it
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = FeatureTag>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    pub fn build(self) -> Result<GdefFeatureWriter> {
        let features = self
            .features
            .unwrap_or_else(|| SUPPORTED.into_iter().collect());
        if features.is_empty() {
            return Err(FeagenError::EmptyFeatureSet);
        }
        if let Some(tag) = features.iter().find(|t| !SUPPORTED.contains(*t)) {
            return Err(FeagenError::UnsupportedFeature {
                writer: "gdef".to_string(),
                feature: tag.to_string(),
            });
        }
        Ok(GdefFeatureWriter {
            features,
            mode: self.mode.unwrap_or_else(default_mode),
        })
    }
}
