//! The mark attachment feature writer

// this_file: crates/feagen-mark/src/writer.rs

use crate::anchors::collect_anchors;
use crate::lookups::AttachmentBuilder;
use crate::pairs::build_anchor_pairs;
use feagen_core::{
    ast::{FeatureBlock, FeatureFile, LookupBlock, Statement},
    config::{default_mode, WriterSpec},
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::Contribution,
    types::{FeatureTag, Mode},
    FeatureWriter,
};
use std::collections::BTreeSet;

const SUPPORTED: [FeatureTag; 2] = [FeatureTag::Mark, FeatureTag::Mkmk];

/// Generates `mark` and `mkmk` from glyph anchors
#[derive(Debug, Clone)]
pub struct MarkFeatureWriter {
    features: BTreeSet<FeatureTag>,
    mode: Mode,
    quantization: Option<u32>,
}

impl MarkFeatureWriter {
    pub fn builder() -> MarkFeatureWriterBuilder {
        MarkFeatureWriterBuilder::new()
    }

    /// Build from a parsed spec such as `mark(quantization=10, features=mark)`
    pub fn from_spec(mut spec: WriterSpec) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(step) = spec.take_u32("quantization")? {
            builder = builder.quantization(step);
        }
        if let Some(mode) = spec.take_mode()? {
            builder = builder.mode(mode);
        }
        if let Some(features) = spec.take_features()? {
            builder = builder.features(features);
        }
        spec.finish()?;
        builder.build()
    }

    pub fn quantization(&self) -> Option<u32> {
        self.quantization
    }

    /// Glyphs the GDEF glyph classes let through, when the document defines them
    fn gdef_glyphs(doc: &FeatureFile) -> Option<BTreeSet<String>> {
        doc.gdef().filter(|gdef| gdef.has_class_def()).map(|gdef| {
            [&gdef.base, &gdef.ligature, &gdef.mark]
                .into_iter()
                .flatten()
                .flatten()
                .cloned()
                .collect()
        })
    }
}

fn feature_block(tag: FeatureTag, lookups: Vec<LookupBlock>) -> FeatureBlock {
    let mut block = FeatureBlock::new(tag.as_str());
    block.statements = lookups.into_iter().map(Statement::Lookup).collect();
    block
}

impl FeatureWriter for MarkFeatureWriter {
    fn name(&self) -> &'static str {
        "mark"
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
        let include = Self::gdef_glyphs(doc);
        let glyphs = collect_anchors(font, include.as_ref(), diagnostics);
        let pairs = build_anchor_pairs(&glyphs);
        if pairs.is_empty() {
            log::debug!("No anchor pairs to write");
            return Ok(Contribution::default());
        }

        let mut builder = AttachmentBuilder::new(&glyphs, &pairs, doc, self.quantization);
        let mut mark_lookups = Vec::new();
        let mut mkmk_lookups = Vec::new();
        if todo.contains(&FeatureTag::Mark) {
            mark_lookups.extend(builder.mark_to_base());
            mark_lookups.extend(builder.mark_to_ligature());
            builder.report_ambiguities(false, diagnostics);
        }
        if todo.contains(&FeatureTag::Mkmk) {
            mkmk_lookups.extend(builder.mark_to_mark());
            builder.report_ambiguities(true, diagnostics);
        }

        let definitions = builder.definitions(mark_lookups.iter().chain(&mkmk_lookups));
        log::info!(
            "Generated {} mark and {} mkmk lookup(s) with {} mark class definition(s)",
            mark_lookups.len(),
            mkmk_lookups.len(),
            definitions.len()
        );

        let mut features = Vec::new();
        if !mark_lookups.is_empty() {
            features.push((FeatureTag::Mark, feature_block(FeatureTag::Mark, mark_lookups)));
        }
        if !mkmk_lookups.is_empty() {
            features.push((FeatureTag::Mkmk, feature_block(FeatureTag::Mkmk, mkmk_lookups)));
        }
        Ok(Contribution {
            definitions,
            lookups: Vec::new(),
            features,
            gdef: None,
        })
    }
}

/// Builder for [`MarkFeatureWriter`]
#[derive(Debug, Default)]
pub struct MarkFeatureWriterBuilder {
    features: Option<BTreeSet<FeatureTag>>,
    mode: Option<Mode>,
    quantization: Option<u32>,
}

impl MarkFeatureWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snap anchors down to multiples of `step`; 0 or 1 only rounds
    pub fn quantization(mut self, step: u32) -> Self {
        self.quantization = Some(step).filter(|q| *q > 1);
        self
    }

    /// Merge mode; falls back to `FEAGEN_MODE`, then skip
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Subset of `mark` and `mkmk` to generate (default: both)
    pub fn features(mut self, features: impl IntoIterator<Item = FeatureTag>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    pub fn build(self) -> Result<MarkFeatureWriter> {
        let features = self
            .features
            .unwrap_or_else(|| SUPPORTED.into_iter().collect());
        if features.is_empty() {
            return Err(FeagenError::EmptyFeatureSet);
        }
        if let Some(tag) = features.iter().find(|t| !SUPPORTED.contains(*t)) {
            return Err(FeagenError::UnsupportedFeature {
                writer: "mark".to_string(),
                feature: tag.to_string(),
            });
        }
        Ok(MarkFeatureWriter {
            features,
            mode: self.mode.unwrap_or_else(default_mode),
            quantization: self.quantization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let writer = MarkFeatureWriter::builder().mode(Mode::Skip).build().unwrap();
        assert_eq!(
            writer.features(),
            &BTreeSet::from([FeatureTag::Mark, FeatureTag::Mkmk])
        );
        assert_eq!(writer.quantization(), None);
        assert_eq!(writer.name(), "mark");
    }

    #[test]
    fn test_builder_rejects_bad_features() {
        match MarkFeatureWriter::builder().features([]).build() {
            Err(FeagenError::EmptyFeatureSet) => {},
            other => unreachable!("expected EmptyFeatureSet, got {other:?}"),
        }
        match MarkFeatureWriter::builder()
            .features([FeatureTag::Mark, FeatureTag::Kern])
            .build()
        {
            Err(FeagenError::UnsupportedFeature { writer, feature }) => {
                assert_eq!(writer, "mark");
                assert_eq!(feature, "kern");
            },
            other => unreachable!("expected UnsupportedFeature, got {other:?}"),
        }
    }

    #[test]
    fn test_quantization_of_one_only_rounds() {
        let writer = MarkFeatureWriter::builder().quantization(1).build().unwrap();
        assert_eq!(writer.quantization(), None);
        let writer = MarkFeatureWriter::builder().quantization(5).build().unwrap();
        assert_eq!(writer.quantization(), Some(5));
    }

    #[test]
    fn test_gdef_glyphs() {
        let doc = FeatureFile {
            statements: vec![Statement::Gdef(feagen_core::ast::GdefClasses {
                base: Some(vec!["a".into()]),
                ligature: None,
                mark: Some(vec!["acutecomb".into()]),
                component: Some(vec!["ignored".into()]),
                carets: vec![],
            })],
        };
        assert_eq!(
            MarkFeatureWriter::gdef_glyphs(&doc),
            Some(BTreeSet::from(["a".to_string(), "acutecomb".to_string()]))
        );
        assert_eq!(MarkFeatureWriter::gdef_glyphs(&FeatureFile::new()), None);
    }

    #[test]
    fn test_caret_only_gdef_does_not_filter() {
        let doc = FeatureFile {
            statements: vec![Statement::Gdef(feagen_core::ast::GdefClasses {
                carets: vec![feagen_core::ast::LigatureCaret {
                    glyph: "f_i".into(),
                    positions: vec![200],
                }],
                ..Default::default()
            })],
        };
        assert_eq!(MarkFeatureWriter::gdef_glyphs(&doc), None);
    }
}
