//! The cursive attachment feature writer

// this_file: crates/feagen-curs/src/writer.rs

use crate::anchors::{collect_cursive_anchors, cursive_pairs};
use crate::lookups::CursiveLookups;
use feagen_core::{
    ast::{FeatureBlock, FeatureFile, Statement},
    config::{default_mode, WriterSpec},
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::Contribution,
    types::{Direction, FeatureTag, Mode},
    FeatureWriter, UnicodeProperties,
};
use feagen_unicode::{GlyphClassifier, IcuProperties};
use std::collections::BTreeSet;
use std::sync::Arc;

const SUPPORTED: [FeatureTag; 1] = [FeatureTag::Curs];

/// Generates `curs` from `entry` and `exit` anchors
pub struct CursFeatureWriter {
    features: BTreeSet<FeatureTag>,
    mode: Mode,
    properties: Arc<dyn UnicodeProperties>,
}

impl std::fmt::Debug for CursFeatureWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursFeatureWriter")
            .field("features", &self.features)
            .field("mode", &self.mode)
            .field("properties", &self.properties.name())
            .finish()
    }
}

impl CursFeatureWriter {
    pub fn builder() -> CursFeatureWriterBuilder {
        CursFeatureWriterBuilder::new()
    }

    /// Build from a parsed spec such as `curs(mode=append)`
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

    /// Glyphs written left to right, directly or through substitutions
    fn ltr_glyphs(&self, font: &FontSource) -> BTreeSet<String> {
        GlyphClassifier::new(self.properties.clone())
            .classify_font(font)
            .directions
            .into_iter()
            .filter(|(_, directions)| directions.contains(&Direction::LeftToRight))
            .map(|(glyph, _)| glyph)
            .collect()
    }
}

impl FeatureWriter for CursFeatureWriter {
    fn name(&self) -> &'static str {
        "curs"
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
        _diagnostics: &mut Diagnostics,
    ) -> Result<Contribution> {
        let pairs = cursive_pairs(font);
        if !todo.contains(&FeatureTag::Curs) || pairs.is_empty() {
            log::debug!("No cursive anchors to write");
            return Ok(Contribution::default());
        }

        let ltr = self.ltr_glyphs(font);
        let mut builder = CursiveLookups::new(doc);
        let mut lookups = Vec::new();
        for pair in &pairs {
            let anchors = collect_cursive_anchors(font, pair);
            lookups.extend(builder.build(pair, &anchors, &ltr));
        }
        if lookups.is_empty() {
            return Ok(Contribution::default());
        }

        log::info!(
            "Generated {} cursive lookup(s) for {} anchor pair(s)",
            lookups.len(),
            pairs.len()
        );
        let mut block = FeatureBlock::new(FeatureTag::Curs.as_str());
        block.statements = lookups.into_iter().map(Statement::Lookup).collect();
        Ok(Contribution {
            features: vec![(FeatureTag::Curs, block)],
            ..Default::default()
        })
    }
}

/// Builder for [`CursFeatureWriter`]
pub struct CursFeatureWriterBuilder {
    features: Option<BTreeSet<FeatureTag>>,
    mode: Option<Mode>,
    properties: Option<Arc<dyn UnicodeProperties>>,
}

impl CursFeatureWriterBuilder {
    pub fn new() -> Self {
        Self {
            features: None,
            mode: None,
            properties: None,
        }
    }

    /// Merge mode; falls back to `FEAGEN_MODE`, then skip
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = FeatureTag>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    /// Unicode data source (default: ICU)
    pub fn properties(mut self, properties: Arc<dyn UnicodeProperties>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn build(self) -> Result<CursFeatureWriter> {
        let features = self
            .features
            .unwrap_or_else(|| SUPPORTED.into_iter().collect());
        if features.is_empty() {
            return Err(FeagenError::EmptyFeatureSet);
        }
        if let Some(tag) = features.iter().find(|t| !SUPPORTED.contains(*t)) {
            return Err(FeagenError::UnsupportedFeature {
                writer: "curs".to_string(),
                feature: tag.to_string(),
            });
        }
        Ok(CursFeatureWriter {
            features,
            mode: self.mode.unwrap_or_else(default_mode),
            properties: self
                .properties
                .unwrap_or_else(|| Arc::new(IcuProperties::new())),
        })
    }
}

impl Default for CursFeatureWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let writer = CursFeatureWriter::builder().mode(Mode::Append).build().unwrap();
        assert_eq!(writer.features(), &BTreeSet::from([FeatureTag::Curs]));
        assert_eq!(writer.mode(), Mode::Append);
        assert!(format!("{writer:?}").contains("CursFeatureWriter"));
    }

    #[test]
    fn test_from_spec_rejects_unknown_options() {
        let spec: WriterSpec = "curs(quantization=5)".parse().unwrap();
        match CursFeatureWriter::from_spec(spec) {
            Err(FeagenError::Config(message)) => assert!(message.contains("quantization")),
            other => unreachable!("expected Config error, got {other:?}"),
        }
    }
}
