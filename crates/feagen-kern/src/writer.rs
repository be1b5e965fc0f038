//! The kerning feature writer
//!
//! Ties the pipeline together: classify, resolve, partition, assemble,
//! register. The result is a [`Contribution`] for the merge engine.

// this_file: crates/feagen-kern/src/writer.rs

use crate::features::{build_features, drop_unregistered, LookupNames};
use crate::lookups::{build_lookups, ClassNamer, KernLookup, LookupOptions, MarkFilter};
use crate::partition::partition;
use crate::resolve::resolve_font;
use feagen_core::{
    ast::FeatureFile,
    config::{default_mode, WriterSpec},
    diagnostics::Diagnostics,
    error::{FeagenError, Result},
    font::FontSource,
    insert::Contribution,
    types::{FeatureTag, Mode},
    FeatureWriter, UnicodeProperties,
};
use feagen_unicode::{ot_tag_to_script, GlyphClassifier, IcuProperties};
use std::collections::BTreeSet;
use std::sync::Arc;

const SUPPORTED: [FeatureTag; 2] = [FeatureTag::Kern, FeatureTag::Dist];

/// Generates `kern` and `dist` from the font's kerning
pub struct KernFeatureWriter {
    features: BTreeSet<FeatureTag>,
    mode: Mode,
    options: LookupOptions,
    properties: Arc<dyn UnicodeProperties>,
}

impl std::fmt::Debug for KernFeatureWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernFeatureWriter")
            .field("features", &self.features)
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("properties", &self.properties.name())
            .finish()
    }
}

impl KernFeatureWriter {
    pub fn builder() -> KernFeatureWriterBuilder {
        KernFeatureWriterBuilder::new()
    }

    /// Build from a parsed spec such as `kern(ignoreMarks=false, quantization=5)`
    pub fn from_spec(mut spec: WriterSpec) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(ignore_marks) = spec.take_bool("ignoreMarks")? {
            builder = builder.ignore_marks(ignore_marks);
        }
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

    pub fn options(&self) -> LookupOptions {
        self.options
    }

    fn mark_filter(font: &FontSource, doc: &FeatureFile) -> MarkFilter {
        let marks = doc.gdef_marks().unwrap_or_else(|| font.category_marks());
        let spacing = marks
            .iter()
            .filter(|m| font.glyph(m).is_some_and(|g| g.width != 0.0))
            .cloned()
            .collect();
        MarkFilter { marks, spacing }
    }
}

impl FeatureWriter for KernFeatureWriter {
    fn name(&self) -> &'static str {
        "kern"
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
        let (groups, pairs) = resolve_font(font);
        if pairs.is_empty() {
            log::debug!("No kerning pairs to write");
            return Ok(Contribution::default());
        }

        let language_systems = doc.languages_by_script();
        let known_scripts: BTreeSet<String> = language_systems
            .iter()
            .filter_map(|(tag, _)| ot_tag_to_script(tag))
            .collect();
        let classification = GlyphClassifier::new(self.properties.clone())
            .with_known_scripts(known_scripts)
            .classify_font(font);

        let buckets = partition(&pairs, &classification, diagnostics);
        let filter = Self::mark_filter(font, doc);
        let lookups = build_lookups(
            buckets,
            &filter,
            self.options,
            self.properties.as_ref(),
            diagnostics,
        );

        let mut names: LookupNames = lookups
            .iter()
            .map(|(script, ls)| (script.clone(), ls.iter().map(|l| l.name.clone()).collect()))
            .collect();
        drop_unregistered(&mut names, &language_systems, diagnostics);
        let features = build_features(&names, &language_systems, todo, self.properties.as_ref());

        let referenced: BTreeSet<&str> = features
            .iter()
            .flat_map(|(_, block)| block.lookup_names())
            .collect();
        let used: Vec<&KernLookup> = lookups
            .values()
            .flatten()
            .filter(|l| referenced.contains(l.name.as_str()))
            .collect();

        let mut namer = ClassNamer::new(doc.class_names());
        namer.name_lookups(used.iter().copied(), |origin| {
            groups.members(origin).map(<[String]>::to_vec)
        });
        let blocks = used
            .iter()
            .map(|lookup| lookup.to_block(self.options.quantization, &mut namer))
            .collect();

        log::info!(
            "Generated {} kerning lookup(s) for {}",
            used.len(),
            features
                .iter()
                .map(|(tag, _)| tag.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Contribution {
            definitions: namer.definitions(),
            lookups: blocks,
            features,
            gdef: None,
        })
    }
}

/// Builder for [`KernFeatureWriter`]; options are validated in `build`
pub struct KernFeatureWriterBuilder {
    features: Option<BTreeSet<FeatureTag>>,
    mode: Option<Mode>,
    options: LookupOptions,
    properties: Option<Arc<dyn UnicodeProperties>>,
}

impl KernFeatureWriterBuilder {
    pub fn new() -> Self {
        Self {
            features: None,
            mode: None,
            options: LookupOptions::default(),
            properties: None,
        }
    }

    /// Keep marks out of base kerning (default: true)
    pub fn ignore_marks(mut self, ignore_marks: bool) -> Self {
        self.options.ignore_marks = ignore_marks;
        self
    }

    /// Snap values to multiples of `step`; 0 only rounds (default: 1)
    pub fn quantization(mut self, step: u32) -> Self {
        self.options.quantization = step;
        self
    }

    /// Merge mode; falls back to `FEAGEN_MODE`, then skip
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Subset of `kern` and `dist` to generate (default: both)
    pub fn features(mut self, features: impl IntoIterator<Item = FeatureTag>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    /// Unicode data source (default: ICU)
    pub fn properties(mut self, properties: Arc<dyn UnicodeProperties>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn build(self) -> Result<KernFeatureWriter> {
        let features = self
            .features
            .unwrap_or_else(|| SUPPORTED.into_iter().collect());
        if features.is_empty() {
            return Err(FeagenError::EmptyFeatureSet);
        }
        if let Some(tag) = features.iter().find(|t| !SUPPORTED.contains(*t)) {
            return Err(FeagenError::UnsupportedFeature {
                writer: "kern".to_string(),
                feature: tag.to_string(),
            });
        }
        Ok(KernFeatureWriter {
            features,
            mode: self.mode.unwrap_or_else(default_mode),
            options: self.options,
            properties: self
                .properties
                .unwrap_or_else(|| Arc::new(IcuProperties::new())),
        })
    }
}

impl Default for KernFeatureWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
