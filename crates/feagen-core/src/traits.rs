//! The two seams of the synthesizer
//!
//! - [`UnicodeProperties`] - where script, direction and bidi data come from
//! - [`FeatureWriter`] - anything that contributes statements to a document

use crate::{
    ast::FeatureFile,
    diagnostics::Diagnostics,
    error::Result,
    font::FontSource,
    insert::{pending_features, splice, Contribution, TagOutcome},
    types::{BidiType, Direction, FeatureTag, Mode},
};
use std::collections::BTreeSet;

/// Read-only Unicode character data
///
/// Implementations are injected into the writers at construction and shared
/// between passes, so they must be immutable.
///
/// ```ignore
/// struct LatinOnly;
///
/// impl UnicodeProperties for LatinOnly {
///     fn name(&self) -> &'static str {
///         "latin-only"
///     }
///     fn script_extensions(&self, _codepoint: u32) -> Vec<String> {
///         vec!["Latn".to_string()]
///     }
///     fn horizontal_direction(&self, _script: &str) -> Option<Direction> {
///         Some(Direction::LeftToRight)
///     }
///     fn bidi_type(&self, _codepoint: u32) -> Option<BidiType> {
///         Some(BidiType::L)
///     }
/// }
/// ```
pub trait UnicodeProperties: Send + Sync {
    fn name(&self) -> &'static str;

    /// ISO 15924 codes of the codepoint's script extensions
    fn script_extensions(&self, codepoint: u32) -> Vec<String>;

    /// Horizontal direction of a script; `None` for neutral scripts
    fn horizontal_direction(&self, script: &str) -> Option<Direction>;

    /// Collapsed bidi type of a codepoint; `None` for weak and neutral classes
    fn bidi_type(&self, codepoint: u32) -> Option<BidiType>;
}

/// A generator of layout features
///
/// `generate` is pure with respect to the document: it reads it and returns
/// a [`Contribution`]. `write` runs the whole cycle against one document.
pub trait FeatureWriter: Send + Sync {
    /// Used in logs and configuration errors
    fn name(&self) -> &'static str;

    /// Tags this writer was configured to produce
    fn features(&self) -> &BTreeSet<FeatureTag>;

    fn mode(&self) -> Mode;

    /// Build the statements for the tags in `todo`
    fn generate(
        &self,
        font: &FontSource,
        doc: &FeatureFile,
        todo: &BTreeSet<FeatureTag>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Contribution>;

    /// Tags still worth generating for this document
    fn todo(&self, doc: &FeatureFile) -> BTreeSet<FeatureTag> {
        pending_features(doc, self.features(), self.mode())
    }

    /// Generate and splice in one go
    fn write(
        &self,
        font: &FontSource,
        doc: &mut FeatureFile,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<TagOutcome>> {
        let todo = self.todo(doc);
        if todo.is_empty() {
            log::debug!("{}: nothing to do", self.name());
            return Ok(Vec::new());
        }
        let contribution = self.generate(font, doc, &todo, diagnostics)?;
        if contribution.is_empty() {
            log::debug!("{}: no features generated", self.name());
            return Ok(Vec::new());
        }
        Ok(splice(doc, contribution, self.mode()))
    }
}
