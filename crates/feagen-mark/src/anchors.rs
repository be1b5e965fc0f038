//! Anchor naming conventions
//!
//! `top` is a base anchor, `_top` the mark anchor that attaches to it and
//! `top_2` the base anchor of a ligature's second component.

// this_file: crates/feagen-mark/src/anchors.rs

use feagen_core::{
    diagnostics::{DiagnosticKind, Diagnostics},
    error::{FeagenError, Result},
    font::{FontSource, Glyph},
    types::ot_round,
};
use std::collections::BTreeSet;

/// An anchor with its name taken apart
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAnchor {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub is_mark: bool,
    /// Name without the mark underscore and the component index
    pub key: String,
    /// 1-based ligature component number
    pub index: Option<u32>,
}

impl NamedAnchor {
    /// Parse an anchor of `glyph`; malformed names are rejected
    pub fn parse(glyph: &str, name: &str, x: f64, y: f64) -> Result<Self> {
        let invalid = |reason: &str| FeagenError::InvalidAnchor {
            glyph: glyph.to_string(),
            anchor: name.to_string(),
            reason: reason.to_string(),
        };

        let (is_mark, rest) = match name.strip_prefix('_') {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        let (key, index) = match rest.rsplit_once('_') {
            Some((key, digits))
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) =>
            {
                let index = digits
                    .parse::<u32>()
                    .map_err(|_| invalid("ligature index out of range"))?;
                (key, Some(index))
            },
            _ => (rest, None),
        };

        if key.is_empty() {
            return Err(invalid("empty anchor name"));
        }
        if index == Some(0) {
            return Err(invalid("ligature component indices start at 1"));
        }
        if is_mark && index.is_some() {
            return Err(invalid("mark anchors cannot carry a ligature index"));
        }

        Ok(Self {
            name: name.to_string(),
            x,
            y,
            is_mark,
            key: key.to_string(),
            index,
        })
    }

    /// Rounded position; with a quantization step the position snaps down
    pub fn position(&self, quantization: Option<u32>) -> (i64, i64) {
        match quantization.filter(|q| *q > 0) {
            Some(q) => {
                let q = f64::from(q);
                (
                    ((self.x / q).floor() * q) as i64,
                    ((self.y / q).floor() * q) as i64,
                )
            },
            None => (ot_round(self.x), ot_round(self.y)),
        }
    }
}

/// A glyph and its parsed anchors
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphAnchors {
    pub glyph: String,
    pub anchors: Vec<NamedAnchor>,
}

impl GlyphAnchors {
    fn from_glyph(glyph: &Glyph) -> Result<Self> {
        let anchors = glyph
            .anchors
            .iter()
            .map(|a| NamedAnchor::parse(&glyph.name, &a.name, a.x, a.y))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            glyph: glyph.name.clone(),
            anchors,
        })
    }

    /// First anchor with this exact name
    pub fn get(&self, name: &str) -> Option<&NamedAnchor> {
        self.anchors.iter().find(|a| a.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Anchored glyphs in glyph order
///
/// Only exported glyphs are considered, and when `include` is given only
/// the glyphs it names. A glyph with a malformed anchor is skipped as a
/// whole and reported.
pub fn collect_anchors(
    font: &FontSource,
    include: Option<&BTreeSet<String>>,
    diagnostics: &mut Diagnostics,
) -> Vec<GlyphAnchors> {
    let mut result = Vec::new();
    for glyph in font.glyphs.iter().filter(|g| g.export && !g.anchors.is_empty()) {
        if include.is_some_and(|names| !names.contains(&glyph.name)) {
            log::debug!("Glyph '{}' not in GDEF classes, ignoring its anchors", glyph.name);
            continue;
        }
        match GlyphAnchors::from_glyph(glyph) {
            Ok(anchors) => result.push(anchors),
            Err(e) => diagnostics.report(DiagnosticKind::InvalidAnchor, e.to_string()),
        }
    }
    result
}
