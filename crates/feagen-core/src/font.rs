//! Read-only font data consumed by the writers
//!
//! Glyphs, groups, kerning, anchors, OpenType categories and the
//! substitution closure. Everything arrives fully materialized; writers
//! never mutate it.

// this_file: crates/feagen-core/src/font.rs

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Prefix of first-side kerning groups
pub const SIDE1_PREFIX: &str = "public.kern1.";
/// Prefix of second-side kerning groups
pub const SIDE2_PREFIX: &str = "public.kern2.";

/// An attachment point as stored in the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

fn default_export() -> bool {
    true
}

/// One glyph of the source font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unicodes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<Anchor>,
    #[serde(default = "default_export")]
    pub export: bool,
    #[serde(default)]
    pub width: f64,
}

impl Glyph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unicodes: Vec::new(),
            anchors: Vec::new(),
            export: true,
            width: 0.0,
        }
    }

    pub fn with_unicode(mut self, codepoint: u32) -> Self {
        self.unicodes.push(codepoint);
        self
    }

    pub fn with_anchor(mut self, name: impl Into<String>, x: f64, y: f64) -> Self {
        self.anchors.push(Anchor {
            name: name.into(),
            x,
            y,
        });
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn unexported(mut self) -> Self {
        self.export = false;
        self
    }
}

/// The font data a synthesis pass reads
///
/// The order of `glyphs` is the glyph order; rules that walk glyphs
/// follow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontSource {
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    /// first key → second key → value; keys are glyph or group names
    #[serde(default)]
    pub kerning: BTreeMap<String, BTreeMap<String, f64>>,
    /// `public.openTypeCategories`: glyph → base, mark, ligature, component
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, String>,
    /// glyph → glyphs reachable from it through one-way substitutions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, BTreeSet<String>>,
}

impl FontSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading font source from {}", path.as_ref().display());
        Self::from_json(&text)
    }

    pub fn push_glyph(&mut self, glyph: Glyph) -> &mut Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn add_group<I, S>(&mut self, name: &str, glyphs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.to_string(), glyphs.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_kerning(&mut self, first: &str, second: &str, value: f64) -> &mut Self {
        self.kerning
            .entry(first.to_string())
            .or_default()
            .insert(second.to_string(), value);
        self
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    /// Name → glyph index for repeated lookups
    pub fn glyph_map(&self) -> BTreeMap<&str, &Glyph> {
        self.glyphs.iter().map(|g| (g.name.as_str(), g)).collect()
    }

    /// Glyph names in glyph order
    pub fn glyph_order(&self) -> impl Iterator<Item = &str> {
        self.glyphs.iter().map(|g| g.name.as_str())
    }

    pub fn exported_glyphs(&self) -> BTreeSet<String> {
        self.glyphs
            .iter()
            .filter(|g| g.export)
            .map(|g| g.name.clone())
            .collect()
    }

    /// Codepoints of every glyph that has at least one
    pub fn codepoints(&self) -> BTreeMap<String, Vec<u32>> {
        self.glyphs
            .iter()
            .filter(|g| !g.unicodes.is_empty())
            .map(|g| (g.name.clone(), g.unicodes.clone()))
            .collect()
    }

    /// Glyphs whose OpenType category is `mark`
    pub fn category_marks(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .filter(|(_, category)| category.as_str() == "mark")
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Flattened kerning in sorted key order
    pub fn kerning_pairs(&self) -> Vec<(&str, &str, f64)> {
        self.kerning
            .iter()
            .flat_map(|(first, row)| {
                row.iter()
                    .map(move |(second, value)| (first.as_str(), second.as_str(), *value))
            })
            .collect()
    }
}
