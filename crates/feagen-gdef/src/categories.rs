//! OpenType categories to GDEF glyph classes

// this_file: crates/feagen-gdef/src/categories.rs

use feagen_core::{
    diagnostics::{DiagnosticKind, Diagnostics},
    font::FontSource,
};
use std::str::FromStr;

/// A `public.openTypeCategories` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTypeCategory {
    Unassigned,
    Base,
    Ligature,
    Mark,
    Component,
}

impl FromStr for OpenTypeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unassigned" => Ok(OpenTypeCategory::Unassigned),
            "base" => Ok(OpenTypeCategory::Base),
            "ligature" => Ok(OpenTypeCategory::Ligature),
            "mark" => Ok(OpenTypeCategory::Mark),
            "component" => Ok(OpenTypeCategory::Component),
            other => Err(other.to_string()),
        }
    }
}

/// Glyph names per GDEF class, each in glyph order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphCategories {
    pub base: Vec<String>,
    pub ligature: Vec<String>,
    pub mark: Vec<String>,
    pub component: Vec<String>,
}

/// Sort exported glyphs into GDEF classes
///
/// Glyphs without a category or with `unassigned` stay out of every class.
/// Unknown values are reported and ignored.
pub fn glyph_categories(font: &FontSource, diagnostics: &mut Diagnostics) -> GlyphCategories {
    let mut classes = GlyphCategories::default();
    for glyph in font.glyphs.iter().filter(|g| g.export) {
        let Some(value) = font.categories.get(&glyph.name) else {
            continue;
        };
        let category = match value.parse::<OpenTypeCategory>() {
            Ok(category) => category,
            Err(value) => {
                diagnostics.report(
                    DiagnosticKind::InvalidCategory,
                    format!(
                        "The 'public.openTypeCategories' value of {} is '{value}' when it should be \
                         'unassigned', 'base', 'ligature', 'mark' or 'component'",
                        glyph.name
                    ),
                );
                continue;
            },
        };
        let slot = match category {
            OpenTypeCategory::Unassigned => continue,
            OpenTypeCategory::Base => &mut classes.base,
            OpenTypeCategory::Ligature => &mut classes.ligature,
            OpenTypeCategory::Mark => &mut classes.mark,
            OpenTypeCategory::Component => &mut classes.component,
        };
        slot.push(glyph.name.clone());
    }
    classes
}
