// this_file: crates/feagen-unicode/src/lib.rs

//! Unicode character data and glyph classification for the layout writers.

pub mod classify;
pub mod scripts;

use feagen_core::{
    types::{BidiType, Direction},
    UnicodeProperties,
};
use icu_properties::{
    props::Script,
    script::{ScriptWithExtensions, ScriptWithExtensionsBorrowed},
    PropertyNamesShort, PropertyNamesShortBorrowed,
};
use unicode_bidi::{bidi_class, BidiClass};

pub use classify::{GlyphClassification, GlyphClassifier};
pub use scripts::{ot_tag_to_script, ot_tags_from_script, script_direction};

/// Unicode properties backed by ICU's baked data
pub struct IcuProperties {
    extensions: ScriptWithExtensionsBorrowed<'static>,
    names: PropertyNamesShortBorrowed<'static, Script>,
}

impl IcuProperties {
    pub fn new() -> Self {
        Self {
            extensions: ScriptWithExtensions::new(),
            names: PropertyNamesShort::<Script>::new(),
        }
    }
}

impl Default for IcuProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeProperties for IcuProperties {
    fn name(&self) -> &'static str {
        "icu"
    }

    fn script_extensions(&self, codepoint: u32) -> Vec<String> {
        let Some(ch) = char::from_u32(codepoint) else {
            return Vec::new();
        };
        self.extensions
            .get_script_extensions_val(ch)
            .iter()
            .filter_map(|script| self.names.get(script))
            .map(str::to_string)
            .collect()
    }

    fn horizontal_direction(&self, script: &str) -> Option<Direction> {
        script_direction(script)
    }

    fn bidi_type(&self, codepoint: u32) -> Option<BidiType> {
        let ch = char::from_u32(codepoint)?;
        match bidi_class(ch) {
            BidiClass::R | BidiClass::AL => Some(BidiType::R),
            BidiClass::L | BidiClass::AN | BidiClass::EN => Some(BidiType::L),
            _ => None,
        }
    }
}

#[cfg(test)]
mod proptests;
