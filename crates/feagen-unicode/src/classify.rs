//! Glyph classification by script, direction and bidi type
//!
//! Encoded glyphs are classified from their codepoints' script extensions
//! and bidi classes. Unencoded glyphs reachable through one-way
//! substitutions inherit from the glyphs they are reachable from.
//! Glyphs that end up with no data land in the neutral bucket.

use crate::scripts::is_neutral;
use feagen_core::{
    font::FontSource,
    types::{BidiType, Direction, NEUTRAL_SCRIPT},
    UnicodeProperties,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Per-glyph scripts, directions and bidi types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlyphClassification {
    pub scripts: BTreeMap<String, BTreeSet<String>>,
    pub directions: BTreeMap<String, BTreeSet<Direction>>,
    pub bidi: BTreeMap<String, BTreeSet<BidiType>>,
}

impl GlyphClassification {
    /// Scripts of a glyph; unclassified glyphs are neutral
    pub fn scripts_of(&self, glyph: &str) -> BTreeSet<String> {
        self.scripts
            .get(glyph)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([NEUTRAL_SCRIPT.to_string()]))
    }

    pub fn directions_of(&self, glyph: &str) -> BTreeSet<Direction> {
        self.directions.get(glyph).cloned().unwrap_or_default()
    }

    pub fn bidi_of(&self, glyph: &str) -> BTreeSet<BidiType> {
        self.bidi.get(glyph).cloned().unwrap_or_default()
    }

    /// Every script seen on any glyph
    pub fn all_scripts(&self) -> BTreeSet<String> {
        self.scripts.values().flatten().cloned().collect()
    }
}

/// Classifies glyphs with injected Unicode data and a configurable alias table
pub struct GlyphClassifier {
    properties: Arc<dyn UnicodeProperties>,
    aliases: BTreeMap<String, String>,
    known_scripts: Option<BTreeSet<String>>,
}

impl GlyphClassifier {
    /// Classifier with the default aliases (Hiragana folds into Katakana)
    pub fn new(properties: Arc<dyn UnicodeProperties>) -> Self {
        Self {
            properties,
            aliases: default_aliases(),
            known_scripts: None,
        }
    }

    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Restrict multi-script glyphs to these scripts when they carry any of them
    pub fn with_known_scripts(mut self, scripts: BTreeSet<String>) -> Self {
        self.known_scripts = Some(scripts).filter(|s| !s.is_empty());
        self
    }

    fn bucket(&self, script: String) -> String {
        let script = self.aliases.get(&script).cloned().unwrap_or(script);
        if is_neutral(&script) {
            NEUTRAL_SCRIPT.to_string()
        } else {
            script
        }
    }

    /// Classify glyphs from their codepoints and the substitution closure
    pub fn classify(
        &self,
        codepoints: &BTreeMap<String, Vec<u32>>,
        closure: &BTreeMap<String, BTreeSet<String>>,
    ) -> GlyphClassification {
        let mut result = GlyphClassification::default();

        for (glyph, cps) in codepoints {
            let mut scripts = BTreeSet::new();
            let mut bidi = BTreeSet::new();
            for &cp in cps {
                let extensions = self.properties.script_extensions(cp);
                if extensions.is_empty() {
                    scripts.insert(NEUTRAL_SCRIPT.to_string());
                }
                scripts.extend(extensions.into_iter().map(|s| self.bucket(s)));
                bidi.extend(self.properties.bidi_type(cp));
            }
            result.scripts.insert(glyph.clone(), scripts);
            if !bidi.is_empty() {
                result.bidi.insert(glyph.clone(), bidi);
            }
        }

        // Precomputed closure: one pass reaches everything reachable.
        let mut inherited: BTreeMap<String, (BTreeSet<String>, BTreeSet<BidiType>)> =
            BTreeMap::new();
        for (source, targets) in closure {
            let Some(scripts) = result.scripts.get(source) else {
                continue;
            };
            let bidi = result.bidi_of(source);
            for target in targets.iter().filter(|t| !codepoints.contains_key(*t)) {
                let entry = inherited.entry(target.clone()).or_default();
                entry.0.extend(scripts.iter().cloned());
                entry.1.extend(bidi.iter().copied());
            }
        }
        for (glyph, (scripts, bidi)) in inherited {
            log::trace!("{glyph} inherits scripts {scripts:?} through substitution");
            result.scripts.insert(glyph.clone(), scripts);
            if !bidi.is_empty() {
                result.bidi.insert(glyph, bidi);
            }
        }

        for (glyph, scripts) in result.scripts.iter_mut() {
            if let Some(known) = &self.known_scripts {
                let kept: BTreeSet<String> = scripts.intersection(known).cloned().collect();
                if kept.iter().any(|s| s != NEUTRAL_SCRIPT) {
                    *scripts = kept;
                }
            }
            if scripts.iter().any(|s| s != NEUTRAL_SCRIPT) {
                scripts.remove(NEUTRAL_SCRIPT);
            }
            let directions: BTreeSet<Direction> = scripts
                .iter()
                .filter_map(|s| self.properties.horizontal_direction(s))
                .collect();
            if !directions.is_empty() {
                result.directions.insert(glyph.clone(), directions);
            }
        }

        result
    }

    /// Classify every encoded or substitution-reachable glyph of a font
    pub fn classify_font(&self, font: &FontSource) -> GlyphClassification {
        self.classify(&font.codepoints(), &font.substitutions)
    }
}

pub fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Hira".to_string(), "Kana".to_string()),
        ("Hrkt".to_string(), "Kana".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny fixed table so tests do not depend on the Unicode version
    struct TableProperties;

    impl UnicodeProperties for TableProperties {
        fn name(&self) -> &'static str {
            "table"
        }

        fn script_extensions(&self, codepoint: u32) -> Vec<String> {
            let scripts: &[&str] = match codepoint {
                0x41..=0x5A | 0x61..=0x7A => &["Latn"],
                0x30..=0x39 => &["Zyyy"],
                0x0301 => &["Zinh"],
                0x0627 | 0x0644 => &["Arab"],
                0x0660..=0x0669 => &["Arab", "Thaa"],
                0x3042 => &["Hira"],
                0x30A2 => &["Kana"],
                0x0964 => &["Beng", "Deva", "Zyyy"],
                _ => &[],
            };
            scripts.iter().map(|s| (*s).to_string()).collect()
        }

        fn horizontal_direction(&self, script: &str) -> Option<Direction> {
            crate::scripts::script_direction(script)
        }

        fn bidi_type(&self, codepoint: u32) -> Option<BidiType> {
            match codepoint {
                0x0627 | 0x0644 => Some(BidiType::R),
                0x41..=0x5A | 0x61..=0x7A | 0x30..=0x39 | 0x0660..=0x0669 => Some(BidiType::L),
                _ => None,
            }
        }
    }

    fn classifier() -> GlyphClassifier {
        GlyphClassifier::new(Arc::new(TableProperties))
    }

    fn cps(entries: &[(&str, u32)]) -> BTreeMap<String, Vec<u32>> {
        entries
            .iter()
            .map(|(g, cp)| ((*g).to_string(), vec![*cp]))
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_basic_scripts_and_directions() {
        let result = classifier().classify(
            &cps(&[("a", 0x61), ("alef-ar", 0x627), ("seven", 0x37)]),
            &BTreeMap::new(),
        );
        assert_eq!(result.scripts_of("a"), set(&["Latn"]));
        assert_eq!(result.scripts_of("alef-ar"), set(&["Arab"]));
        assert_eq!(result.scripts_of("seven"), set(&["Zyyy"]));
        assert_eq!(
            result.directions_of("alef-ar"),
            BTreeSet::from([Direction::RightToLeft])
        );
        assert!(result.directions_of("seven").is_empty());
        assert_eq!(result.bidi_of("seven"), BTreeSet::from([BidiType::L]));
    }

    #[test]
    fn test_inherited_folds_into_neutral() {
        let result = classifier().classify(&cps(&[("acutecomb", 0x301)]), &BTreeMap::new());
        assert_eq!(result.scripts_of("acutecomb"), set(&["Zyyy"]));
        assert!(result.bidi_of("acutecomb").is_empty());
    }

    #[test]
    fn test_neutral_removed_next_to_specific_script() {
        let result = classifier().classify(&cps(&[("danda", 0x964)]), &BTreeMap::new());
        assert_eq!(result.scripts_of("danda"), set(&["Beng", "Deva"]));
    }

    #[test]
    fn test_unknown_glyph_defaults_to_neutral() {
        let result = classifier().classify(&cps(&[("pua", 0xE000)]), &BTreeMap::new());
        assert_eq!(result.scripts_of("pua"), set(&["Zyyy"]));
        assert_eq!(result.scripts_of("never-seen"), set(&["Zyyy"]));
    }

    #[test]
    fn test_aliases() {
        let result = classifier().classify(
            &cps(&[("a-hira", 0x3042), ("a-kata", 0x30A2)]),
            &BTreeMap::new(),
        );
        assert_eq!(result.scripts_of("a-hira"), set(&["Kana"]));
        assert_eq!(result.scripts_of("a-kata"), set(&["Kana"]));

        let plain = classifier()
            .with_aliases(BTreeMap::new())
            .classify(&cps(&[("a-hira", 0x3042)]), &BTreeMap::new());
        assert_eq!(plain.scripts_of("a-hira"), set(&["Hira"]));
    }

    #[test]
    fn test_closure_projects_onto_unencoded_glyphs() {
        let closure = BTreeMap::from([
            ("lam-ar".to_string(), set(&["lam-ar.init"])),
            // an encoded target keeps its own classification
            ("a".to_string(), set(&["alef-ar", "a.sc"])),
        ]);
        let result = classifier().classify(
            &cps(&[("lam-ar", 0x644), ("a", 0x61), ("alef-ar", 0x627)]),
            &closure,
        );
        assert_eq!(result.scripts_of("lam-ar.init"), set(&["Arab"]));
        assert_eq!(
            result.directions_of("lam-ar.init"),
            BTreeSet::from([Direction::RightToLeft])
        );
        assert_eq!(result.bidi_of("lam-ar.init"), BTreeSet::from([BidiType::R]));
        assert_eq!(result.scripts_of("alef-ar"), set(&["Arab"]));
        assert_eq!(result.scripts_of("a.sc"), set(&["Latn"]));
    }

    #[test]
    fn test_known_scripts_restrict_multi_script_glyphs() {
        let glyphs = cps(&[("four-ar", 0x664), ("a", 0x61)]);
        let unrestricted = classifier().classify(&glyphs, &BTreeMap::new());
        assert_eq!(unrestricted.scripts_of("four-ar"), set(&["Arab", "Thaa"]));

        let restricted = classifier()
            .with_known_scripts(set(&["Arab", "Zyyy"]))
            .classify(&glyphs, &BTreeMap::new());
        assert_eq!(restricted.scripts_of("four-ar"), set(&["Arab"]));
        // no known script at all: keep what the glyph has
        assert_eq!(restricted.scripts_of("a"), set(&["Latn"]));
    }
}
