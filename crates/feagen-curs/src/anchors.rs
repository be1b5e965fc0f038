//! Entry and exit anchor pairs

use feagen_core::{ast::FeaAnchor, font::FontSource, types::ot_round};
use std::collections::BTreeSet;

const ENTRY: &str = "entry";
const EXIT: &str = "exit";

/// Names of one entry/exit anchor pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CursivePair {
    pub entry: String,
    pub exit: String,
}

impl CursivePair {
    /// `entry` and `exit`
    pub fn unnamed() -> Self {
        Self {
            entry: ENTRY.to_string(),
            exit: EXIT.to_string(),
        }
    }

    /// `entry.<name>` and `exit.<name>`
    pub fn named(name: &str) -> Self {
        Self {
            entry: format!("{ENTRY}.{name}"),
            exit: format!("{EXIT}.{name}"),
        }
    }

    /// The `<name>` of a named pair
    pub fn suffix(&self) -> Option<&str> {
        self.entry.strip_prefix(ENTRY)?.strip_prefix('.')
    }
}

/// Pairs used by the exported glyphs, unnamed pair first
///
/// The unnamed pair is used as soon as either anchor exists. A named pair
/// needs both its entry and its exit name somewhere in the font.
pub fn cursive_pairs(font: &FontSource) -> Vec<CursivePair> {
    let names: BTreeSet<&str> = font
        .glyphs
        .iter()
        .filter(|g| g.export)
        .flat_map(|g| g.anchors.iter().map(|a| a.name.as_str()))
        .collect();

    let mut pairs = Vec::new();
    if names.contains(ENTRY) || names.contains(EXIT) {
        pairs.push(CursivePair::unnamed());
    }
    for name in &names {
        let Some(suffix) = name.strip_prefix("entry.").filter(|s| !s.is_empty()) else {
            continue;
        };
        let pair = CursivePair::named(suffix);
        if names.contains(pair.exit.as_str()) {
            pairs.push(pair);
        } else {
            log::debug!("Anchor '{name}' has no matching '{}', ignored", pair.exit);
        }
    }
    pairs
}

/// One glyph's side of a cursive connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursiveAnchors {
    pub glyph: String,
    pub entry: Option<FeaAnchor>,
    pub exit: Option<FeaAnchor>,
}

/// Exported glyphs carrying either anchor of `pair`, in glyph order
///
/// When a glyph repeats an anchor name the first one is used.
pub fn collect_cursive_anchors(font: &FontSource, pair: &CursivePair) -> Vec<CursiveAnchors> {
    font.glyphs
        .iter()
        .filter(|g| g.export)
        .filter_map(|glyph| {
            let find = |name: &str| {
                glyph
                    .anchors
                    .iter()
                    .find(|a| a.name == name)
                    .map(|a| FeaAnchor::new(ot_round(a.x), ot_round(a.y)))
            };
            let entry = find(&pair.entry);
            let exit = find(&pair.exit);
            if entry.is_none() && exit.is_none() {
                return None;
            }
            Some(CursiveAnchors {
                glyph: glyph.name.clone(),
                entry,
                exit,
            })
        })
        .collect()
}
