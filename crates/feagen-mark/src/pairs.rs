//! Anchor pairing
//!
//! Works on anchor names only: which base anchors have a matching mark
//! anchor somewhere in the font, and which ligature component series are
//! complete enough to use.

// this_file: crates/feagen-mark/src/pairs.rs

use crate::anchors::GlyphAnchors;
use std::collections::{BTreeMap, BTreeSet};

/// A base anchor and the mark anchor that attaches to it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnchorPair {
    /// `top`
    pub base: String,
    /// `_top`
    pub mark: String,
}

/// Ligature component anchors `key_1, key_2, …` and their mark anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigatureSeries {
    pub key: String,
    pub mark: String,
    /// Component anchor names, first component first
    pub components: Vec<String>,
}

impl LigatureSeries {
    /// 1-based index of a component anchor name
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c == name).map(|i| i + 1)
    }
}

/// Everything the lookup builder needs to know about anchor names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorPairs {
    pub base: Vec<AnchorPair>,
    pub ligature: Vec<LigatureSeries>,
    /// Mark-to-mark pairs; the same names as the base pairs
    pub mark: Vec<AnchorPair>,
}

impl AnchorPairs {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.ligature.is_empty()
    }

    /// Mark anchor names referenced by any pair or series
    pub fn mark_anchor_names(&self) -> BTreeSet<&str> {
        self.base
            .iter()
            .chain(&self.mark)
            .map(|p| p.mark.as_str())
            .chain(self.ligature.iter().map(|s| s.mark.as_str()))
            .collect()
    }
}

/// Pair up the anchor names found across `glyphs`
pub fn build_anchor_pairs(glyphs: &[GlyphAnchors]) -> AnchorPairs {
    let mut base_keys: BTreeSet<&str> = BTreeSet::new();
    let mut mark_names: BTreeSet<&str> = BTreeSet::new();
    let mut indices: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();

    for anchor in glyphs.iter().flat_map(|g| &g.anchors) {
        match (anchor.is_mark, anchor.index) {
            (true, _) => {
                mark_names.insert(anchor.name.as_str());
            },
            (false, None) => {
                base_keys.insert(anchor.key.as_str());
            },
            (false, Some(index)) => {
                indices.entry(anchor.key.as_str()).or_default().insert(index);
            },
        }
    }

    let base: Vec<AnchorPair> = base_keys
        .iter()
        .map(|key| AnchorPair {
            base: (*key).to_string(),
            mark: format!("_{key}"),
        })
        .filter(|pair| mark_names.contains(pair.mark.as_str()))
        .collect();

    let mut ligature = Vec::new();
    for (key, present) in indices {
        let mark = format!("_{key}");
        if !mark_names.contains(mark.as_str()) {
            continue;
        }
        let components: Vec<String> = (1..)
            .take_while(|i| present.contains(i))
            .map(|i| format!("{key}_{i}"))
            .collect();
        if components.len() < present.len() {
            log::debug!(
                "Ligature anchors '{key}_*' stop at component {}; later components ignored",
                components.len()
            );
        }
        if components.is_empty() {
            continue;
        }
        ligature.push(LigatureSeries {
            key: key.to_string(),
            mark,
            components,
        });
    }

    let mark = base.clone();
    AnchorPairs {
        base,
        ligature,
        mark,
    }
}
