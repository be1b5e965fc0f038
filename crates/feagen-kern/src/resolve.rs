//! Kerning resolution: raw kerning keys to typed, ordered pairs
//!
//! Groups are split by role prefix and pruned to exported glyphs. Each
//! kerning key then resolves to a class of its side, to an exported glyph,
//! or drops the pair. The result is sorted into specificity order.

// this_file: crates/feagen-kern/src/resolve.rs

use crate::pairs::{sort_pairs, KernClass, KerningPair, Side};
use feagen_core::font::{FontSource, SIDE1_PREFIX, SIDE2_PREFIX};
use std::collections::{BTreeMap, BTreeSet};

/// Kerning classes of both sides, keyed by group name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KerningGroups {
    pub side1: BTreeMap<String, KernClass>,
    pub side2: BTreeMap<String, KernClass>,
}

impl KerningGroups {
    /// Full member list of a group of either side
    pub fn members(&self, origin: &str) -> Option<&[String]> {
        self.side1
            .get(origin)
            .or_else(|| self.side2.get(origin))
            .map(|class| class.glyphs.as_slice())
    }
}

/// Partition groups by role and prune non-exported glyphs
///
/// Groups without a kerning prefix are ignored; groups left empty after
/// pruning are dropped.
pub fn split_groups(
    groups: &BTreeMap<String, Vec<String>>,
    exported: &BTreeSet<String>,
) -> KerningGroups {
    let mut result = KerningGroups::default();
    for (name, members) in groups {
        let target = if name.starts_with(SIDE1_PREFIX) {
            &mut result.side1
        } else if name.starts_with(SIDE2_PREFIX) {
            &mut result.side2
        } else {
            continue;
        };
        let class = KernClass::new(
            name.as_str(),
            members.iter().filter(|g| exported.contains(*g)).cloned(),
        );
        if class.glyphs.is_empty() {
            log::debug!("Dropping kerning group '{name}': no exported glyphs");
            continue;
        }
        if class.glyphs.len() < members.len() {
            log::debug!(
                "Pruned {} glyph(s) from kerning group '{name}'",
                members.len() - class.glyphs.len()
            );
        }
        target.insert(name.clone(), class);
    }
    result
}

fn resolve_key(
    key: &str,
    classes: &BTreeMap<String, KernClass>,
    exported: &BTreeSet<String>,
) -> Option<Side> {
    if let Some(class) = classes.get(key) {
        return Some(Side::Class(class.clone()));
    }
    exported.contains(key).then(|| Side::Glyph(key.to_string()))
}

/// Resolve raw `(side1 key, side2 key, value)` entries into ordered pairs
pub fn resolve(
    kerning: &[(&str, &str, f64)],
    groups: &KerningGroups,
    exported: &BTreeSet<String>,
) -> Vec<KerningPair> {
    let mut pairs = Vec::with_capacity(kerning.len());
    for &(first, second, value) in kerning {
        let Some(side1) = resolve_key(first, &groups.side1, exported) else {
            log::debug!("Dropping kerning pair {first} {second}: unknown first key");
            continue;
        };
        let Some(side2) = resolve_key(second, &groups.side2, exported) else {
            log::debug!("Dropping kerning pair {first} {second}: unknown second key");
            continue;
        };
        if side1.is_class() && side2.is_class() && value == 0.0 {
            log::debug!("Dropping zero-valued class pair {first} {second}");
            continue;
        }
        pairs.push(KerningPair::new(side1, side2, value));
    }
    sort_pairs(&mut pairs);
    pairs
}

/// Resolve a font's kerning against its own groups and exported glyphs
pub fn resolve_font(font: &FontSource) -> (KerningGroups, Vec<KerningPair>) {
    let exported = font.exported_glyphs();
    let groups = split_groups(&font.groups, &exported);
    let pairs = resolve(&font.kerning_pairs(), &groups, &exported);
    log::debug!(
        "Resolved {} kerning pair(s) from {} side1 and {} side2 group(s)",
        pairs.len(),
        groups.side1.len(),
        groups.side2.len()
    );
    (groups, pairs)
}
