//! Group refinement: disjoint class coverage within a lookup
//!
//! OpenType class-pair subtables need each glyph in at most one class per
//! side. The classes used by class-class pairs are replaced by their
//! coarsest common refinement: two glyphs share a refined class exactly
//! when they belong to the same set of original classes.

// this_file: crates/feagen-kern/src/refine.rs

use crate::pairs::{sort_pairs, KernClass, KerningPair, Side};
use feagen_core::diagnostics::{DiagnosticKind, Diagnostics};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Which {
    First,
    Second,
}

fn side_of(pair: &KerningPair, which: Which) -> &Side {
    match which {
        Which::First => &pair.side1,
        Which::Second => &pair.side2,
    }
}

/// Refined pieces of every distinct class used on one side
///
/// Keyed by the class's sorted members; each value lists the pieces in
/// member order.
fn refine_side(pairs: &[KerningPair], which: Which) -> BTreeMap<Vec<String>, Vec<Vec<String>>> {
    let mut classes: Vec<&KernClass> = Vec::new();
    for pair in pairs.iter().filter(|p| p.is_class_pair()) {
        if let Side::Class(class) = side_of(pair, which) {
            if !classes.iter().any(|c| c.sorted_glyphs() == class.sorted_glyphs()) {
                classes.push(class);
            }
        }
    }

    // glyph → indices of the classes it belongs to
    let mut signatures: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for (index, class) in classes.iter().enumerate() {
        for glyph in &class.glyphs {
            signatures.entry(glyph.as_str()).or_default().insert(index);
        }
    }

    classes
        .iter()
        .map(|class| {
            let mut pieces: Vec<(BTreeSet<usize>, Vec<String>)> = Vec::new();
            for glyph in &class.glyphs {
                let signature = &signatures[glyph.as_str()];
                match pieces.iter_mut().find(|(s, _)| s == signature) {
                    Some((_, members)) => members.push(glyph.clone()),
                    None => pieces.push((signature.clone(), vec![glyph.clone()])),
                }
            }
            let key = class.sorted_glyphs().into_iter().map(String::from).collect();
            (key, pieces.into_iter().map(|(_, members)| members).collect())
        })
        .collect()
}

fn split_side(side: &Side, pieces: &BTreeMap<Vec<String>, Vec<Vec<String>>>) -> Vec<Side> {
    let Side::Class(class) = side else {
        return vec![side.clone()];
    };
    let key: Vec<String> = class.sorted_glyphs().into_iter().map(String::from).collect();
    match pieces.get(&key) {
        Some(parts) if parts.len() > 1 => {
            let mut sides: Vec<Side> = parts
                .iter()
                .map(|members| Side::Class(KernClass::new(class.origin.as_str(), members.iter().cloned())))
                .collect();
            sides.sort_by(|a, b| a.sorted_glyphs().cmp(&b.sorted_glyphs()));
            sides
        },
        _ => vec![side.clone()],
    }
}

/// Rewrite class-class pairs over the common refinement of both sides
///
/// Pairs must arrive in specificity order. When two pairs end up covering
/// the same pair of glyph sets, the first one wins and the later one is
/// reported. Pairs involving a single glyph pass through unchanged.
pub fn refine(pairs: Vec<KerningPair>, diagnostics: &mut Diagnostics) -> Vec<KerningPair> {
    if pairs.iter().filter(|p| p.is_class_pair()).count() < 2 {
        return pairs;
    }
    let first_pieces = refine_side(&pairs, Which::First);
    let second_pieces = refine_side(&pairs, Which::Second);

    let mut seen: BTreeMap<(Vec<String>, Vec<String>), f64> = BTreeMap::new();
    let mut refined = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        if !pair.is_class_pair() {
            refined.push(pair.clone());
            continue;
        }
        for side1 in split_side(&pair.side1, &first_pieces) {
            for side2 in split_side(&pair.side2, &second_pieces) {
                let key = (
                    side1.sorted_glyphs().into_iter().map(String::from).collect(),
                    side2.sorted_glyphs().into_iter().map(String::from).collect(),
                );
                if let Some(kept) = seen.get(&key) {
                    diagnostics.report(
                        DiagnosticKind::DuplicatePair,
                        format!(
                            "Refined kerning pair <{side1} {side2} {}> already covered with value {kept}",
                            pair.value
                        ),
                    );
                    continue;
                }
                seen.insert(key, pair.value);
                refined.push(pair.with_sides(side1.clone(), side2));
            }
        }
    }
    sort_pairs(&mut refined);
    refined
}
