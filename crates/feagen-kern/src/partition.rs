//! Routing pairs into per-script buckets
//!
//! Every pair is split by the scripts of its glyphs. Each split candidate
//! is checked for direction and bidi conflicts before it is routed, so a
//! conflicting candidate is dropped even when its scripts would match.

// this_file: crates/feagen-kern/src/partition.rs

use crate::pairs::KerningPair;
use feagen_core::{
    diagnostics::{DiagnosticKind, Diagnostics},
    types::{BidiType, Direction, NEUTRAL_SCRIPT},
};
use feagen_unicode::GlyphClassification;
use std::collections::{BTreeMap, BTreeSet};

/// Script code → pairs routed there, in specificity order
pub type ScriptBuckets = BTreeMap<String, Vec<KerningPair>>;

fn side_scripts(glyphs: &[&str], classification: &GlyphClassification) -> BTreeSet<String> {
    glyphs
        .iter()
        .flat_map(|g| classification.scripts_of(g))
        .collect()
}

fn route(script1: &str, script2: &str) -> Option<String> {
    if script1 == script2 {
        Some(script1.to_string())
    } else if script1 == NEUTRAL_SCRIPT {
        Some(script2.to_string())
    } else if script2 == NEUTRAL_SCRIPT {
        Some(script1.to_string())
    } else {
        None
    }
}

/// Split one pair into routed candidates
fn split_pair(
    pair: &KerningPair,
    classification: &GlyphClassification,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, KerningPair)> {
    let scripts1 = side_scripts(&pair.side1.glyphs(), classification);
    let scripts2 = side_scripts(&pair.side2.glyphs(), classification);
    let mut routed = Vec::new();

    for script1 in &scripts1 {
        let Some(side1) = pair
            .side1
            .restrict(|g| classification.scripts_of(g).contains(script1))
        else {
            continue;
        };
        for script2 in &scripts2 {
            let Some(side2) = pair
                .side2
                .restrict(|g| classification.scripts_of(g).contains(script2))
            else {
                continue;
            };
            let mut candidate = pair.with_sides(side1.clone(), side2);
            let mut directions = BTreeSet::new();
            let mut bidi = BTreeSet::new();
            for glyph in candidate.glyphs() {
                directions.extend(classification.directions_of(glyph));
                bidi.extend(classification.bidi_of(glyph));
            }

            if directions.contains(&Direction::LeftToRight)
                && directions.contains(&Direction::RightToLeft)
            {
                diagnostics.report(
                    DiagnosticKind::MixedDirection,
                    format!(
                        "Skipping kerning pair <{} {} {}> with mixed direction (LTR, RTL)",
                        candidate.side1, candidate.side2, candidate.value
                    ),
                );
                continue;
            }
            if bidi.contains(&BidiType::L) && bidi.contains(&BidiType::R) {
                diagnostics.report(
                    DiagnosticKind::ConflictingBidi,
                    format!(
                        "Skipping kerning pair <{} {} {}> with conflicting bidi types (L, R)",
                        candidate.side1, candidate.side2, candidate.value
                    ),
                );
                continue;
            }

            candidate.directions = directions;
            candidate.bidi = bidi;
            match route(script1, script2) {
                Some(script) => {
                    candidate.scripts = BTreeSet::from([script.clone()]);
                    routed.push((script, candidate));
                },
                None => diagnostics.report(
                    DiagnosticKind::CrossScript,
                    format!(
                        "Skipping kerning pair <{} {} {}> across scripts {script1} and {script2}",
                        candidate.side1, candidate.side2, candidate.value
                    ),
                ),
            }
        }
    }
    routed
}

/// Route every pair into its script buckets
///
/// Input order is preserved inside each bucket.
pub fn partition(
    pairs: &[KerningPair],
    classification: &GlyphClassification,
    diagnostics: &mut Diagnostics,
) -> ScriptBuckets {
    let mut buckets = ScriptBuckets::new();
    for pair in pairs {
        for (script, candidate) in split_pair(pair, classification, diagnostics) {
            buckets.entry(script).or_default().push(candidate);
        }
    }
    for (script, bucket) in &buckets {
        log::debug!("Script {script}: {} kerning pair(s)", bucket.len());
    }
    buckets
}
