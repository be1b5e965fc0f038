//! Property tests for kerning assembly
//!
//! Random groups and kerning over a Latin glyph set; every generated lookup
//! must keep its class-pair classes disjoint and its values quantized.

use feagen_core::{
    ast::{GlyphRef, Statement},
    Diagnostics, FeatureFile, FeatureWriter, FontSource, Glyph, Mode,
};
use feagen_kern::{lookups::quantize, KernFeatureWriter};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const GLYPHS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn groups_strategy() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    prop::collection::vec(prop::collection::btree_set(0usize..8, 1..5), 1..5)
}

fn font_strategy() -> impl Strategy<Value = FontSource> {
    let kerning = prop::collection::vec((0usize..12, 0usize..12, -200i32..200), 1..24);
    (groups_strategy(), groups_strategy(), kerning).prop_map(|(side1, side2, kerning)| {
        let mut font = FontSource::new();
        for (i, name) in GLYPHS.iter().enumerate() {
            font.push_glyph(Glyph::new(*name).with_unicode(0x61 + i as u32));
        }
        for (i, members) in side1.iter().enumerate() {
            font.add_group(&format!("public.kern1.G{i}"), members.iter().map(|m| GLYPHS[*m]));
        }
        for (i, members) in side2.iter().enumerate() {
            font.add_group(&format!("public.kern2.H{i}"), members.iter().map(|m| GLYPHS[*m]));
        }
        // keys 0..8 are glyphs, 8.. are groups
        let key = |k: usize, prefix: &str| {
            if k < GLYPHS.len() {
                GLYPHS[k].to_string()
            } else {
                format!("{prefix}{}", k - GLYPHS.len())
            }
        };
        for (first, second, value) in kerning {
            font.add_kerning(
                &key(first, "public.kern1.G"),
                &key(second, "public.kern2.H"),
                f64::from(value),
            );
        }
        font
    })
}

fn class_members(doc: &FeatureFile) -> BTreeMap<String, BTreeSet<String>> {
    doc.statements
        .iter()
        .filter_map(|s| match s {
            Statement::GlyphClass(def) => {
                Some((def.name.clone(), def.glyphs.iter().cloned().collect()))
            },
            _ => None,
        })
        .collect()
}

// Property: class-pair classes of one side never overlap inside a lookup
proptest! {
    #[test]
    fn prop_lookup_classes_are_disjoint(font in font_strategy()) {
        let writer = KernFeatureWriter::builder()
            .mode(Mode::Skip)
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut doc = FeatureFile::new();
        let mut diagnostics = Diagnostics::new();
        prop_assert!(writer.write(&font, &mut doc, &mut diagnostics).is_ok());

        let members = class_members(&doc);
        for statement in &doc.statements {
            let Statement::Lookup(lookup) = statement else { continue };
            let mut firsts = BTreeSet::new();
            let mut seconds = BTreeSet::new();
            for rule in &lookup.statements {
                if let Statement::PairPos(pair) = rule {
                    if let (GlyphRef::Class(a), GlyphRef::Class(b)) = (&pair.first, &pair.second) {
                        firsts.insert(a.clone());
                        seconds.insert(b.clone());
                    }
                }
            }
            for names in [&firsts, &seconds] {
                let names: Vec<&String> = names.iter().collect();
                for (i, a) in names.iter().enumerate() {
                    for b in &names[i + 1..] {
                        prop_assert!(members[*a].is_disjoint(&members[*b]), "{a} and {b} overlap");
                    }
                }
            }
        }
    }
}

// Property: quantized values are multiples of the step within half a step
proptest! {
    #[test]
    fn prop_quantize_snaps_within_half_step(value in -2000.0f64..2000.0, step in 1u32..50) {
        let snapped = quantize(value, step);
        let step = i64::from(step);
        prop_assert_eq!(snapped % step, 0);
        prop_assert!((snapped as f64 - value).abs() <= step as f64 / 2.0 + 1e-9);
    }
}
