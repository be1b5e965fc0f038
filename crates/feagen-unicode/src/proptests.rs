use super::*;
use crate::scripts::{is_neutral, RTL_SCRIPTS};
use feagen_core::NEUTRAL_SCRIPT;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn classify_codepoints(cps: &[u32]) -> GlyphClassification {
    let classifier = GlyphClassifier::new(Arc::new(IcuProperties::new()));
    let codepoints: BTreeMap<String, Vec<u32>> = cps
        .iter()
        .enumerate()
        .map(|(i, cp)| (format!("g{i}"), vec![*cp]))
        .collect();
    classifier.classify(&codepoints, &BTreeMap::new())
}

// Property: the neutral bucket never coexists with a specific script
proptest! {
    #[test]
    fn prop_neutral_is_exclusive(cps in prop::collection::vec(0u32..0x3000, 1..32)) {
        let result = classify_codepoints(&cps);
        for scripts in result.scripts.values() {
            prop_assert!(!scripts.is_empty());
            if scripts.contains(NEUTRAL_SCRIPT) {
                prop_assert_eq!(scripts.len(), 1);
            }
            prop_assert!(scripts.iter().all(|s| s == NEUTRAL_SCRIPT || !is_neutral(s)));
        }
    }
}

// Property: classification is a pure function of its input
proptest! {
    #[test]
    fn prop_classification_is_deterministic(cps in prop::collection::vec(0u32..0x11000, 0..24)) {
        prop_assert_eq!(classify_codepoints(&cps), classify_codepoints(&cps));
    }
}

// Property: directions follow the scripts a glyph ended up with
proptest! {
    #[test]
    fn prop_directions_match_scripts(cps in prop::collection::vec(0u32..0x2000, 1..32)) {
        let result = classify_codepoints(&cps);
        for (glyph, scripts) in &result.scripts {
            let has_rtl = scripts.iter().any(|s| RTL_SCRIPTS.contains(&s.as_str()));
            prop_assert_eq!(
                result.directions_of(glyph).contains(&Direction::RightToLeft),
                has_rtl
            );
        }
    }
}

// Property: plain four-letter codes survive the OpenType tag round trip
proptest! {
    #[test]
    fn prop_ot_tag_round_trip(code in "[A-Z][a-z]{3}") {
        let tags = ot_tags_from_script(&code);
        let back = ot_tag_to_script(tags.last().map(String::as_str).unwrap_or_default());
        if !is_neutral(&code) && !["Hira", "Hrkt", "Math"].contains(&code.as_str()) {
            prop_assert_eq!(back, Some(code));
        }
    }
}
