//! Ligature caret positions from anchors
//!
//! `caret_*` anchors give horizontal positions (their x), `vcaret_*`
//! anchors vertical ones (their y). Positions are rounded, deduplicated
//! and sorted per glyph.

use feagen_core::{ast::LigatureCaret, font::FontSource, types::ot_round};
use std::collections::BTreeSet;

const CARET_PREFIX: &str = "caret_";
const VERTICAL_CARET_PREFIX: &str = "vcaret_";

/// Carets of every exported glyph that has any, in glyph order
pub fn ligature_carets(font: &FontSource) -> Vec<LigatureCaret> {
    font.glyphs
        .iter()
        .filter(|g| g.export)
        .filter_map(|glyph| {
            let positions: BTreeSet<i64> = glyph
                .anchors
                .iter()
                .filter_map(|anchor| {
                    if anchor.name.starts_with(CARET_PREFIX) {
                        Some(ot_round(anchor.x))
                    } else if anchor.name.starts_with(VERTICAL_CARET_PREFIX) {
                        Some(ot_round(anchor.y))
                    } else {
                        None
                    }
                })
                .collect();
            if positions.is_empty() {
                return None;
            }
            log::trace!("{} carets at {positions:?}", glyph.name);
            Some(LigatureCaret {
                glyph: glyph.name.clone(),
                positions: positions.into_iter().collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feagen_core::Glyph;

    #[test]
    fn test_carets_sorted_and_rounded() {
        let mut font = FontSource::new();
        font.push_glyph(
            Glyph::new("f_f_i")
                .with_anchor("caret_2", 400.0, 0.0)
                .with_anchor("caret_1", 200.0, 0.0),
        )
        .push_glyph(Glyph::new("f_i").with_anchor("caret_", 200.0, 0.0))
        .push_glyph(
            Glyph::new("li_ga")
                .with_anchor("vcaret_1", 0.0, 200.1111)
                .with_anchor("caret_1", 499.9876, 0.0),
        )
        .push_glyph(Glyph::new("a").with_anchor("top", 100.0, 500.0));

        let carets = ligature_carets(&font);
        let found: Vec<(&str, &[i64])> = carets
            .iter()
            .map(|c| (c.glyph.as_str(), c.positions.as_slice()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("f_f_i", &[200, 400][..]),
                ("f_i", &[200][..]),
                ("li_ga", &[200, 500][..]),
            ]
        );
    }

    #[test]
    fn test_duplicate_positions_collapse() {
        let mut font = FontSource::new();
        font.push_glyph(
            Glyph::new("f_l")
                .with_anchor("caret_1", 300.2, 0.0)
                .with_anchor("vcaret_1", 0.0, 299.8),
        );
        assert_eq!(ligature_carets(&font)[0].positions, vec![300]);
    }
}
