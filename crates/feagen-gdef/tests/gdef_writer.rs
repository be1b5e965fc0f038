//! GDEF Writer Integration Tests
//!
//! Runs the GDEF writer on a small ligature font:
//! - Carets only, classes only, both
//! - Existing tables: complete, caret-only, class-only
//! - Vertical and fractional carets
//! - Invalid categories

use feagen_core::{
    ast::{FeatureBlock, GdefClasses, LigatureCaret, Statement},
    insert::Placement,
    DiagnosticKind, Diagnostics, FeatureFile, FeatureWriter, FontSource, Glyph,
};
use feagen_gdef::GdefFeatureWriter;

fn test_font() -> FontSource {
    let mut font = FontSource::new();
    font.push_glyph(Glyph::new("a"))
        .push_glyph(Glyph::new("f"))
        .push_glyph(Glyph::new("f.component"))
        .push_glyph(Glyph::new("i"))
        .push_glyph(
            Glyph::new("f_f_i")
                .with_anchor("caret_2", 400.0, 0.0)
                .with_anchor("caret_1", 200.0, 0.0),
        )
        .push_glyph(Glyph::new("f_i").with_anchor("caret_", 200.0, 0.0))
        .push_glyph(Glyph::new("acutecomb"))
        .push_glyph(Glyph::new("tildecomb"));
    font
}

fn with_categories(mut font: FontSource, categories: &[(&str, &str)]) -> FontSource {
    for (glyph, category) in categories {
        font.categories.insert(glyph.to_string(), category.to_string());
    }
    font
}

const CATEGORIES: [(&str, &str); 4] = [
    ("a", "base"),
    ("f.component", "component"),
    ("f_i", "ligature"),
    ("acutecomb", "mark"),
];

fn run(font: &FontSource, doc: &mut FeatureFile) -> (Vec<Placement>, Diagnostics) {
    let writer = match GdefFeatureWriter::builder().build() {
        Ok(writer) => writer,
        Err(e) => unreachable!("writer should build: {e:?}"),
    };
    let mut diagnostics = Diagnostics::new();
    let outcomes = match writer.write(font, doc, &mut diagnostics) {
        Ok(outcomes) => outcomes,
        Err(e) => unreachable!("write failed: {e:?}"),
    };
    let placements = outcomes
        .into_iter()
        .map(|o| match o.result {
            Ok(placement) => placement,
            Err(e) => unreachable!("merge failed: {e:?}"),
        })
        .collect();
    (placements, diagnostics)
}

fn gdef_doc(table: GdefClasses) -> FeatureFile {
    FeatureFile {
        statements: vec![Statement::Gdef(table)],
    }
}

fn caret(glyph: &str, positions: &[i64]) -> LigatureCaret {
    LigatureCaret {
        glyph: glyph.to_string(),
        positions: positions.to_vec(),
    }
}

fn class(glyphs: &[&str]) -> Option<Vec<String>> {
    Some(glyphs.iter().map(|g| g.to_string()).collect())
}

// ============================================================================
// New Tables
// ============================================================================

#[test]
fn test_carets_without_categories() {
    let mut doc = FeatureFile::new();
    let (placements, _) = run(&test_font(), &mut doc);
    assert_eq!(placements, vec![Placement::Appended]);
    assert_eq!(
        doc.to_string(),
        "table GDEF {
    LigatureCaretByPos f_f_i 200 400;
    LigatureCaretByPos f_i 200;
} GDEF;
"
    );
}

#[test]
fn test_categories_and_carets() {
    let font = with_categories(test_font(), &CATEGORIES);
    let mut doc = FeatureFile::new();
    run(&font, &mut doc);
    assert_eq!(
        doc.to_string(),
        "table GDEF {
    GlyphClassDef [a], [f_i], [acutecomb], [f.component];
    LigatureCaretByPos f_f_i 200 400;
    LigatureCaretByPos f_i 200;
} GDEF;
"
    );
}

#[test]
fn test_table_follows_existing_features() {
    let font = with_categories(
        test_font(),
        &[
            ("a", "base"),
            ("f.component", "component"),
            ("f_f_i", "base"),
            ("f_i", "ligature"),
            ("acutecomb", "mark"),
            ("tildecomb", "component"),
        ],
    );
    let mut mark = FeatureBlock::new("mark");
    mark.statements.push(Statement::Verbatim {
        text: "pos base a <anchor 250 500> mark @TOP_MARKS;".into(),
    });
    let mut doc = FeatureFile {
        statements: vec![Statement::Feature(mark)],
    };
    run(&font, &mut doc);
    assert!(doc.to_string().ends_with(
        "} mark;


table GDEF {
    GlyphClassDef [a f_f_i], [f_i], [acutecomb], [f.component tildecomb];
    LigatureCaretByPos f_f_i 200 400;
    LigatureCaretByPos f_i 200;
} GDEF;
"
    ));
}

#[test]
fn test_nothing_to_write() {
    let mut font = FontSource::new();
    font.push_glyph(Glyph::new("a"));
    let mut doc = FeatureFile::new();
    let (placements, _) = run(&font, &mut doc);
    assert!(placements.is_empty());
    assert!(doc.is_empty());
}

// ============================================================================
// Existing Tables
// ============================================================================

#[test]
fn test_complete_table_is_left_alone() {
    let font = with_categories(test_font(), &CATEGORIES);
    let mut doc = gdef_doc(GdefClasses {
        base: class(&["i"]),
        ligature: class(&[]),
        mark: class(&["tildecomb"]),
        component: class(&[]),
        carets: vec![caret("f_i", &[100])],
    });
    let before = doc.to_string();
    let (placements, _) = run(&font, &mut doc);
    assert!(placements.is_empty());
    assert_eq!(doc.to_string(), before);
}

#[test]
fn test_caret_only_table_gets_classes() {
    let font = with_categories(test_font(), &CATEGORIES);
    let mut doc = gdef_doc(GdefClasses {
        carets: vec![caret("f_i", &[100])],
        ..Default::default()
    });
    let (placements, _) = run(&font, &mut doc);
    assert_eq!(placements, vec![Placement::MergedTable]);
    assert_eq!(
        doc.to_string(),
        "table GDEF {
    GlyphClassDef [a], [f_i], [acutecomb], [f.component];
    LigatureCaretByPos f_i 100;
} GDEF;
"
    );
}

#[test]
fn test_class_only_table_gets_carets() {
    let font = with_categories(test_font(), &CATEGORIES);
    let mut doc = gdef_doc(GdefClasses {
        base: class(&[]),
        ligature: class(&[]),
        mark: class(&["acutecomb", "tildecomb"]),
        component: class(&[]),
        carets: vec![],
    });
    run(&font, &mut doc);
    assert_eq!(
        doc.to_string(),
        "table GDEF {
    GlyphClassDef [], [], [acutecomb tildecomb], [];
    LigatureCaretByPos f_f_i 200 400;
    LigatureCaretByPos f_i 200;
} GDEF;
"
    );
}

// ============================================================================
// Caret Positions
// ============================================================================

#[test]
fn test_vertical_carets() {
    let mut font = test_font();
    font.push_glyph(
        Glyph::new("vi_li_ga")
            .with_anchor("vcaret_1", 0.0, 100.0)
            .with_anchor("vcaret_2", 0.0, 200.0),
    )
    .push_glyph(Glyph::new("vli_ga").with_anchor("vcaret_", 0.0, 100.0));
    let mut doc = FeatureFile::new();
    run(&font, &mut doc);
    assert_eq!(
        doc.to_string(),
        "table GDEF {
    LigatureCaretByPos f_f_i 200 400;
    LigatureCaretByPos f_i 200;
    LigatureCaretByPos vi_li_ga 100 200;
    LigatureCaretByPos vli_ga 100;
} GDEF;
"
    );
}

#[test]
fn test_fractional_carets_are_rounded() {
    let mut font = test_font();
    font.push_glyph(
        Glyph::new("li_ga")
            .with_anchor("vcaret_1", 0.0, 200.1111)
            .with_anchor("caret_1", 499.9876, 0.0),
    );
    let mut doc = FeatureFile::new();
    run(&font, &mut doc);
    assert!(doc
        .to_string()
        .contains("    LigatureCaretByPos li_ga 200 500;\n"));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_invalid_category_is_reported_once() {
    let font = with_categories(
        test_font(),
        &[("a", "base"), ("acutecomb", "mark"), ("tildecomb", "components")],
    );
    let mut doc = FeatureFile::new();
    let (_, diagnostics) = run(&font, &mut doc);
    let found = diagnostics.of_kind(DiagnosticKind::InvalidCategory);
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("value of tildecomb is 'components' when it should be"));
    assert!(doc
        .to_string()
        .contains("    GlyphClassDef [a], [], [acutecomb], [];\n"));
}
