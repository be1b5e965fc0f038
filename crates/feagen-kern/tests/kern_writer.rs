//! Kern Writer Integration Tests
//!
//! Runs the whole kerning pipeline on small fonts with ICU Unicode data:
//! - End-to-end output for plain Latin kerning
//! - Merge behavior (skip, append, insertion markers)
//! - Direction, script and mark handling

use feagen_core::{
    ast::{FeatureBlock, GdefClasses, Statement},
    insert::Placement,
    DiagnosticKind, Diagnostics, FeatureFile, FeatureWriter, FontSource, Glyph, Mode,
};
use feagen_kern::KernFeatureWriter;

fn glyph(name: &str, codepoint: u32) -> Glyph {
    Glyph::new(name).with_unicode(codepoint)
}

/// `public.kern1.A = [A Aacute]`, `(public.kern1.A, V) = -40`, `(seven, four) = -25`
fn latin_font() -> FontSource {
    let mut font = FontSource::new();
    font.push_glyph(glyph("A", 0x41))
        .push_glyph(glyph("Aacute", 0xC1))
        .push_glyph(glyph("V", 0x56))
        .push_glyph(glyph("seven", 0x37))
        .push_glyph(glyph("four", 0x34));
    font.add_group("public.kern1.A", ["A", "Aacute"]);
    font.add_kerning("public.kern1.A", "V", -40.0)
        .add_kerning("seven", "four", -25.0);
    font
}

fn writer(mode: Mode) -> KernFeatureWriter {
    match KernFeatureWriter::builder().mode(mode).build() {
        Ok(writer) => writer,
        Err(e) => unreachable!("writer should build: {e:?}"),
    }
}

fn run(writer: &KernFeatureWriter, font: &FontSource, doc: &mut FeatureFile) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    if let Err(e) = writer.write(font, doc, &mut diagnostics) {
        unreachable!("write failed: {e:?}");
    }
    diagnostics
}

fn languagesystems(pairs: &[(&str, &str)]) -> FeatureFile {
    FeatureFile {
        statements: pairs
            .iter()
            .map(|(script, language)| Statement::LanguageSystem {
                script: (*script).to_string(),
                language: (*language).to_string(),
            })
            .collect(),
    }
}

const LATIN_OUTPUT: &str = "@kern1.A = [A Aacute];

lookup kern_Dflt {
    lookupflag IgnoreMarks;
    pos seven four -25;
} kern_Dflt;

lookup kern_Latn {
    lookupflag IgnoreMarks;
    enum pos @kern1.A V -40;
} kern_Latn;

feature kern {
    lookup kern_Dflt;
    lookup kern_Latn;
} kern;
";

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_latin_end_to_end() {
    let mut doc = FeatureFile::new();
    let diagnostics = run(&writer(Mode::Skip), &latin_font(), &mut doc);
    assert_eq!(doc.to_string(), LATIN_OUTPUT);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_output_is_deterministic() {
    let font = latin_font();
    let mut first = FeatureFile::new();
    let mut second = FeatureFile::new();
    run(&writer(Mode::Skip), &font, &mut first);
    run(&writer(Mode::Skip), &font, &mut second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_zero_class_pairs_cancelled() {
    let mut font = latin_font();
    font.add_group("public.kern2.V", ["V"]);
    font.add_kerning("public.kern1.A", "public.kern2.V", 0.0);
    let mut doc = FeatureFile::new();
    run(&writer(Mode::Skip), &font, &mut doc);
    assert!(!doc.to_string().contains("@kern2.V"));
}

#[test]
fn test_quantization() {
    let mut font = latin_font();
    font.add_kerning("A", "V", -37.0);
    let writer = match KernFeatureWriter::builder()
        .mode(Mode::Skip)
        .quantization(10)
        .build()
    {
        Ok(writer) => writer,
        Err(e) => unreachable!("writer should build: {e:?}"),
    };
    let mut doc = FeatureFile::new();
    run(&writer, &font, &mut doc);
    let text = doc.to_string();
    assert!(text.contains("pos A V -40;"));
    assert!(text.contains("pos seven four -20;"));
    assert!(text.contains("enum pos @kern1.A V -40;"));
}

#[test]
fn test_specificity_inside_lookup() {
    let mut font = latin_font();
    font.add_kerning("Aacute", "V", -10.0);
    let mut doc = FeatureFile::new();
    run(&writer(Mode::Skip), &font, &mut doc);
    let text = doc.to_string();
    let glyph_rule = text.find("pos Aacute V -10;");
    let class_rule = text.find("enum pos @kern1.A V -40;");
    assert!(glyph_rule.is_some() && class_rule.is_some());
    assert!(glyph_rule < class_rule);
}

// ============================================================================
// Merge Behavior
// ============================================================================

#[test]
fn test_skip_mode_is_idempotent() {
    let font = latin_font();
    let writer = writer(Mode::Skip);
    let mut doc = FeatureFile::new();
    run(&writer, &font, &mut doc);
    let once = doc.to_string();
    run(&writer, &font, &mut doc);
    assert_eq!(doc.to_string(), once);
}

#[test]
fn test_append_mode_adds_one_copy() {
    let font = latin_font();
    let writer = writer(Mode::Append);
    let mut doc = FeatureFile::new();
    run(&writer, &font, &mut doc);
    run(&writer, &font, &mut doc);
    let text = doc.to_string();
    assert_eq!(text.matches("feature kern {").count(), 2);
    // the second copy cannot reuse the class name of the first
    assert!(text.contains("@kern1.A_1 = [A Aacute];"));
}

#[test]
fn test_marker_replaces_block() {
    let mut block = FeatureBlock::new("kern");
    block.statements.push(Statement::comment("# Automatic Code"));
    let mut doc = FeatureFile {
        statements: vec![Statement::Feature(block)],
    };
    let mut diagnostics = Diagnostics::new();
    let outcomes = match writer(Mode::Skip).write(&latin_font(), &mut doc, &mut diagnostics) {
        Ok(outcomes) => outcomes,
        Err(e) => unreachable!("write failed: {e:?}"),
    };
    assert!(matches!(outcomes[0].result, Ok(Placement::ReplacedBlock)));
    assert_eq!(doc.to_string(), LATIN_OUTPUT);
}

#[test]
fn test_ambiguous_marker_leaves_document() {
    let mut block = FeatureBlock::new("kern");
    block.statements = vec![
        Statement::Verbatim {
            text: "pos one four' -50 six;".into(),
        },
        Statement::comment("# Automatic Code"),
        Statement::Verbatim {
            text: "pos one six' -50 six;".into(),
        },
    ];
    let mut doc = FeatureFile {
        statements: vec![Statement::Feature(block)],
    };
    let before = doc.clone();
    let mut diagnostics = Diagnostics::new();
    let outcomes = match writer(Mode::Skip).write(&latin_font(), &mut doc, &mut diagnostics) {
        Ok(outcomes) => outcomes,
        Err(e) => unreachable!("write failed: {e:?}"),
    };
    match &outcomes[0].result {
        Err(e) => assert_eq!(
            e.to_string(),
            "Insert marker has rules before and after, feature kern cannot be inserted."
        ),
        other => unreachable!("expected marker error, got {other:?}"),
    }
    assert_eq!(doc, before);
}

// ============================================================================
// Directions and Scripts
// ============================================================================

#[test]
fn test_mixed_direction_pair_rejected() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("a", 0x61))
        .push_glyph(glyph("alef-ar", 0x627));
    font.add_kerning("a", "alef-ar", -30.0);
    let mut doc = FeatureFile::new();
    let diagnostics = run(&writer(Mode::Skip), &font, &mut doc);

    assert!(doc.is_empty());
    assert_eq!(diagnostics.len(), 1);
    let found = diagnostics.of_kind(DiagnosticKind::MixedDirection);
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("a") && found[0].message.contains("alef-ar"));
}

#[test]
fn test_rtl_value_records() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("reh-ar", 0x631))
        .push_glyph(glyph("alef-ar", 0x627))
        .push_glyph(glyph("one-ar", 0x661))
        .push_glyph(glyph("two-ar", 0x662));
    font.add_kerning("reh-ar", "alef-ar", -100.0)
        .add_kerning("one-ar", "two-ar", -20.0);
    let mut doc = languagesystems(&[("DFLT", "dflt"), ("arab", "dflt")]);
    run(&writer(Mode::Skip), &font, &mut doc);

    let text = doc.to_string();
    assert!(text.contains("pos reh-ar alef-ar <-100 0 -100 0>;"));
    assert!(text.contains("pos one-ar two-ar -20;"));
    assert!(text.contains("    script arab;\n    language dflt;\n"));
}

#[test]
fn test_dflt_section_is_scoped_to_dflt_script() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("A", 0x41))
        .push_glyph(glyph("V", 0x56))
        .push_glyph(glyph("reh-ar", 0x631))
        .push_glyph(glyph("alef-ar", 0x627));
    font.add_kerning("A", "V", -40.0)
        .add_kerning("reh-ar", "alef-ar", -100.0);
    let mut doc = languagesystems(&[("DFLT", "dflt"), ("latn", "dflt"), ("arab", "dflt")]);
    run(&writer(Mode::Skip), &font, &mut doc);

    let text = doc.to_string();
    assert!(text.ends_with(concat!(
        "feature kern {\n",
        "    script DFLT;\n",
        "    language dflt;\n",
        "    lookup kern_Latn;\n",
        "\n",
        "    script latn;\n",
        "    language dflt;\n",
        "    lookup kern_Latn;\n",
        "\n",
        "    script arab;\n",
        "    language dflt;\n",
        "    lookup kern_Arab;\n",
        "} kern;\n",
    )));
    assert_eq!(text.matches("lookup kern_Arab;").count(), 1);
}

#[test]
fn test_unregistered_script_reported() {
    let mut font = latin_font();
    font.push_glyph(glyph("alpha", 0x3B1))
        .push_glyph(glyph("beta", 0x3B2));
    font.add_kerning("alpha", "beta", -15.0);
    let mut doc = languagesystems(&[("DFLT", "dflt"), ("latn", "dflt")]);
    let diagnostics = run(&writer(Mode::Skip), &font, &mut doc);

    let text = doc.to_string();
    assert!(!text.contains("kern_Grek"));
    assert!(text.contains("lookup kern_Latn;"));
    assert_eq!(diagnostics.of_kind(DiagnosticKind::UnregisteredScript).len(), 1);
}

#[test]
fn test_dist_for_indic_scripts() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("ka-deva", 0x915))
        .push_glyph(glyph("kha-deva", 0x916));
    font.add_kerning("ka-deva", "kha-deva", -12.0);
    let mut doc = languagesystems(&[("DFLT", "dflt"), ("dev2", "dflt")]);
    run(&writer(Mode::Skip), &font, &mut doc);

    let text = doc.to_string();
    assert!(!text.contains("feature kern"));
    assert!(text.contains("feature dist {\n    script dev2;\n    language dflt;\n    lookup kern_Deva;\n} dist;"));
}

// ============================================================================
// Marks
// ============================================================================

#[test]
fn test_mark_pairs_split_into_marks_lookup() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("a", 0x61))
        .push_glyph(glyph("v", 0x76))
        .push_glyph(glyph("acutecomb", 0x301));
    font.categories.insert("acutecomb".into(), "mark".into());
    font.add_kerning("a", "v", -10.0)
        .add_kerning("v", "acutecomb", 15.0);
    let mut doc = FeatureFile::new();
    run(&writer(Mode::Skip), &font, &mut doc);

    let text = doc.to_string();
    assert!(text.contains("lookup kern_Latn {\n    lookupflag IgnoreMarks;\n    pos a v -10;\n} kern_Latn;"));
    assert!(text.contains("lookup kern_Latn_marks {\n    pos v acutecomb 15;\n} kern_Latn_marks;"));
}

#[test]
fn test_spacing_marks_use_filtering_set() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("a", 0x61))
        .push_glyph(glyph("v", 0x76))
        .push_glyph(Glyph::new("ring-spacing").with_width(250.0));
    font.add_kerning("a", "v", -10.0);
    let mut doc = FeatureFile {
        statements: vec![Statement::Gdef(GdefClasses {
            base: Some(vec!["a".into(), "v".into()]),
            mark: Some(vec!["ring-spacing".into()]),
            ..Default::default()
        })],
    };
    run(&writer(Mode::Skip), &font, &mut doc);
    let text = doc.to_string();
    assert!(text.contains("    @MFS_kern_Latn = [ring-spacing];\n    lookupflag UseMarkFilteringSet @MFS_kern_Latn;\n"));
}

#[test]
fn test_ignore_marks_off_keeps_single_lookup() {
    let mut font = FontSource::new();
    font.push_glyph(glyph("v", 0x76))
        .push_glyph(glyph("acutecomb", 0x301));
    font.categories.insert("acutecomb".into(), "mark".into());
    font.add_kerning("v", "acutecomb", 15.0);
    let writer = match KernFeatureWriter::builder()
        .mode(Mode::Skip)
        .ignore_marks(false)
        .build()
    {
        Ok(writer) => writer,
        Err(e) => unreachable!("writer should build: {e:?}"),
    };
    let mut doc = FeatureFile::new();
    run(&writer, &font, &mut doc);
    let text = doc.to_string();
    assert!(text.contains("lookup kern_Latn {\n    pos v acutecomb 15;\n} kern_Latn;"));
    assert!(!text.contains("_marks"));
}
