//! Feature document tree and its feature-file rendering
//!
//! A [`FeatureFile`] is an ordered list of top-level [`Statement`]s. Existing
//! sources arrive already parsed (as JSON); writers splice new statements
//! into the tree by index, and [`std::fmt::Display`] renders the result as
//! feature-file text. Rendering is byte-stable: the same tree always
//! produces the same text.
//!
//! Statements the model does not interpret (contextual rules, substitution
//! rules from hand-written sources) travel as [`Statement::Verbatim`] and
//! are rendered unchanged.

// this_file: crates/feagen-core/src/ast.rs

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

const SHIFT: &str = "    ";

/// A single glyph or a reference to a named glyph class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphRef {
    Glyph(String),
    Class(String),
}

impl GlyphRef {
    pub fn is_class(&self) -> bool {
        matches!(self, GlyphRef::Class(_))
    }

    fn as_fea(&self) -> String {
        match self {
            GlyphRef::Glyph(name) => name.clone(),
            GlyphRef::Class(name) => format!("@{name}"),
        }
    }
}

/// Positioning value of a pair rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRecord {
    /// Scalar advance adjustment
    Advance(i64),
    /// `<xPlacement yPlacement xAdvance yAdvance>`
    Full {
        x_placement: i64,
        y_placement: i64,
        x_advance: i64,
        y_advance: i64,
    },
}

impl ValueRecord {
    /// Right-to-left kerning: the advance is mirrored into the placement
    pub fn rtl(value: i64) -> Self {
        ValueRecord::Full {
            x_placement: value,
            y_placement: 0,
            x_advance: value,
            y_advance: 0,
        }
    }

    pub fn x_advance(&self) -> i64 {
        match self {
            ValueRecord::Advance(v) => *v,
            ValueRecord::Full { x_advance, .. } => *x_advance,
        }
    }

    fn as_fea(&self) -> String {
        match self {
            ValueRecord::Advance(v) => v.to_string(),
            ValueRecord::Full {
                x_placement,
                y_placement,
                x_advance,
                y_advance,
            } => format!("<{x_placement} {y_placement} {x_advance} {y_advance}>"),
        }
    }
}

/// Anchor point in format A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaAnchor {
    pub x: i64,
    pub y: i64,
}

impl FeaAnchor {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn as_fea(&self) -> String {
        format!("<anchor {} {}>", self.x, self.y)
    }
}

/// `@name = [glyphs];`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphClassDef {
    pub name: String,
    pub glyphs: Vec<String>,
}

/// `markClass glyph <anchor x y> @class;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkClassDef {
    pub class: String,
    pub glyphs: Vec<String>,
    pub anchor: FeaAnchor,
}

/// `table GDEF { GlyphClassDef base, ligature, mark, component; } GDEF;`
///
/// `None` means the slot was left empty, which is different from an
/// explicitly empty class. A table whose four slots are all `None` has no
/// `GlyphClassDef` statement at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdefClasses {
    #[serde(default)]
    pub base: Option<Vec<String>>,
    #[serde(default)]
    pub ligature: Option<Vec<String>>,
    #[serde(default)]
    pub mark: Option<Vec<String>>,
    #[serde(default)]
    pub component: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub carets: Vec<LigatureCaret>,
}

impl GdefClasses {
    pub fn has_class_def(&self) -> bool {
        [&self.base, &self.ligature, &self.mark, &self.component]
            .iter()
            .any(|slot| slot.is_some())
    }
}

/// `LigatureCaretByPos glyph positions;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigatureCaret {
    pub glyph: String,
    pub positions: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFlag {
    #[serde(default)]
    pub right_to_left: bool,
    #[serde(default)]
    pub ignore_marks: bool,
    #[serde(default)]
    pub mark_filtering_set: Option<String>,
}

impl LookupFlag {
    pub fn ignore_marks() -> Self {
        Self {
            ignore_marks: true,
            ..Default::default()
        }
    }

    pub fn mark_filtering_set(class: impl Into<String>) -> Self {
        Self {
            mark_filtering_set: Some(class.into()),
            ..Default::default()
        }
    }

    /// `RightToLeft IgnoreMarks`
    pub fn right_to_left_ignore_marks() -> Self {
        Self {
            right_to_left: true,
            ignore_marks: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairPos {
    pub first: GlyphRef,
    pub second: GlyphRef,
    pub value: ValueRecord,
    /// `enum pos`, set when exactly one side is a class
    #[serde(default)]
    pub enumerated: bool,
}

/// One `<anchor> mark @class` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorMark {
    pub anchor: FeaAnchor,
    pub class: String,
}

/// `pos base` or `pos mark` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAttach {
    pub base: String,
    pub marks: Vec<AnchorMark>,
}

/// `pos cursive` rule; a missing side renders as `<anchor NULL>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursivePos {
    pub glyph: String,
    #[serde(default)]
    pub entry: Option<FeaAnchor>,
    #[serde(default)]
    pub exit: Option<FeaAnchor>,
}

/// `pos ligature` rule; an empty component renders as `<anchor NULL>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkLigature {
    pub ligature: String,
    pub components: Vec<Vec<AnchorMark>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupBlock {
    pub name: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl LookupBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }

    /// Number of positioning rules, ignoring flags and local classes
    pub fn rule_count(&self) -> usize {
        self.statements.iter().filter(|s| s.is_rule()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBlock {
    pub tag: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl FeatureBlock {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            statements: Vec::new(),
        }
    }

    /// Names of the lookups this block references or defines, in order
    pub fn lookup_names(&self) -> Vec<&str> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::LookupReference { name } => Some(name.as_str()),
                Statement::Lookup(lookup) => Some(lookup.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    /// Comment text including its leading `#`; empty text renders as a blank line
    Comment { text: String },
    LanguageSystem { script: String, language: String },
    GlyphClass(GlyphClassDef),
    MarkClass(MarkClassDef),
    Gdef(GdefClasses),
    Lookup(LookupBlock),
    Feature(FeatureBlock),
    Script { tag: String },
    Language {
        tag: String,
        #[serde(default = "default_true")]
        include_default: bool,
    },
    LookupFlag(LookupFlag),
    LookupReference { name: String },
    PairPos(PairPos),
    MarkBase(MarkAttach),
    MarkMark(MarkAttach),
    MarkLigature(MarkLigature),
    CursivePos(CursivePos),
    Verbatim { text: String },
}

impl Statement {
    pub fn comment(text: impl Into<String>) -> Self {
        Statement::Comment { text: text.into() }
    }

    /// Blank separator line
    pub fn blank() -> Self {
        Statement::Comment {
            text: String::new(),
        }
    }

    pub fn lookup_reference(name: impl Into<String>) -> Self {
        Statement::LookupReference { name: name.into() }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Statement::Comment { .. })
    }

    pub fn is_rule(&self) -> bool {
        matches!(
            self,
            Statement::PairPos(_)
                | Statement::MarkBase(_)
                | Statement::MarkMark(_)
                | Statement::MarkLigature(_)
                | Statement::CursivePos(_)
                | Statement::Verbatim { .. }
        )
    }

    /// Render at the given indentation; block statements end with a newline
    pub fn as_fea(&self, indent: &str) -> String {
        match self {
            Statement::Comment { text } => text.clone(),
            Statement::LanguageSystem { script, language } => {
                format!("languagesystem {} {};", script.trim(), language.trim())
            },
            Statement::GlyphClass(def) => {
                format!("@{} = [{}];", def.name, def.glyphs.join(" "))
            },
            Statement::MarkClass(def) => {
                let glyphs = match def.glyphs.as_slice() {
                    [single] => single.clone(),
                    many => format!("[{}]", many.join(" ")),
                };
                format!("markClass {} {} @{};", glyphs, def.anchor.as_fea(), def.class)
            },
            Statement::Gdef(gdef) => {
                let slot = |glyphs: &Option<Vec<String>>| match glyphs {
                    Some(glyphs) => format!("[{}]", glyphs.join(" ")),
                    None => String::new(),
                };
                let mut body = String::new();
                if gdef.has_class_def() {
                    body.push_str(&format!(
                        "{indent}{SHIFT}GlyphClassDef {}, {}, {}, {};\n",
                        slot(&gdef.base),
                        slot(&gdef.ligature),
                        slot(&gdef.mark),
                        slot(&gdef.component),
                    ));
                }
                for caret in &gdef.carets {
                    let positions: Vec<String> = caret.positions.iter().map(i64::to_string).collect();
                    body.push_str(&format!(
                        "{indent}{SHIFT}LigatureCaretByPos {} {};\n",
                        caret.glyph,
                        positions.join(" ")
                    ));
                }
                format!("table GDEF {{\n{body}{indent}}} GDEF;\n")
            },
            Statement::Lookup(lookup) => format!(
                "lookup {} {{\n{}{indent}}} {};\n",
                lookup.name,
                block_body(&lookup.statements, indent),
                lookup.name
            ),
            Statement::Feature(feature) => format!(
                "feature {} {{\n{}{indent}}} {};\n",
                feature.tag,
                block_body(&feature.statements, indent),
                feature.tag
            ),
            Statement::Script { tag } => format!("script {};", tag.trim()),
            Statement::Language {
                tag,
                include_default,
            } => {
                if *include_default {
                    format!("language {};", tag.trim())
                } else {
                    format!("language {} exclude_dflt;", tag.trim())
                }
            },
            Statement::LookupFlag(flag) => {
                let mut parts = Vec::new();
                if flag.right_to_left {
                    parts.push("RightToLeft".to_string());
                }
                if flag.ignore_marks {
                    parts.push("IgnoreMarks".to_string());
                }
                if let Some(class) = &flag.mark_filtering_set {
                    parts.push(format!("UseMarkFilteringSet @{class}"));
                }
                if parts.is_empty() {
                    "lookupflag 0;".to_string()
                } else {
                    format!("lookupflag {};", parts.join(" "))
                }
            },
            Statement::LookupReference { name } => format!("lookup {name};"),
            Statement::PairPos(pair) => format!(
                "{}pos {} {} {};",
                if pair.enumerated { "enum " } else { "" },
                pair.first.as_fea(),
                pair.second.as_fea(),
                pair.value.as_fea()
            ),
            Statement::MarkBase(rule) => format!("pos base {}{};", rule.base, marks_fea(&rule.marks)),
            Statement::MarkMark(rule) => format!("pos mark {}{};", rule.base, marks_fea(&rule.marks)),
            Statement::MarkLigature(rule) => {
                let components: Vec<String> = rule
                    .components
                    .iter()
                    .map(|marks| {
                        if marks.is_empty() {
                            " <anchor NULL>".to_string()
                        } else {
                            marks_fea(marks)
                        }
                    })
                    .collect();
                format!(
                    "pos ligature {}{};",
                    rule.ligature,
                    components.join(&format!("\n{indent}{SHIFT}ligComponent"))
                )
            },
            Statement::CursivePos(rule) => {
                let anchor = |a: &Option<FeaAnchor>| match a {
                    Some(anchor) => anchor.as_fea(),
                    None => "<anchor NULL>".to_string(),
                };
                format!("pos cursive {} {} {};", rule.glyph, anchor(&rule.entry), anchor(&rule.exit))
            },
            Statement::Verbatim { text } => text.clone(),
        }
    }
}

fn marks_fea(marks: &[AnchorMark]) -> String {
    marks
        .iter()
        .map(|m| format!(" {} mark @{}", m.anchor.as_fea(), m.class))
        .collect()
}

fn block_body(statements: &[Statement], indent: &str) -> String {
    let inner = format!("{indent}{SHIFT}");
    let mut out = String::new();
    for statement in statements {
        let text = statement.as_fea(&inner);
        if !text.is_empty() {
            out.push_str(&inner);
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}

/// A parsed feature document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFile {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl FeatureFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Declared `languagesystem` pairs in order, tags trimmed
    pub fn language_systems(&self) -> Vec<(String, String)> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::LanguageSystem { script, language } => {
                    Some((script.trim().to_string(), language.trim().to_string()))
                },
                _ => None,
            })
            .collect()
    }

    /// Script tag → languages, both in declaration order
    pub fn languages_by_script(&self) -> Vec<(String, Vec<String>)> {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (script, language) in self.language_systems() {
            match grouped.iter_mut().find(|(s, _)| *s == script) {
                Some((_, languages)) => {
                    if !languages.contains(&language) {
                        languages.push(language);
                    }
                },
                None => grouped.push((script, vec![language])),
            }
        }
        grouped
    }

    /// Indices of top-level feature blocks with the given tag
    pub fn feature_indices(&self, tag: &str) -> Vec<usize> {
        self.statements
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Statement::Feature(f) if f.tag == tag => Some(i),
                _ => None,
            })
            .collect()
    }

    pub fn has_feature(&self, tag: &str) -> bool {
        !self.feature_indices(tag).is_empty()
    }

    /// Every glyph and mark class name defined anywhere in the document
    pub fn class_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_class_names(&self.statements, &mut names);
        names
    }

    /// Top-level mark class definitions keyed by class name
    pub fn mark_classes(&self) -> BTreeMap<String, Vec<(String, FeaAnchor)>> {
        let mut classes: BTreeMap<String, Vec<(String, FeaAnchor)>> = BTreeMap::new();
        for statement in &self.statements {
            if let Statement::MarkClass(def) = statement {
                let entry = classes.entry(def.class.clone()).or_default();
                for glyph in &def.glyphs {
                    entry.push((glyph.clone(), def.anchor));
                }
            }
        }
        classes
    }

    /// Lookup names defined at top level or inside feature blocks
    pub fn defined_lookups(&self) -> BTreeSet<String> {
        fn walk(statements: &[Statement], names: &mut BTreeSet<String>) {
            for statement in statements {
                match statement {
                    Statement::Lookup(lookup) => {
                        names.insert(lookup.name.clone());
                    },
                    Statement::Feature(feature) => walk(&feature.statements, names),
                    _ => {},
                }
            }
        }
        let mut names = BTreeSet::new();
        walk(&self.statements, &mut names);
        names
    }

    /// The first GDEF table, if the document declares one
    pub fn gdef(&self) -> Option<&GdefClasses> {
        self.statements.iter().find_map(|s| match s {
            Statement::Gdef(gdef) => Some(gdef),
            _ => None,
        })
    }

    /// GDEF mark glyphs, when the document declares a GDEF mark class
    pub fn gdef_marks(&self) -> Option<BTreeSet<String>> {
        self.gdef()
            .and_then(|gdef| gdef.mark.as_ref())
            .map(|marks| marks.iter().cloned().collect())
    }
}

fn collect_class_names(statements: &[Statement], names: &mut BTreeSet<String>) {
    for statement in statements {
        match statement {
            Statement::GlyphClass(def) => {
                names.insert(def.name.clone());
            },
            Statement::MarkClass(def) => {
                names.insert(def.class.clone());
            },
            Statement::Lookup(lookup) => collect_class_names(&lookup.statements, names),
            Statement::Feature(feature) => collect_class_names(&feature.statements, names),
            _ => {},
        }
    }
}

impl fmt::Display for FeatureFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(|s| s.as_fea("")).collect();
        f.write_str(&rendered.join("\n"))
    }
}

/// Turn an arbitrary name into a valid, unused class name
///
/// Characters outside `[A-Za-z0-9._]` are dropped. When the result is
/// already taken, `_1`, `_2`, … are tried in turn.
pub fn make_class_name(name: &str, existing: &BTreeSet<String>) -> String {
    let mut base: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
        .collect();
    if base.is_empty() {
        base.push_str("class");
    }
    if !existing.contains(&base) {
        return base;
    }
    let mut i = 1;
    loop {
        let candidate = format!("{base}_{i}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        i += 1;
    }
}
