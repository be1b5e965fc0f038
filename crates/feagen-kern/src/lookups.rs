//! Kerning lookup assembly
//!
//! Each script bucket becomes one base lookup and, when marks are kept
//! apart, one `_marks` lookup. Lookups are first built from resolved pairs
//! and only turned into statements once class names are settled.

// this_file: crates/feagen-kern/src/lookups.rs

use crate::pairs::{KernClass, KerningPair, Side};
use crate::partition::ScriptBuckets;
use crate::refine::refine;
use feagen_core::{
    ast::{
        make_class_name, GlyphClassDef, GlyphRef, LookupBlock, LookupFlag, PairPos, Statement,
        ValueRecord,
    },
    diagnostics::Diagnostics,
    types::{ot_round, BidiType, Direction, NEUTRAL_SCRIPT},
    UnicodeProperties,
};
use std::collections::{BTreeMap, BTreeSet};

/// Snap a kerning value to a multiple of `step`
///
/// A step of 0 only rounds.
pub fn quantize(value: f64, step: u32) -> i64 {
    if step == 0 {
        return ot_round(value);
    }
    let step = i64::from(step);
    step * ot_round(value / step as f64)
}

/// Lookup name for a script bucket
pub fn lookup_name(script: &str) -> String {
    if script == NEUTRAL_SCRIPT {
        "kern_Dflt".to_string()
    } else {
        format!("kern_{script}")
    }
}

/// How a lookup treats marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkHandling {
    /// No lookup flag
    Keep,
    IgnoreMarks,
    /// Spacing marks still block kerning
    FilteringSet(Vec<String>),
}

/// A lookup before class naming
#[derive(Debug, Clone, PartialEq)]
pub struct KernLookup {
    pub name: String,
    pub script: String,
    pub rtl: bool,
    pub marks: MarkHandling,
    pub pairs: Vec<KerningPair>,
}

/// Options that shape lookup assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    pub ignore_marks: bool,
    pub quantization: u32,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            ignore_marks: true,
            quantization: 1,
        }
    }
}

/// Mark glyphs of the font split out for lookup assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkFilter {
    pub marks: BTreeSet<String>,
    /// Marks with a non-zero advance width
    pub spacing: BTreeSet<String>,
}

impl MarkFilter {
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

fn split_by_marks(side: &Side, marks: &BTreeSet<String>) -> (Option<Side>, Option<Side>) {
    (
        side.restrict(|g| !marks.contains(g)),
        side.restrict(|g| marks.contains(g)),
    )
}

/// Split pairs into the base x base part and everything touching a mark
pub fn split_base_marks(
    pairs: &[KerningPair],
    marks: &BTreeSet<String>,
) -> (Vec<KerningPair>, Vec<KerningPair>) {
    let mut base = Vec::new();
    let mut with_marks = Vec::new();
    for pair in pairs {
        let (base1, mark1) = split_by_marks(&pair.side1, marks);
        let (base2, mark2) = split_by_marks(&pair.side2, marks);
        if let (Some(side1), Some(side2)) = (&base1, &base2) {
            base.push(pair.with_sides(side1.clone(), side2.clone()));
        }
        if let Some(side1) = mark1 {
            with_marks.push(pair.with_sides(side1, pair.side2.clone()));
        }
        if let (Some(side1), Some(side2)) = (base1, mark2) {
            with_marks.push(pair.with_sides(side1, side2));
        }
    }
    (base, with_marks)
}

/// Build the lookups of every bucket
///
/// Pairs are refined per lookup so every lookup keeps disjoint classes.
pub fn build_lookups(
    buckets: ScriptBuckets,
    filter: &MarkFilter,
    options: LookupOptions,
    properties: &dyn UnicodeProperties,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, Vec<KernLookup>> {
    let mut result = BTreeMap::new();
    for (script, pairs) in buckets {
        let name = lookup_name(&script);
        let rtl = properties.horizontal_direction(&script) == Some(Direction::RightToLeft);
        let mut lookups = Vec::new();

        if options.ignore_marks && !filter.is_empty() {
            let (base, with_marks) = split_base_marks(&pairs, &filter.marks);
            let marks = if filter.spacing.is_empty() {
                MarkHandling::IgnoreMarks
            } else {
                MarkHandling::FilteringSet(filter.spacing.iter().cloned().collect())
            };
            if !base.is_empty() {
                lookups.push(KernLookup {
                    name: name.clone(),
                    script: script.clone(),
                    rtl,
                    marks,
                    pairs: refine(base, diagnostics),
                });
            }
            if !with_marks.is_empty() {
                lookups.push(KernLookup {
                    name: format!("{name}_marks"),
                    script: script.clone(),
                    rtl,
                    marks: MarkHandling::Keep,
                    pairs: refine(with_marks, diagnostics),
                });
            }
        } else {
            let marks = if options.ignore_marks {
                MarkHandling::IgnoreMarks
            } else {
                MarkHandling::Keep
            };
            lookups.push(KernLookup {
                name,
                script: script.clone(),
                rtl,
                marks,
                pairs: refine(pairs, diagnostics),
            });
        }

        lookups.retain(|l| !l.pairs.is_empty());
        if !lookups.is_empty() {
            result.insert(script, lookups);
        }
    }
    result
}

/// Names for every distinct class glyph set
///
/// Full groups are named first, after their group with `public.` stripped.
/// Subsets get `_1`, `_2`, … in sorted order. Names already used in the
/// document are never reused.
#[derive(Debug, Clone, Default)]
pub struct ClassNamer {
    taken: BTreeSet<String>,
    names: BTreeMap<Vec<String>, String>,
    definitions: Vec<GlyphClassDef>,
}

fn base_name(origin: &str) -> &str {
    origin.strip_prefix("public.").unwrap_or(origin)
}

fn identity(class: &KernClass) -> Vec<String> {
    class.sorted_glyphs().into_iter().map(String::from).collect()
}

impl ClassNamer {
    pub fn new(existing: BTreeSet<String>) -> Self {
        Self {
            taken: existing,
            ..Default::default()
        }
    }

    /// Name every class used by these lookups
    ///
    /// `full_members` gives the full member list of an origin group, used
    /// to tell whole groups from subsets.
    pub fn name_lookups<'a>(
        &mut self,
        lookups: impl IntoIterator<Item = &'a KernLookup>,
        full_members: impl Fn(&str) -> Option<Vec<String>>,
    ) {
        let mut by_origin: BTreeMap<&str, BTreeSet<&KernClass>> = BTreeMap::new();
        for lookup in lookups {
            for pair in &lookup.pairs {
                for side in [&pair.side1, &pair.side2] {
                    if let Side::Class(class) = side {
                        by_origin.entry(class.origin.as_str()).or_default().insert(class);
                    }
                }
            }
        }

        let mut subsets: Vec<(&str, &KernClass)> = Vec::new();
        for (&origin, classes) in &by_origin {
            let full: Option<BTreeSet<String>> =
                full_members(origin).map(|members| members.into_iter().collect());
            for &class in classes {
                let is_full = full.as_ref().is_some_and(|f| {
                    f.len() == class.glyphs.len() && class.glyphs.iter().all(|g| f.contains(g))
                });
                if is_full {
                    let name = make_class_name(base_name(origin), &self.taken);
                    self.register(class, name);
                } else {
                    subsets.push((origin, class));
                }
            }
        }

        subsets.sort_by(|a, b| (a.0, identity(a.1)).cmp(&(b.0, identity(b.1))));
        for (origin, class) in subsets {
            if self.names.contains_key(&identity(class)) {
                continue;
            }
            let base = make_class_name(base_name(origin), &BTreeSet::new());
            let mut i = 1;
            let name = loop {
                let candidate = format!("{base}_{i}");
                if !self.taken.contains(&candidate) {
                    break candidate;
                }
                i += 1;
            };
            self.register(class, name);
        }
    }

    fn register(&mut self, class: &KernClass, name: String) {
        let key = identity(class);
        if self.names.contains_key(&key) {
            return;
        }
        log::trace!("Kerning class @{name} for {}", class.origin);
        self.taken.insert(name.clone());
        self.names.insert(key, name.clone());
        self.definitions.push(GlyphClassDef {
            name,
            glyphs: class.glyphs.clone(),
        });
    }

    /// Reserve a fresh name outside the kerning classes
    pub fn reserve(&mut self, name: &str) -> String {
        let name = make_class_name(name, &self.taken);
        self.taken.insert(name.clone());
        name
    }

    pub fn name_of(&self, class: &KernClass) -> Option<&str> {
        self.names.get(&identity(class)).map(String::as_str)
    }

    /// Name of a class, registering a definition if it has none yet
    pub fn name_or_register(&mut self, class: &KernClass) -> String {
        if let Some(name) = self.name_of(class) {
            return name.to_string();
        }
        log::debug!("Kerning class from {} named late", class.origin);
        let name = make_class_name(base_name(&class.origin), &self.taken);
        self.register(class, name.clone());
        name
    }

    /// Class definitions sorted by name
    pub fn definitions(&self) -> Vec<Statement> {
        let mut definitions = self.definitions.clone();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions.into_iter().map(Statement::GlyphClass).collect()
    }
}

fn glyph_ref(side: &Side, namer: &mut ClassNamer) -> GlyphRef {
    match side {
        Side::Glyph(name) => GlyphRef::Glyph(name.clone()),
        Side::Class(class) => GlyphRef::Class(namer.name_or_register(class)),
    }
}

/// Render one pair as a positioning rule
pub fn pair_rule(pair: &KerningPair, rtl: bool, quantization: u32, namer: &mut ClassNamer) -> Statement {
    let value = quantize(pair.value, quantization);
    // numerals shape left to right even inside right-to-left scripts
    let value = if rtl && !pair.bidi.contains(&BidiType::L) {
        ValueRecord::rtl(value)
    } else {
        ValueRecord::Advance(value)
    };
    Statement::PairPos(PairPos {
        first: glyph_ref(&pair.side1, namer),
        second: glyph_ref(&pair.side2, namer),
        value,
        enumerated: pair.first_is_class() ^ pair.second_is_class(),
    })
}

impl KernLookup {
    /// Render the lookup once its classes are named
    pub fn to_block(&self, quantization: u32, namer: &mut ClassNamer) -> LookupBlock {
        let mut block = LookupBlock::new(self.name.as_str());
        match &self.marks {
            MarkHandling::Keep => {},
            MarkHandling::IgnoreMarks => block
                .statements
                .push(Statement::LookupFlag(LookupFlag::ignore_marks())),
            MarkHandling::FilteringSet(glyphs) => {
                let class = namer.reserve(&format!("MFS_{}", self.name));
                block.statements.push(Statement::GlyphClass(GlyphClassDef {
                    name: class.clone(),
                    glyphs: glyphs.clone(),
                }));
                block
                    .statements
                    .push(Statement::LookupFlag(LookupFlag::mark_filtering_set(class)));
            },
        }
        for pair in &self.pairs {
            block
                .statements
                .push(pair_rule(pair, self.rtl, quantization, namer));
        }
        block
    }
}
