//! Mark classes and attachment lookups
//!
//! [`AttachmentBuilder`] turns anchored glyphs and their [`AnchorPairs`]
//! into `markClass` definitions and the `mark<i>`, `mark2liga<i>` and
//! `mkmk<i>` lookups. Numbering follows the position of the pair in its
//! list, so skipping an empty lookup leaves a gap instead of renumbering.

// this_file: crates/feagen-mark/src/lookups.rs

use crate::anchors::GlyphAnchors;
use crate::pairs::{AnchorPair, AnchorPairs};
use feagen_core::{
    ast::{
        make_class_name, AnchorMark, FeaAnchor, FeatureFile, GlyphClassDef, LookupBlock,
        LookupFlag, MarkAttach, MarkClassDef, MarkLigature, Statement,
    },
    diagnostics::{DiagnosticKind, Diagnostics},
};
use std::collections::{BTreeMap, BTreeSet};

/// A mark class as it will appear in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkClass {
    pub name: String,
    /// Glyphs that still need a `markClass` statement, sorted by name
    pub definitions: Vec<(String, FeaAnchor)>,
    /// Glyphs the document already puts in this class
    pub existing: Vec<String>,
}

impl MarkClass {
    /// Every glyph in the class, sorted
    pub fn glyphs(&self) -> BTreeSet<&str> {
        self.definitions
            .iter()
            .map(|(g, _)| g.as_str())
            .chain(self.existing.iter().map(String::as_str))
            .collect()
    }

    fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.definitions.iter().map(|(glyph, anchor)| {
            Statement::MarkClass(MarkClassDef {
                class: self.name.clone(),
                glyphs: vec![glyph.clone()],
                anchor: *anchor,
            })
        })
    }
}

/// Decide the name and pending definitions of every mark class
///
/// Classes are keyed by mark anchor name. A class the document already
/// defines is reused when it agrees with the font on every shared glyph;
/// when any glyph sits at a different anchor the whole class moves to a
/// fresh name.
pub fn reconcile_mark_classes(
    glyphs: &[GlyphAnchors],
    mark_anchors: &BTreeSet<&str>,
    doc: &FeatureFile,
    quantization: Option<u32>,
) -> BTreeMap<String, MarkClass> {
    let existing_classes = doc.mark_classes();
    let mut taken = doc.class_names();
    let mut classes = BTreeMap::new();

    for &anchor_name in mark_anchors {
        let mut members: Vec<(String, FeaAnchor)> = glyphs
            .iter()
            .filter_map(|g| {
                g.get(anchor_name).map(|a| {
                    let (x, y) = a.position(quantization);
                    (g.glyph.clone(), FeaAnchor::new(x, y))
                })
            })
            .collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));

        let candidate = make_class_name(&format!("MC{anchor_name}"), &BTreeSet::new());
        let class = match existing_classes.get(&candidate) {
            Some(current) => {
                let conflict = members.iter().any(|(glyph, anchor)| {
                    current.iter().any(|(g, a)| g == glyph && a != anchor)
                });
                if conflict {
                    let name = make_class_name(&candidate, &taken);
                    log::info!(
                        "Mark class @{candidate} disagrees with the font's '{anchor_name}' anchors, using @{name}"
                    );
                    MarkClass {
                        name,
                        definitions: members,
                        existing: Vec::new(),
                    }
                } else {
                    log::debug!("Reusing mark class @{candidate} from the feature source");
                    MarkClass {
                        name: candidate,
                        definitions: members
                            .into_iter()
                            .filter(|(glyph, _)| !current.iter().any(|(g, _)| g == glyph))
                            .collect(),
                        existing: current.iter().map(|(g, _)| g.clone()).collect(),
                    }
                }
            },
            None => MarkClass {
                name: make_class_name(&candidate, &taken),
                definitions: members,
                existing: Vec::new(),
            },
        };
        taken.insert(class.name.clone());
        classes.insert(anchor_name.to_string(), class);
    }
    classes
}

/// Builds the attachment lookups for one font
pub struct AttachmentBuilder<'a> {
    glyphs: &'a [GlyphAnchors],
    pairs: &'a AnchorPairs,
    accents: BTreeSet<&'a str>,
    classes: BTreeMap<String, MarkClass>,
    taken_classes: BTreeSet<String>,
    taken_lookups: BTreeSet<String>,
    quantization: Option<u32>,
}

impl<'a> AttachmentBuilder<'a> {
    pub fn new(
        glyphs: &'a [GlyphAnchors],
        pairs: &'a AnchorPairs,
        doc: &FeatureFile,
        quantization: Option<u32>,
    ) -> Self {
        let mark_anchors = pairs.mark_anchor_names();
        let accents = glyphs
            .iter()
            .filter(|g| g.anchors.iter().any(|a| mark_anchors.contains(a.name.as_str())))
            .map(|g| g.glyph.as_str())
            .collect();
        let classes = reconcile_mark_classes(glyphs, &mark_anchors, doc, quantization);
        let mut taken_classes = doc.class_names();
        taken_classes.extend(classes.values().map(|c| c.name.clone()));

        Self {
            glyphs,
            pairs,
            accents,
            classes,
            taken_classes,
            taken_lookups: doc.defined_lookups(),
            quantization,
        }
    }

    /// Glyphs that carry a mark anchor used by some pair
    pub fn accents(&self) -> &BTreeSet<&'a str> {
        &self.accents
    }

    pub fn class(&self, mark_anchor: &str) -> Option<&MarkClass> {
        self.classes.get(mark_anchor)
    }

    fn lookup_name(&mut self, name: String) -> String {
        let name = make_class_name(&name, &self.taken_lookups);
        self.taken_lookups.insert(name.clone());
        name
    }

    fn anchor_mark(
        &self,
        glyph: &GlyphAnchors,
        base_anchor: &str,
        mark_anchor: &str,
    ) -> Option<AnchorMark> {
        let anchor = glyph.get(base_anchor)?;
        let class = self.classes.get(mark_anchor)?;
        let (x, y) = anchor.position(self.quantization);
        Some(AnchorMark {
            anchor: FeaAnchor::new(x, y),
            class: class.name.clone(),
        })
    }

    /// `mark<i>` lookups: non-mark glyphs carrying the base anchor
    pub fn mark_to_base(&mut self) -> Vec<LookupBlock> {
        let (glyphs, pairs) = (self.glyphs, self.pairs);
        let mut lookups = Vec::new();
        for (i, pair) in pairs.base.iter().enumerate() {
            let rules: Vec<Statement> = glyphs
                .iter()
                .filter(|g| !self.accents.contains(g.glyph.as_str()))
                .filter_map(|g| {
                    self.anchor_mark(g, &pair.base, &pair.mark).map(|mark| {
                        Statement::MarkBase(MarkAttach {
                            base: g.glyph.clone(),
                            marks: vec![mark],
                        })
                    })
                })
                .collect();
            if rules.is_empty() {
                continue;
            }
            let mut lookup = LookupBlock::new(self.lookup_name(format!("mark{}", i + 1)));
            lookup.statements = rules;
            lookups.push(lookup);
        }
        lookups
    }

    /// `mark2liga<i>` lookups
    ///
    /// A glyph lists components up to the highest series anchor it carries;
    /// components without an anchor get `<anchor NULL>`.
    pub fn mark_to_ligature(&mut self) -> Vec<LookupBlock> {
        let (glyphs, pairs) = (self.glyphs, self.pairs);
        let mut lookups = Vec::new();
        for (i, series) in pairs.ligature.iter().enumerate() {
            let mut rules = Vec::new();
            for glyph in glyphs {
                let Some(last) = series
                    .components
                    .iter()
                    .rposition(|name| glyph.has(name))
                else {
                    continue;
                };
                let components: Vec<Vec<AnchorMark>> = series.components[..=last]
                    .iter()
                    .map(|name| {
                        self.anchor_mark(glyph, name, &series.mark)
                            .into_iter()
                            .collect()
                    })
                    .collect();
                rules.push(Statement::MarkLigature(MarkLigature {
                    ligature: glyph.glyph.clone(),
                    components,
                }));
            }
            if rules.is_empty() {
                continue;
            }
            let mut lookup = LookupBlock::new(self.lookup_name(format!("mark2liga{}", i + 1)));
            lookup.statements = rules;
            lookups.push(lookup);
        }
        lookups
    }

    /// `mkmk<i>` lookups, each filtered to its own mark class and base marks
    pub fn mark_to_mark(&mut self) -> Vec<LookupBlock> {
        let (glyphs, pairs) = (self.glyphs, self.pairs);
        let mut lookups = Vec::new();
        for (i, pair) in pairs.mark.iter().enumerate() {
            let bases: Vec<&GlyphAnchors> = glyphs
                .iter()
                .filter(|g| self.accents.contains(g.glyph.as_str()) && g.has(&pair.base))
                .collect();
            let rules: Vec<Statement> = bases
                .iter()
                .filter_map(|g| {
                    self.anchor_mark(g, &pair.base, &pair.mark).map(|mark| {
                        Statement::MarkMark(MarkAttach {
                            base: g.glyph.clone(),
                            marks: vec![mark],
                        })
                    })
                })
                .collect();
            if rules.is_empty() {
                continue;
            }

            let mut filter: BTreeSet<String> = self
                .classes
                .get(&pair.mark)
                .map(|c| c.glyphs().into_iter().map(str::to_string).collect())
                .unwrap_or_default();
            filter.extend(bases.iter().map(|g| g.glyph.clone()));
            let filter_name = make_class_name(&format!("mkmk{}MkAttach", i + 1), &self.taken_classes);
            self.taken_classes.insert(filter_name.clone());

            let mut lookup = LookupBlock::new(self.lookup_name(format!("mkmk{}", i + 1)));
            lookup.statements.push(Statement::GlyphClass(GlyphClassDef {
                name: filter_name.clone(),
                glyphs: filter.into_iter().collect(),
            }));
            lookup
                .statements
                .push(Statement::LookupFlag(LookupFlag::mark_filtering_set(filter_name)));
            lookup.statements.extend(rules);
            lookups.push(lookup);
        }
        lookups
    }

    /// Report glyph pairs that attach through more than one anchor pair
    pub fn report_ambiguities(&self, to_marks: bool, diagnostics: &mut Diagnostics) {
        let mut links: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
        let pairs: &[AnchorPair] = if to_marks {
            &self.pairs.mark
        } else {
            &self.pairs.base
        };

        for pair in pairs {
            let Some(class) = self.classes.get(&pair.mark) else {
                continue;
            };
            let bases = self.glyphs.iter().filter(|g| {
                self.accents.contains(g.glyph.as_str()) == to_marks && g.has(&pair.base)
            });
            for base in bases {
                for mark in self.glyphs.iter().filter(|g| g.glyph != base.glyph && g.has(&pair.mark)) {
                    links
                        .entry((base.glyph.as_str(), mark.glyph.as_str()))
                        .or_default()
                        .push(class.name.as_str());
                }
            }
        }

        for ((base, mark), classes) in links.into_iter().filter(|(_, c)| c.len() > 1) {
            let classes: Vec<String> = classes.iter().map(|c| format!("@{c}")).collect();
            diagnostics.report(
                DiagnosticKind::AmbiguousAnchor,
                format!(
                    "Glyph '{mark}' attaches to '{base}' through several mark classes ({}); the last lookup wins",
                    classes.join(", ")
                ),
            );
        }
    }

    /// `markClass` statements for the classes the lookups reference
    ///
    /// Ordered by mark anchor name, then glyph name.
    pub fn definitions<'b>(&self, lookups: impl IntoIterator<Item = &'b LookupBlock>) -> Vec<Statement> {
        let used = referenced_classes(lookups);
        self.classes
            .values()
            .filter(|c| used.contains(c.name.as_str()))
            .flat_map(|c| c.statements())
            .collect()
    }
}

/// Mark class names referenced by the rules of these lookups
pub fn referenced_classes<'b>(lookups: impl IntoIterator<Item = &'b LookupBlock>) -> BTreeSet<&'b str> {
    let mut used = BTreeSet::new();
    for statement in lookups.into_iter().flat_map(|l| &l.statements) {
        match statement {
            Statement::MarkBase(rule) | Statement::MarkMark(rule) => {
                used.extend(rule.marks.iter().map(|m| m.class.as_str()));
            },
            Statement::MarkLigature(rule) => {
                used.extend(rule.components.iter().flatten().map(|m| m.class.as_str()));
            },
            _ => {},
        }
    }
    used
}
