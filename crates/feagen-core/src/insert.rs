//! Splicing generated statements into an existing document
//!
//! Each writer hands over a [`Contribution`]: shared definitions, lookups
//! and one feature block per tag. [`splice`] places the blocks tag by tag
//! in splice order, honoring the merge [`Mode`] and any insertion marker
//! found in an existing block of the same tag.

// this_file: crates/feagen-core/src/insert.rs

use crate::ast::{FeatureBlock, FeatureFile, GdefClasses, LookupBlock, Statement};
use crate::error::{FeagenError, Result};
use crate::types::{FeatureTag, Mode};
use std::collections::BTreeSet;

const MARKER_PREFIX: &str = "# automatic code";

/// Does this comment ask for generated code to be inserted here?
///
/// Matches `# Automatic Code` case-insensitively, with any suffix.
pub fn is_insertion_marker(comment: &str) -> bool {
    comment
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(MARKER_PREFIX)
}

/// Where generated code goes relative to the block holding the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    Before(usize),
    After(usize),
    Replace(usize),
}

/// How one feature tag ended up in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Appended,
    BeforeBlock,
    AfterBlock,
    ReplacedBlock,
    /// Missing parts were filled into an existing table
    MergedTable,
    /// The tag already had a block and no marker asked for more
    Skipped,
}

/// Statements one writer contributes to the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contribution {
    /// Class and mark class definitions, placed with the first written feature
    pub definitions: Vec<Statement>,
    /// Top-level lookups, placed with the first feature referencing them
    pub lookups: Vec<LookupBlock>,
    pub features: Vec<(FeatureTag, FeatureBlock)>,
    /// GDEF parts the document's table still lacks
    pub gdef: Option<GdefClasses>,
}

impl Contribution {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.gdef.is_none()
    }

    pub fn tags(&self) -> Vec<FeatureTag> {
        let mut tags: Vec<FeatureTag> = self.features.iter().map(|(tag, _)| *tag).collect();
        if self.gdef.is_some() {
            tags.push(FeatureTag::Gdef);
        }
        tags
    }
}

/// Result of splicing one feature tag
#[derive(Debug)]
pub struct TagOutcome {
    pub tag: FeatureTag,
    pub result: Result<Placement>,
}

/// Tags a writer should still generate given the document and mode
pub fn pending_features(
    doc: &FeatureFile,
    wanted: &BTreeSet<FeatureTag>,
    mode: Mode,
) -> BTreeSet<FeatureTag> {
    wanted
        .iter()
        .copied()
        .filter(|tag| match mode {
            Mode::Append => true,
            Mode::Skip => !doc.has_feature(tag.as_str()) || find_marker(doc, tag.as_str()).is_some(),
        })
        .collect()
}

/// Locate the first insertion marker inside a top-level block with this tag
///
/// Returns (block index, statement index within the block).
pub fn find_marker(doc: &FeatureFile, tag: &str) -> Option<(usize, usize)> {
    doc.statements.iter().enumerate().find_map(|(i, s)| match s {
        Statement::Feature(block) if block.tag == tag => block
            .statements
            .iter()
            .position(|st| matches!(st, Statement::Comment { text } if is_insertion_marker(text)))
            .map(|j| (i, j)),
        _ => None,
    })
}

/// Resolve and consume the insertion marker for a tag
///
/// The marker comment is removed from its block. Rules on both sides of the
/// marker are an error and leave the document untouched.
pub fn resolve_marker(doc: &mut FeatureFile, tag: &str) -> Result<Option<InsertionPoint>> {
    let Some((block_index, marker_index)) = find_marker(doc, tag) else {
        return Ok(None);
    };
    let Some(Statement::Feature(block)) = doc.statements.get_mut(block_index) else {
        return Ok(None);
    };

    let rules_before = block.statements[..marker_index]
        .iter()
        .any(|s| !s.is_comment());
    let rules_after = block.statements[marker_index + 1..]
        .iter()
        .any(|s| !s.is_comment());

    let point = match (rules_before, rules_after) {
        (true, true) => {
            return Err(FeagenError::AmbiguousInsertionMarker {
                feature: tag.to_string(),
            })
        },
        (false, true) => InsertionPoint::Before(block_index),
        (true, false) => InsertionPoint::After(block_index),
        (false, false) => InsertionPoint::Replace(block_index),
    };
    block.statements.remove(marker_index);
    log::debug!("Insertion marker for '{tag}' resolved to {point:?}");
    Ok(Some(point))
}

/// Splice a contribution into the document, one tag at a time
///
/// Tags are processed in splice order (kern, dist, mark, mkmk, curs). A
/// failure on one tag is reported in its outcome and does not stop the
/// others. GDEF parts are merged last and ignore the mode.
pub fn splice(doc: &mut FeatureFile, contribution: Contribution, mode: Mode) -> Vec<TagOutcome> {
    let Contribution {
        definitions,
        lookups,
        mut features,
        gdef,
    } = contribution;
    features.sort_by_key(|(tag, _)| *tag);

    let mut outcomes = Vec::with_capacity(features.len());
    let mut placed_lookups: BTreeSet<String> = BTreeSet::new();
    let mut definitions = Some(definitions).filter(|d| !d.is_empty());
    let mut appended_until: Option<usize> = None;

    for (tag, feature) in features {
        let point = match mode {
            Mode::Append => None,
            Mode::Skip => match resolve_marker(doc, tag.as_str()) {
                Ok(point) => {
                    if point.is_none() && doc.has_feature(tag.as_str()) {
                        log::info!("Feature '{tag}' already present, skipping");
                        outcomes.push(TagOutcome {
                            tag,
                            result: Ok(Placement::Skipped),
                        });
                        continue;
                    }
                    point
                },
                Err(e) => {
                    log::warn!("Cannot insert feature '{tag}': {e}");
                    outcomes.push(TagOutcome { tag, result: Err(e) });
                    continue;
                },
            },
        };

        let mut unit = Vec::new();
        if let Some(defs) = definitions.take() {
            unit.extend(defs);
            unit.push(Statement::blank());
        }
        for name in feature.lookup_names() {
            if placed_lookups.contains(name) {
                continue;
            }
            if let Some(lookup) = lookups.iter().find(|l| l.name == name) {
                placed_lookups.insert(name.to_string());
                unit.push(Statement::Lookup(lookup.clone()));
            }
        }
        unit.push(Statement::Feature(feature));

        let (index, placement) = match point {
            None => (doc.statements.len(), Placement::Appended),
            Some(InsertionPoint::Before(i)) => (i, Placement::BeforeBlock),
            Some(InsertionPoint::After(i)) => (i + 1, Placement::AfterBlock),
            Some(InsertionPoint::Replace(i)) => {
                doc.statements.remove(i);
                (i, Placement::ReplacedBlock)
            },
        };

        let continues_previous = appended_until == Some(index) && index == doc.statements.len();
        if index > 0 && !continues_previous {
            unit.insert(0, Statement::blank());
        }
        let len = unit.len();
        doc.statements.splice(index..index, unit);
        appended_until = if placement == Placement::Appended {
            Some(index + len)
        } else {
            None
        };

        log::debug!("Spliced feature '{tag}' at index {index} ({placement:?})");
        outcomes.push(TagOutcome {
            tag,
            result: Ok(placement),
        });
    }

    if let Some(gdef) = gdef {
        outcomes.push(TagOutcome {
            tag: FeatureTag::Gdef,
            result: Ok(merge_gdef(doc, gdef)),
        });
    }

    outcomes
}

/// Fill the parts the document's first GDEF table lacks, or append a table
///
/// An existing `GlyphClassDef` or caret list is never replaced.
pub fn merge_gdef(doc: &mut FeatureFile, gdef: GdefClasses) -> Placement {
    let existing = doc.statements.iter_mut().find_map(|s| match s {
        Statement::Gdef(table) => Some(table),
        _ => None,
    });
    match existing {
        Some(table) => {
            if !table.has_class_def() && gdef.has_class_def() {
                table.base = gdef.base;
                table.ligature = gdef.ligature;
                table.mark = gdef.mark;
                table.component = gdef.component;
            }
            if table.carets.is_empty() {
                table.carets = gdef.carets;
            }
            log::debug!("Merged generated GDEF parts into the existing table");
            Placement::MergedTable
        },
        None => {
            if !doc.statements.is_empty() {
                doc.statements.push(Statement::blank());
            }
            doc.statements.push(Statement::Gdef(gdef));
            Placement::Appended
        },
    }
}
