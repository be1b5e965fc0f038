//! Cursive lookups, split by writing direction

// this_file: crates/feagen-curs/src/lookups.rs

use crate::anchors::{CursiveAnchors, CursivePair};
use feagen_core::ast::{
    make_class_name, CursivePos, FeatureFile, LookupBlock, LookupFlag, Statement,
};
use std::collections::BTreeSet;

/// Which glyphs a cursive lookup holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupDirection {
    /// Every glyph, when none is left-to-right
    Unsplit,
    Ltr,
    Rtl,
}

impl LookupDirection {
    pub fn suffix(&self) -> &'static str {
        match self {
            LookupDirection::Unsplit => "",
            LookupDirection::Ltr => "_ltr",
            LookupDirection::Rtl => "_rtl",
        }
    }

    pub fn flag(&self) -> LookupFlag {
        match self {
            LookupDirection::Ltr => LookupFlag::ignore_marks(),
            LookupDirection::Unsplit | LookupDirection::Rtl => {
                LookupFlag::right_to_left_ignore_marks()
            },
        }
    }
}

/// Builds `curs` lookups with names unique in the document
#[derive(Debug)]
pub struct CursiveLookups {
    taken: BTreeSet<String>,
}

impl CursiveLookups {
    pub fn new(doc: &FeatureFile) -> Self {
        Self {
            taken: doc.defined_lookups(),
        }
    }

    fn lookup(
        &mut self,
        base: &str,
        direction: LookupDirection,
        glyphs: &[&CursiveAnchors],
    ) -> LookupBlock {
        let name = make_class_name(&format!("{base}{}", direction.suffix()), &self.taken);
        self.taken.insert(name.clone());
        let mut lookup = LookupBlock::new(name);
        lookup.statements.push(Statement::LookupFlag(direction.flag()));
        lookup.statements.extend(glyphs.iter().map(|g| {
            Statement::CursivePos(CursivePos {
                glyph: g.glyph.clone(),
                entry: g.entry,
                exit: g.exit,
            })
        }));
        lookup
    }

    /// Lookups for one anchor pair
    ///
    /// Without any left-to-right glyph a single right-to-left lookup holds
    /// everything. Otherwise left-to-right glyphs get their own lookup and
    /// the rest go to a right-to-left one.
    pub fn build(
        &mut self,
        pair: &CursivePair,
        anchors: &[CursiveAnchors],
        ltr: &BTreeSet<String>,
    ) -> Vec<LookupBlock> {
        if anchors.is_empty() {
            return Vec::new();
        }
        let base = match pair.suffix() {
            Some(suffix) => format!("curs_{suffix}"),
            None => "curs".to_string(),
        };
        let (left, right): (Vec<&CursiveAnchors>, Vec<&CursiveAnchors>) =
            anchors.iter().partition(|a| ltr.contains(&a.glyph));

        if left.is_empty() {
            return vec![self.lookup(&base, LookupDirection::Unsplit, &right)];
        }
        let mut lookups = vec![self.lookup(&base, LookupDirection::Ltr, &left)];
        if !right.is_empty() {
            lookups.push(self.lookup(&base, LookupDirection::Rtl, &right));
        }
        log::debug!(
            "Split '{base}' into {} left-to-right and {} right-to-left glyph(s)",
            left.len(),
            right.len()
        );
        lookups
    }
}
