//! Kerning pairs and the classes they refer to

use feagen_core::types::{BidiType, Direction};
use std::collections::BTreeSet;
use std::fmt;

/// A kerning class: member glyphs plus the group it was taken from
///
/// Restricted and refined classes keep the origin group name so that
/// class naming can derive related names from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernClass {
    pub origin: String,
    pub glyphs: Vec<String>,
}

impl KernClass {
    pub fn new<I, S>(origin: impl Into<String>, glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let glyphs = glyphs
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| seen.insert(g.clone()))
            .collect();
        Self {
            origin: origin.into(),
            glyphs,
        }
    }

    /// Members in name order; the identity used for comparisons
    pub fn sorted_glyphs(&self) -> Vec<&str> {
        let mut glyphs: Vec<&str> = self.glyphs.iter().map(String::as_str).collect();
        glyphs.sort_unstable();
        glyphs
    }

    pub fn contains(&self, glyph: &str) -> bool {
        self.glyphs.iter().any(|g| g == glyph)
    }

    /// Same origin, only the members that pass `keep`, in the original order
    pub fn restrict(&self, keep: impl Fn(&str) -> bool) -> Option<KernClass> {
        let glyphs: Vec<String> = self.glyphs.iter().filter(|g| keep(g)).cloned().collect();
        if glyphs.is_empty() {
            None
        } else {
            Some(KernClass {
                origin: self.origin.clone(),
                glyphs,
            })
        }
    }
}

/// One side of a kerning pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Glyph(String),
    Class(KernClass),
}

impl Side {
    pub fn is_class(&self) -> bool {
        matches!(self, Side::Class(_))
    }

    pub fn glyphs(&self) -> Vec<&str> {
        match self {
            Side::Glyph(name) => vec![name.as_str()],
            Side::Class(class) => class.glyphs.iter().map(String::as_str).collect(),
        }
    }

    pub fn sorted_glyphs(&self) -> Vec<&str> {
        match self {
            Side::Glyph(name) => vec![name.as_str()],
            Side::Class(class) => class.sorted_glyphs(),
        }
    }

    /// A glyph side survives when it passes; a class side shrinks
    pub fn restrict(&self, keep: impl Fn(&str) -> bool) -> Option<Side> {
        match self {
            Side::Glyph(name) => keep(name).then(|| self.clone()),
            Side::Class(class) => class.restrict(keep).map(Side::Class),
        }
    }

    /// Name used for ordering ties: the glyph or the origin group
    pub fn key(&self) -> &str {
        match self {
            Side::Glyph(name) => name,
            Side::Class(class) => &class.origin,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Glyph(name) => f.write_str(name),
            Side::Class(class) => write!(f, "@{}[{}]", class.origin, class.glyphs.join(" ")),
        }
    }
}

/// A resolved kerning pair with the annotations collected while routing it
#[derive(Debug, Clone, PartialEq)]
pub struct KerningPair {
    pub side1: Side,
    pub side2: Side,
    pub value: f64,
    pub scripts: BTreeSet<String>,
    pub directions: BTreeSet<Direction>,
    pub bidi: BTreeSet<BidiType>,
}

impl KerningPair {
    pub fn new(side1: Side, side2: Side, value: f64) -> Self {
        Self {
            side1,
            side2,
            value,
            scripts: BTreeSet::new(),
            directions: BTreeSet::new(),
            bidi: BTreeSet::new(),
        }
    }

    pub fn first_is_class(&self) -> bool {
        self.side1.is_class()
    }

    pub fn second_is_class(&self) -> bool {
        self.side2.is_class()
    }

    pub fn is_class_pair(&self) -> bool {
        self.first_is_class() && self.second_is_class()
    }

    /// All glyphs on either side
    pub fn glyphs(&self) -> BTreeSet<&str> {
        self.side1
            .glyphs()
            .into_iter()
            .chain(self.side2.glyphs())
            .collect()
    }

    /// Specificity order: glyph-glyph, glyph-class, class-glyph, class-class,
    /// then member glyphs, then names
    pub fn sort_key(&self) -> (bool, bool, Vec<&str>, Vec<&str>, &str, &str) {
        (
            self.first_is_class(),
            self.second_is_class(),
            self.side1.sorted_glyphs(),
            self.side2.sorted_glyphs(),
            self.side1.key(),
            self.side2.key(),
        )
    }

    /// Same value, new sides, annotations carried over
    pub fn with_sides(&self, side1: Side, side2: Side) -> Self {
        Self {
            side1,
            side2,
            ..self.clone()
        }
    }
}

impl fmt::Display for KerningPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side1, self.side2, self.value)
    }
}

/// Sort pairs into specificity order
pub fn sort_pairs(pairs: &mut [KerningPair]) {
    pairs.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
