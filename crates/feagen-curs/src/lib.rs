// this_file: crates/feagen-curs/src/lib.rs

//! Cursive attachment (`curs`) from `entry` and `exit` anchors.
//!
//! Each glyph's `entry` anchor is connected to the `exit` anchor of the
//! glyph before it. Named pairs such as `entry.alt` and `exit.alt` get
//! lookups of their own. Lookups are split by writing direction when the
//! font has left-to-right cursive glyphs.

pub mod anchors;
pub mod lookups;
pub mod writer;

pub use anchors::{collect_cursive_anchors, cursive_pairs, CursiveAnchors, CursivePair};
pub use lookups::{CursiveLookups, LookupDirection};
pub use writer::{CursFeatureWriter, CursFeatureWriterBuilder};
