//! GDEF table synthesis
//!
//! Two independent parts go into the table:
//!
//! 1. [`categories`] - `GlyphClassDef` from `public.openTypeCategories`
//! 2. [`carets`] - `LigatureCaretByPos` from `caret_*` and `vcaret_*` anchors
//!
//! [`GdefFeatureWriter`] only generates the parts an existing table lacks.

pub mod categories;
pub mod carets;
pub mod writer;

pub use categories::{glyph_categories, GlyphCategories, OpenTypeCategory};
pub use carets::ligature_carets;
pub use writer::{GdefFeatureWriter, GdefFeatureWriterBuilder};
