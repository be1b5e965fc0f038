//! Mark attachment feature synthesis
//!
//! Builds `mark` (mark-to-base and mark-to-ligature) and `mkmk`
//! (mark-to-mark) from the anchors on a font's glyphs:
//!
//! 1. [`anchors`] - parse anchor names, reject malformed ones
//! 2. [`pairs`] - base/mark pairs and ligature component series
//! 3. [`lookups`] - mark classes and the attachment lookups
//!
//! [`MarkFeatureWriter`] runs it behind the
//! [`FeatureWriter`](feagen_core::FeatureWriter) trait.

pub mod anchors;
pub mod lookups;
pub mod pairs;
pub mod writer;

pub use anchors::{GlyphAnchors, NamedAnchor};
pub use pairs::{build_anchor_pairs, AnchorPair, AnchorPairs, LigatureSeries};
pub use writer::{MarkFeatureWriter, MarkFeatureWriterBuilder};
