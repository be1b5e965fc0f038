//! Kerning feature synthesis
//!
//! Turns a font's raw kerning into `kern` and `dist` features:
//!
//! 1. [`resolve`] - groups and keys to typed pairs in specificity order
//! 2. [`partition`] - pairs routed into per-script buckets
//! 3. [`refine`] - disjoint classes inside every lookup
//! 4. [`lookups`] - base and mark lookups, class naming, rules
//! 5. [`features`] - lookup registration per script and language
//!
//! [`KernFeatureWriter`] runs all of it behind the
//! [`FeatureWriter`](feagen_core::FeatureWriter) trait.

pub mod features;
pub mod lookups;
pub mod pairs;
pub mod partition;
pub mod refine;
pub mod resolve;
pub mod writer;

pub use pairs::{KernClass, KerningPair, Side};
pub use writer::{KernFeatureWriter, KernFeatureWriterBuilder};
