//! feagen: OpenType layout feature synthesis
//!
//! Generates kerning (`kern`, `dist`) and mark attachment (`mark`,
//! `mkmk`) features from a font source and merges them into an existing
//! feature document. Cursive attachment (`curs`) and the `GDEF` table are
//! available as opt-in writers.
//!
//! ```ignore
//! use feagen::prelude::*;
//!
//! let font = FontSource::load("font.json")?;
//! let mut doc = FeatureFile::new();
//! let report = Synthesizer::builder().build()?.run(&font, &mut doc);
//! for diagnostic in report.diagnostics.iter() {
//!     eprintln!("{diagnostic}");
//! }
//! print!("{doc}");
//! ```
//!
//! The writer crates are re-exported for callers that need their
//! building blocks directly.

pub mod synth;
pub mod writer;

pub use feagen_curs as curs;
pub use feagen_gdef as gdef;
pub use feagen_kern as kern;
pub use feagen_mark as mark;
pub use feagen_unicode as unicode;

pub use feagen_core::{
    ast, error, insert, Diagnostic, DiagnosticKind, Diagnostics, FeagenError, FeatureFile, FeatureTag,
    FeatureWriter, FontSource, Glyph, Mode, Result, Severity,
};
pub use synth::{SynthesisReport, Synthesizer, SynthesizerBuilder};
pub use writer::Writer;

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{SynthesisReport, Synthesizer, Writer};
    pub use feagen_core::{
        error::{FeagenError, Result},
        Diagnostics, FeatureFile, FeatureTag, FeatureWriter, FontSource, Mode,
    };
}
