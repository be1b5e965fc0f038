//! feagen core: the shared ground every layout writer stands on
//!
//! A synthesis pass reads a [`FontSource`], generates OpenType layout
//! statements and splices them into a [`FeatureFile`]. This crate holds
//! the pieces every writer shares:
//!
//! - [`ast`] - the feature document tree and its text rendering
//! - [`insert`] - merge modes, insertion markers and splicing
//! - [`font`] - the read-only font data model
//! - [`diagnostics`] - recoverable conditions reported alongside output
//! - [`config`] - writer spec strings and environment overrides
//! - [`traits`] - [`UnicodeProperties`] and [`FeatureWriter`]
//!
//! ```
//! use feagen_core::ast::{FeatureFile, Statement};
//!
//! let doc = FeatureFile {
//!     statements: vec![Statement::LanguageSystem {
//!         script: "DFLT".into(),
//!         language: "dflt".into(),
//!     }],
//! };
//! assert_eq!(doc.to_string(), "languagesystem DFLT dflt;");
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod font;
pub mod insert;
pub mod traits;
pub mod types;

pub use ast::FeatureFile;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{FeagenError, Result};
pub use font::{FontSource, Glyph};
pub use traits::{FeatureWriter, UnicodeProperties};
pub use types::{BidiType, Direction, FeatureTag, Mode, NEUTRAL_SCRIPT};
