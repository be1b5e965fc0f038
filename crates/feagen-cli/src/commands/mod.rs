//! Subcommand implementations

pub mod classify;
pub mod generate;
pub mod info;

use feagen::{FeatureFile, Result};
use std::path::Path;

/// The feature document to merge into; a missing path means an empty one
pub(crate) fn load_features(path: Option<&Path>) -> Result<FeatureFile> {
    match path {
        Some(path) => {
            log::debug!("Loading feature document from {}", path.display());
            FeatureFile::load(path)
        },
        None => Ok(FeatureFile::new()),
    }
}
