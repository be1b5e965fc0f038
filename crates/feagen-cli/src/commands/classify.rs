//! Classify command implementation
//!
//! Prints the glyph classification the kerning writer would use, as JSON.

use crate::cli::ClassifyArgs;
use feagen::{error::Result, FontSource};
use feagen_unicode::{ot_tag_to_script, GlyphClassifier, IcuProperties};
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn run(args: &ClassifyArgs) -> Result<()> {
    let font = FontSource::load(&args.font)?;
    let doc = super::load_features(args.features_json.as_deref())?;

    let known: BTreeSet<String> = doc
        .languages_by_script()
        .iter()
        .filter_map(|(tag, _)| ot_tag_to_script(tag))
        .collect();
    let classification = GlyphClassifier::new(Arc::new(IcuProperties::new()))
        .with_known_scripts(known)
        .classify_font(&font);
    log::info!(
        "Classified {} glyph(s) into {} script(s)",
        classification.scripts.len(),
        classification.all_scripts().len()
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&classification)?
    } else {
        serde_json::to_string(&classification)?
    };
    println!("{json}");
    Ok(())
}
