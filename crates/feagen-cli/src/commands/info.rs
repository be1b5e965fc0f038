//! Info command implementation
//!
//! Displays the available writers, their options and, optionally, a
//! summary of a font source.

use crate::cli::InfoArgs;
use feagen::{
    error::Result,
    writer::{DEFAULT_WRITERS, WRITER_NAMES},
    FeatureWriter, FontSource, Writer,
};
use std::path::Path;

pub fn run(args: &InfoArgs) -> Result<()> {
    let show_all = !args.writers && !args.options && args.font.is_none();

    println!("feagen v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if show_all || args.writers {
        print_writers()?;
        if show_all {
            println!();
        }
    }

    if show_all || args.options {
        print_options();
    }

    if let Some(path) = &args.font {
        print_font(path)?;
    }

    Ok(())
}

fn print_writers() -> Result<()> {
    println!("Writers:");
    for name in WRITER_NAMES {
        let writer = Writer::with_defaults(name, None)?;
        let features: Vec<&str> = writer.features().iter().map(|t| t.as_str()).collect();
        let note = if DEFAULT_WRITERS.contains(&name) { "" } else { " (opt-in)" };
        println!("  {:<17} - features: {}{note}", name, features.join(", "));
    }
    Ok(())
}

fn print_options() {
    println!("Writer options:");
    println!("  kern(ignoreMarks=<bool>)    - Keep marks out of base kerning (default: true)");
    println!("  kern(quantization=<int>)    - Round values to multiples (default: 1)");
    println!("  mark(quantization=<int>)    - Snap anchors down to multiples (default: off)");
    println!("  gdef                        - GlyphClassDef and ligature carets, merged into GDEF");
    println!("  curs                        - Cursive attachment from entry/exit anchors");
    println!("  <writer>(mode=skip|append)  - Merge mode (default: FEAGEN_MODE, then skip)");
    println!("  <writer>(features=a|b)      - Subset of the writer's features");
}

fn print_font(path: &Path) -> Result<()> {
    let font = FontSource::load(path)?;
    let anchors: usize = font.glyphs.iter().map(|g| g.anchors.len()).sum();
    println!();
    println!("Font source: {}", path.display());
    println!("  Glyphs:          {}", font.glyphs.len());
    println!("  Exported:        {}", font.exported_glyphs().len());
    println!("  Groups:          {}", font.groups.len());
    println!("  Kerning pairs:   {}", font.kerning_pairs().len());
    println!("  Anchors:         {anchors}");
    Ok(())
}
