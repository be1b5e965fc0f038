//! CLI argument definitions using Clap v4

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use feagen::Mode;
use std::path::PathBuf;

/// feagen - OpenType layout feature synthesis from font sources
#[derive(Parser, Debug)]
#[command(name = "feagen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate layout features and merge them into a feature document
    #[command(alias = "g")]
    Generate(GenerateArgs),

    /// Print the script, direction and bidi classification of every glyph
    #[command(alias = "c")]
    Classify(ClassifyArgs),

    /// Display information about writers, options and a font source
    #[command(alias = "i")]
    Info(InfoArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Font source (JSON)
    pub font: PathBuf,

    /// Existing feature document (JSON statement tree)
    #[arg(short = 'f', long = "features-json")]
    pub features_json: Option<PathBuf>,

    /// Writer spec, e.g. `kern(quantization=5)` or `mark(features=mkmk)`;
    /// repeatable, defaults to kern and mark (`gdef` and `curs` are opt-in)
    #[arg(short = 'w', long = "writer", action = ArgAction::Append)]
    pub writers: Vec<String>,

    /// Merge mode for writers that do not set one (default: FEAGEN_MODE, then skip)
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<ModeArg>,

    /// Fail when any warning diagnostic is reported
    #[arg(long = "strict")]
    pub strict: bool,

    /// Write the merged document as JSON instead of feature-file text
    #[arg(long = "json")]
    pub json: bool,

    /// Output file path (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Font source (JSON)
    pub font: PathBuf,

    /// Feature document whose languagesystems restrict multi-script glyphs
    #[arg(short = 'f', long = "features-json")]
    pub features_json: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// List available writers and their features
    #[arg(long)]
    pub writers: bool,

    /// List writer options
    #[arg(long)]
    pub options: bool,

    /// Summarize a font source
    #[arg(long)]
    pub font: Option<PathBuf>,
}

/// Merge modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ModeArg {
    /// Leave existing features alone unless an insertion marker asks for more
    Skip,
    /// Always add generated features after existing ones
    Append,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Skip => Mode::Skip,
            ModeArg::Append => Mode::Append,
        }
    }
}
