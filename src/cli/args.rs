//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Merge a directory of SVG icons into one inline sprite sheet
#[derive(Parser, Debug, Clone)]
#[command(name = "svg-sprite", version, about, long_about = None)]
pub struct SpriteCli {
    /// Directory containing the icon files
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Path of the sprite file to write
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

/// Export every article as a plain Markdown file next to its rendered page
#[derive(Parser, Debug, Clone)]
#[command(name = "md-export", version, about, long_about = None)]
pub struct ExportCli {
    /// Article source directory (default: content)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Site output directory (default: output)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Article save-as pattern, e.g. "{date:%Y}/{slug}/index.html"
    #[arg(short = 's', long = "save-as")]
    pub save_as: Option<String>,

    /// Config file path, read when it exists
    #[arg(short = 'C', long, default_value = "site.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
