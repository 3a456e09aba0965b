//! Command-line interface for Fresco.

use clap::Parser;
use std::path::PathBuf;

/// Generate illustrations for a story text file using Gemini.
///
/// Reads the story, detects an art style, builds a catalog of consistent
/// characters and locations, and renders one 16:9 illustration per scene
/// into the output directory. Re-running against the same output directory
/// resumes from the existing artifacts.
#[derive(Debug, Parser)]
#[command(name = "fresco", version, about)]
pub struct Cli {
    /// Path to the input text file (story)
    #[arg(long, short = 't')]
    pub text_file: PathBuf,

    /// Optional initial style preferences folded into style detection
    #[arg(long, short = 's', default_value = "")]
    pub style_prompt: String,

    /// Directory to save results
    #[arg(long, short = 'o', default_value = "output")]
    pub output_dir: PathBuf,

    /// Enable debug-level logging (RUST_LOG still takes precedence)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
