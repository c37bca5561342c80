//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;

/// Output format for transcription results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per word)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorOption {
    /// Color when stderr is a terminal
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl ColorOption {
    pub fn to_termcolor(self) -> termcolor::ColorChoice {
        match self {
            ColorOption::Auto => {
                if std::io::stderr().is_terminal() {
                    termcolor::ColorChoice::Auto
                } else {
                    termcolor::ColorChoice::Never
                }
            }
            ColorOption::Always => termcolor::ColorChoice::Always,
            ColorOption::Never => termcolor::ColorChoice::Never,
        }
    }
}

/// graphon CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "graphon")]
#[command(about = "Rule-based grapheme-to-phoneme conversion with syllabification")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorOption,
}

/// Available graphon subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transcribe words using a G2P rule file
    Transcribe(TranscribeArgs),

    /// Syllabify transcriptions using a syllabifier definition file
    Syllabify(SyllabifyArgs),
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// G2P rule file
    pub rule_file: String,

    /// Words to transcribe, or files with one word per line; stdin when empty
    pub inputs: Vec<String>,

    /// Print transcriptions even if validation or mapping fails
    #[arg(long)]
    pub force: bool,

    /// Suppress warnings
    #[arg(long)]
    pub quiet: bool,

    /// Compare output against reference transcriptions in the input columns
    #[arg(long)]
    pub test: bool,

    /// Strip stress symbols before --test comparison
    #[arg(long = "remove-stress")]
    pub remove_stress: bool,

    /// Phoneme set file (one symbol per line) overriding the grammar's
    /// PHONEME_SET
    #[arg(long)]
    pub symbolset: Option<String>,

    /// Tab-separated input: transcribe the given column
    #[arg(long, default_value = "0")]
    pub column: usize,

    /// Report which rules were applied and which never fired
    #[arg(long)]
    pub coverage: bool,

    /// Output format
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Print trace output on stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct SyllabifyArgs {
    /// Syllabifier definition file
    pub syll_file: String,

    /// Transcriptions to syllabify, or files with one per line; stdin when
    /// empty
    pub inputs: Vec<String>,

    /// Print output even if the embedded tests fail
    #[arg(long)]
    pub force: bool,

    /// Suppress warnings
    #[arg(long)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}
