pub mod commands;

use clap::Parser;

pub use commands::{Commands, ConvertArgs};

/// Sarifize — static-analyzer report converter
///
/// Turns Clang Static Analyzer plists and Infer reports into one SARIF
/// document with reconstructed code flows.
#[derive(Parser, Debug)]
#[command(
    name = "sarifize",
    version,
    about = "Convert static-analyzer reports into SARIF",
    long_about = "Sarifize converts Clang Static Analyzer plist files and Infer report.json files\ninto a single SARIF document: one rule catalog, one file table, and one code flow per result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
