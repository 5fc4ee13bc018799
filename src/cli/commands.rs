use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert analyzer reports into one SARIF document
    Convert(ConvertArgs),

    /// Initialize a .sarifize.toml config file in the current directory
    Init,

    /// List the supported input formats
    ListFormats,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Report files to convert. Results keep this order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Input format: "plist" or "infer"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Root that relative paths in the reports are resolved against
    /// (defaults to the current directory)
    #[arg(long)]
    pub project_path: Option<PathBuf>,

    /// Skip fingerprinting of referenced source files
    #[arg(long)]
    pub no_hash: bool,

    /// Write the SARIF document to a file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Display: "json" (default) or "terminal"
    #[arg(long)]
    pub display: Option<String>,

    /// Fail (exit code 1) if results at or above this level are present.
    /// Values: error, warning
    #[arg(long)]
    pub fail_on: Option<String>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Ignore .sarifize.toml config files
    #[arg(long)]
    pub no_config: bool,
}
