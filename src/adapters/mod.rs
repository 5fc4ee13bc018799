pub mod clang;
pub mod infer;

use tracing::debug;

use crate::engine::run::{Diagnostic, Run};
use crate::error::{ConvertError, Result};

/// Supported input formats. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// Clang Static Analyzer `.plist` output
    Plist,
    /// Infer `report.json`
    Infer,
}

impl InputFormat {
    pub const ALL: [InputFormat; 2] = [InputFormat::Plist, InputFormat::Infer];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "plist" => Ok(InputFormat::Plist),
            "infer" => Ok(InputFormat::Infer),
            _ => Err(ConvertError::UnknownFormat(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Plist => "plist",
            InputFormat::Infer => "infer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InputFormat::Plist => "Clang Static Analyzer plist (path events with call depth)",
            InputFormat::Infer => "Infer report.json (bug traces with procedure tags)",
        }
    }

    /// Parse one report. `label` names the report in error messages.
    pub fn load(&self, label: &str, bytes: &[u8]) -> Result<Report> {
        let report = match self {
            InputFormat::Plist => Report::Plist(clang::PlistReport::parse(label, bytes)?),
            InputFormat::Infer => Report::Infer(infer::InferReport::parse(label, bytes)?),
        };
        debug!(
            "Loaded {} report {} ({} diagnostics)",
            self.name(),
            label,
            report.adapter().diagnostic_count()
        );
        Ok(report)
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What every input format provides to the run.
pub trait Adapter {
    /// Report label used in error messages
    fn label(&self) -> &str;

    fn tool_name(&self) -> &str;

    fn diagnostic_count(&self) -> usize;

    /// Reject structurally broken reports before anything touches the run.
    fn validate(&self) -> Result<()>;

    /// Diagnostics in report order, each carrying its own trace.
    fn diagnostics(&self) -> Vec<Diagnostic<'_>>;

    /// Paths the report lists on its own, outside any diagnostic.
    fn listed_files(&self) -> &[String] {
        &[]
    }
}

/// A parsed report of one of the supported formats.
#[derive(Debug, Clone)]
pub enum Report {
    Plist(clang::PlistReport),
    Infer(infer::InferReport),
}

impl Report {
    pub fn adapter(&self) -> &dyn Adapter {
        match self {
            Report::Plist(report) => report,
            Report::Infer(report) => report,
        }
    }

    /// Feed this report into `run`. Either every diagnostic is added or,
    /// when the report is malformed, none is.
    pub fn convert_into(&self, run: &mut Run) -> Result<()> {
        let adapter = self.adapter();
        adapter.validate()?;

        run.set_tool_name(adapter.tool_name());
        for diagnostic in adapter.diagnostics() {
            run.add_diagnostic(diagnostic);
        }
        for path in adapter.listed_files() {
            run.files_mut().resolve(path);
        }

        debug!(
            "Converted {}: {} diagnostics",
            adapter.label(),
            adapter.diagnostic_count()
        );
        Ok(())
    }
}
