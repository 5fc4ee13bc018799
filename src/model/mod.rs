pub mod location;

use serde::{Deserialize, Serialize};

pub use location::{SourcePosition, SourceRegion};

/// Result level in the canonical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Map an analyzer's bug kind onto the two output levels.
    ///
    /// Only the exact string "ERROR" is an error; every other kind,
    /// including "WARNING", "INFO" and anything unknown, is a warning.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "ERROR" => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Parse a user-supplied threshold (e.g. `--fail-on`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural role of a step within a code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    #[default]
    Plain,
    Call,
    CallReturn,
    FunctionEnter,
    FunctionExit,
    Branch,
}

impl StepKind {
    pub fn is_plain(&self) -> bool {
        matches!(self, StepKind::Plain)
    }
}

/// A file reference (canonical URI, registered in the run's file registry)
/// plus the region inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalLocation {
    pub uri: String,
    pub region: SourceRegion,
}

/// One step of a code flow. `index` starts at 1 and has no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    pub index: usize,
    pub location: PhysicalLocation,
    pub message: String,
    pub kind: StepKind,
}

/// A single linear thread of steps describing how control reached a defect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFlow {
    pub steps: Vec<FlowStep>,
}

impl CodeFlow {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One normalized diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Key into the run's rule catalog
    pub rule_id: String,

    /// Analyzer message
    pub message: String,

    pub severity: Severity,

    /// Where the analyzer anchored the defect
    pub primary_location: PhysicalLocation,

    pub code_flow: CodeFlow,
}
