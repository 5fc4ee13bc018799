use serde::Deserialize;

use super::Adapter;
use crate::engine::run::Diagnostic;
use crate::error::{ConvertError, Result};
use crate::model::{CodeFlow, Severity, SourcePosition};
use crate::registry::FileRegistry;
use crate::trace::tags::{normalize_by_tags, NodeKind};
use crate::trace::{TraceItem, TraceSource};

const TOOL_NAME: &str = "Infer";

/// Infer reports -1 when it has no column.
fn unknown_column() -> i64 {
    -1
}

/// An Infer `report.json`: a flat list of bugs.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct InferReport {
    #[serde(skip)]
    label: String,

    pub bugs: Vec<InferBug>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferBug {
    pub bug_type: String,
    #[serde(default)]
    pub bug_type_hum: Option<String>,
    pub qualifier: String,
    /// "ERROR", "WARNING", "INFO", "ADVICE", ...
    pub kind: String,
    pub file: String,
    pub line: i64,
    #[serde(default = "unknown_column")]
    pub column: i64,
    #[serde(default)]
    pub bug_trace: Vec<InferTraceItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferTraceItem {
    pub filename: String,
    pub line_number: i64,
    #[serde(default = "unknown_column")]
    pub column_number: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub node_tags: Vec<NodeTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeTag {
    pub tag: String,
    pub value: String,
}

impl InferTraceItem {
    fn node_kinds(&self) -> Vec<NodeKind> {
        self.node_tags
            .iter()
            .filter_map(|t| NodeKind::from_tag(&t.tag, &t.value))
            .collect()
    }

    fn trace_item(&self) -> TraceItem<'_> {
        TraceItem {
            path: &self.filename,
            position: SourcePosition::new(self.line_number, self.column_number),
            ranges: Vec::new(),
            message: &self.description,
        }
    }
}

impl InferReport {
    pub fn parse(label: &str, bytes: &[u8]) -> Result<Self> {
        let mut report: InferReport =
            serde_json::from_slice(bytes).map_err(|source| ConvertError::Json {
                report: label.to_string(),
                source,
            })?;
        report.label = label.to_string();
        Ok(report)
    }
}

impl Adapter for InferReport {
    fn label(&self) -> &str {
        &self.label
    }

    fn tool_name(&self) -> &str {
        TOOL_NAME
    }

    fn diagnostic_count(&self) -> usize {
        self.bugs.len()
    }

    /// serde already enforces the structure Infer reports need.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn diagnostics(&self) -> Vec<Diagnostic<'_>> {
        self.bugs
            .iter()
            .map(|bug| Diagnostic {
                rule_id: &bug.bug_type,
                rule_name: bug.bug_type_hum.as_deref().unwrap_or(&bug.bug_type),
                message: &bug.qualifier,
                severity: Severity::from_kind(&bug.kind),
                path: &bug.file,
                position: SourcePosition::new(bug.line, bug.column),
                trace: Box::new(BugTrace(&bug.bug_trace)),
            })
            .collect()
    }
}

struct BugTrace<'a>(&'a [InferTraceItem]);

impl TraceSource for BugTrace<'_> {
    fn normalize(&self, files: &mut FileRegistry) -> CodeFlow {
        normalize_by_tags(
            self.0.iter().map(|item| (item.trace_item(), item.node_kinds())),
            files,
        )
    }
}
