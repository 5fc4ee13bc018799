use tracing::debug;

use crate::model::{Finding, PhysicalLocation, Severity, SourcePosition, SourceRegion};
use crate::registry::{FileRegistry, RuleCatalog};
use crate::report::sarif::{RunLog, SarifLog};
use crate::trace::TraceSource;

/// Tool name used when no report supplied one.
const UNKNOWN_TOOL: &str = "unknown";

/// One analyzer diagnostic, as handed over by an adapter.
pub struct Diagnostic<'a> {
    pub rule_id: &'a str,
    pub rule_name: &'a str,
    pub message: &'a str,
    pub severity: Severity,
    pub path: &'a str,
    pub position: SourcePosition,
    pub trace: Box<dyn TraceSource + 'a>,
}

/// Accumulated state of one conversion: rules, files, and results from
/// every report fed in so far.
///
/// [`Run::finalize`] consumes the run, so nothing can be added once the
/// output document exists.
#[derive(Debug)]
pub struct Run {
    tool_name: Option<String>,
    rules: RuleCatalog,
    files: FileRegistry,
    results: Vec<Finding>,
}

impl Run {
    pub fn new(files: FileRegistry) -> Self {
        Run {
            tool_name: None,
            rules: RuleCatalog::default(),
            files,
            results: Vec::new(),
        }
    }

    /// The first report's tool name sticks for the whole run.
    pub fn set_tool_name(&mut self, name: &str) {
        if self.tool_name.is_none() {
            self.tool_name = Some(name.to_string());
        }
    }

    /// Build one finding and append it.
    ///
    /// The rule is registered first (first display name wins), then the
    /// primary file, then every file the trace visits.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic<'_>) {
        self.rules
            .register(diagnostic.rule_id, diagnostic.rule_name);

        let primary_location = PhysicalLocation {
            uri: self.files.resolve(diagnostic.path),
            region: SourceRegion::point(diagnostic.position),
        };
        let code_flow = diagnostic.trace.normalize(&mut self.files);

        debug!(
            "{} at {}:{} ({} steps)",
            diagnostic.rule_id,
            primary_location.uri,
            primary_location.region.start.line,
            code_flow.len()
        );

        self.results.push(Finding {
            rule_id: diagnostic.rule_id.to_string(),
            message: diagnostic.message.to_string(),
            severity: diagnostic.severity,
            primary_location,
            code_flow,
        });
    }

    pub fn files_mut(&mut self) -> &mut FileRegistry {
        &mut self.files
    }

    pub fn files(&self) -> &FileRegistry {
        &self.files
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    pub fn results(&self) -> &[Finding] {
        &self.results
    }

    /// First location URI that is missing from the file registry, if any.
    fn unregistered_uri(&self) -> Option<&str> {
        self.results
            .iter()
            .flat_map(|finding| {
                std::iter::once(&finding.primary_location)
                    .chain(finding.code_flow.steps.iter().map(|step| &step.location))
            })
            .map(|location| location.uri.as_str())
            .find(|uri| !self.files.contains(uri))
    }

    /// Close the run and project it into the output document.
    pub fn finalize(self) -> SarifLog {
        debug_assert!(
            self.unregistered_uri().is_none(),
            "result refers to unregistered file {:?}",
            self.unregistered_uri()
        );
        SarifLog::single(RunLog::new(
            self.tool_name.unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            self.rules,
            self.files,
            self.results,
        ))
    }
}
