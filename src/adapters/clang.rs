use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::debug;

use super::Adapter;
use crate::engine::run::Diagnostic;
use crate::error::{ConvertError, Result};
use crate::model::{CodeFlow, Severity, SourcePosition};
use crate::registry::FileRegistry;
use crate::trace::depth::{normalize_by_depth, PathEntry};
use crate::trace::{TraceItem, TraceSource};

const DEFAULT_TOOL_NAME: &str = "clang static analyzer";

/// A Clang Static Analyzer plist report.
#[derive(Debug, Clone, Deserialize)]
pub struct PlistReport {
    #[serde(skip)]
    label: String,

    #[serde(default)]
    pub clang_version: Option<String>,

    /// File table; locations refer to it by index
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub diagnostics: Vec<PlistDiagnostic>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlistDiagnostic {
    pub check_name: String,
    pub description: String,
    pub location: PlistLocation,
    #[serde(default)]
    pub path: Vec<PathStep>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlistLocation {
    pub line: i64,
    pub col: i64,
    pub file: usize,
}

/// One entry of a diagnostic's path: either a control edge or an event.
#[derive(Debug, Clone, Deserialize)]
pub struct PathStep {
    #[serde(default)]
    pub edges: Option<IgnoredAny>,
    #[serde(default)]
    pub location: Option<PlistLocation>,
    #[serde(default)]
    pub ranges: Option<Vec<Vec<PlistLocation>>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub depth: Option<i64>,
}

impl PathStep {
    /// Event location, or `None` for edge markers.
    fn event_location(&self) -> Option<PlistLocation> {
        if self.edges.is_some() {
            return None;
        }
        self.location
    }
}

impl PlistReport {
    pub fn parse(label: &str, bytes: &[u8]) -> Result<Self> {
        let mut report: PlistReport =
            ::plist::from_bytes(bytes).map_err(|source| ConvertError::Plist {
                report: label.to_string(),
                source,
            })?;
        report.label = label.to_string();
        Ok(report)
    }

    fn file(&self, location: PlistLocation) -> &str {
        self.files
            .get(location.file)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn check_index(&self, location: PlistLocation, context: &str) -> Result<()> {
        if location.file < self.files.len() {
            return Ok(());
        }
        Err(ConvertError::MalformedReport {
            report: self.label.clone(),
            reason: format!(
                "{} refers to file #{} but the report lists {} files",
                context,
                location.file,
                self.files.len()
            ),
        })
    }
}

impl Adapter for PlistReport {
    fn label(&self) -> &str {
        &self.label
    }

    fn tool_name(&self) -> &str {
        self.clang_version.as_deref().unwrap_or(DEFAULT_TOOL_NAME)
    }

    fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }

    fn validate(&self) -> Result<()> {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            let context = format!("diagnostic #{} ({})", i, diagnostic.check_name);
            self.check_index(diagnostic.location, &context)?;
            for step in &diagnostic.path {
                if let Some(location) = step.event_location() {
                    self.check_index(location, &context)?;
                }
            }
        }
        Ok(())
    }

    fn diagnostics(&self) -> Vec<Diagnostic<'_>> {
        self.diagnostics
            .iter()
            .map(|diagnostic| Diagnostic {
                rule_id: &diagnostic.check_name,
                rule_name: &diagnostic.check_name,
                message: &diagnostic.description,
                // The plist carries no kind, which lands in the warning bucket
                severity: Severity::Warning,
                path: self.file(diagnostic.location),
                position: SourcePosition::new(diagnostic.location.line, diagnostic.location.col),
                trace: Box::new(PlistTrace {
                    steps: &diagnostic.path,
                    report: self,
                }),
            })
            .collect()
    }

    fn listed_files(&self) -> &[String] {
        &self.files
    }
}

/// A diagnostic's path together with the file table it indexes into.
struct PlistTrace<'a> {
    steps: &'a [PathStep],
    report: &'a PlistReport,
}

impl PlistTrace<'_> {
    fn entry<'s>(&'s self, step: &'s PathStep) -> PathEntry<'s> {
        let Some(location) = step.event_location() else {
            return PathEntry::Edge;
        };
        PathEntry::Event {
            item: TraceItem {
                path: self.report.file(location),
                position: SourcePosition::new(location.line, location.col),
                ranges: step.ranges.as_deref().map(to_pairs).unwrap_or_default(),
                message: step.message.as_deref().unwrap_or_default(),
            },
            depth: step.depth.unwrap_or(0),
        }
    }
}

impl TraceSource for PlistTrace<'_> {
    fn normalize(&self, files: &mut FileRegistry) -> CodeFlow {
        normalize_by_depth(self.steps.iter().map(|step| self.entry(step)), files)
    }
}

/// Keep well-formed `[start, end]` ranges; anything shorter is dropped.
fn to_pairs(ranges: &[Vec<PlistLocation>]) -> Vec<(SourcePosition, SourcePosition)> {
    ranges
        .iter()
        .filter_map(|range| match range.as_slice() {
            [start, end, ..] => Some((
                SourcePosition::new(start.line, start.col),
                SourcePosition::new(end.line, end.col),
            )),
            _ => {
                debug!("Dropping range with {} bounds", range.len());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Report;
    use crate::engine::run::Run;
    use crate::model::StepKind;

    const SAMPLE: &str = include_str!("../../tests/fixtures/null_deref.plist");

    fn load(text: &str) -> Result<PlistReport> {
        PlistReport::parse("sample.plist", text.as_bytes())
    }

    #[test]
    fn test_parse_sample() {
        let report = load(SAMPLE).unwrap();
        assert_eq!(report.tool_name(), "clang version 17.0.6");
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.diagnostics[0].path.len(), 4);
        assert!(report.diagnostics[0].path[1].event_location().is_none());
        report.validate().unwrap();
    }

    #[test]
    fn test_convert_sample_into_run() {
        let report = Report::Plist(load(SAMPLE).unwrap());
        let mut run = Run::new(FileRegistry::new("/nonexistent-root", None));
        report.convert_into(&mut run).unwrap();

        let finding = &run.results()[0];
        assert_eq!(finding.rule_id, "core.NullDereference");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.primary_location.uri, "file:///src/main.c");

        let steps = &finding.code_flow.steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].kind, StepKind::Call);
        assert_eq!(steps[0].message, "Calling 'lookup'");
        assert_eq!(steps[0].location.region.end, Some(SourcePosition::new(10, 12)));
        assert_eq!(steps[1].kind, StepKind::Plain);
        assert_eq!(steps[1].location.uri, "file:///src/util.c");
        assert_eq!(steps[1].location.region.end, None);
        assert_eq!(steps[2].kind, StepKind::CallReturn);
        assert_eq!(steps[2].index, 3);

        // Listed but never referenced files are still registered
        assert!(run.files().contains("file:///include/unused.h"));
        assert_eq!(run.files().len(), 3);
    }

    #[test]
    fn test_out_of_range_file_index_is_rejected_before_conversion() {
        let broken = SAMPLE.replace(
            "<key>line</key><integer>4</integer><key>col</key><integer>5</integer><key>file</key><integer>1</integer>",
            "<key>line</key><integer>4</integer><key>col</key><integer>5</integer><key>file</key><integer>7</integer>",
        );
        let report = Report::Plist(load(&broken).unwrap());
        let mut run = Run::new(FileRegistry::new("/nonexistent-root", None));

        let err = report.convert_into(&mut run).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedReport { .. }));
        assert!(run.results().is_empty());
        assert!(run.files().is_empty());
        assert!(run.rules().is_empty());
    }

    #[test]
    fn test_missing_required_field_is_a_parse_error() {
        let broken = SAMPLE.replace("<key>check_name</key><string>core.NullDereference</string>", "");
        assert!(matches!(load(&broken), Err(ConvertError::Plist { .. })));
    }

    #[test]
    fn test_short_ranges_are_dropped() {
        let loc = PlistLocation { line: 2, col: 3, file: 0 };
        let pairs = to_pairs(&[vec![loc], vec![loc, PlistLocation { line: 2, col: 9, file: 0 }]]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, SourcePosition::new(2, 9));
    }
}
