use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::model::location::RegionView;
use crate::model::{Finding, FlowStep, PhysicalLocation, Severity, StepKind};
use crate::registry::{
    FileRecord, FileRegistry, Fingerprint, KeyedRecords, RuleCatalog, RuleRecord,
};

pub const SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";
pub const SARIF_VERSION: &str = "2.0.0";

/// The complete conversion output.
///
/// Shape follows SARIF 2.0.0: one run holding a tool name, the rule catalog,
/// results with a single code flow each, and a file table keyed by URI.
#[derive(Debug, Serialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: &'static str,

    pub version: &'static str,

    pub runs: Vec<RunLog>,
}

impl SarifLog {
    pub fn single(run: RunLog) -> Self {
        SarifLog {
            schema: SCHEMA_URI,
            version: SARIF_VERSION,
            runs: vec![run],
        }
    }

    /// Check if any result is at or above a level threshold
    pub fn has_results_at_or_above(&self, threshold: Severity) -> bool {
        self.runs
            .iter()
            .flat_map(|run| &run.results)
            .any(|r| r.severity >= threshold)
    }
}

#[derive(Debug, Serialize)]
pub struct RunLog {
    pub tool: Tool,

    /// In the order diagnostics were met across all reports
    pub results: Vec<Finding>,

    pub resources: Resources,

    pub files: KeyedRecords<FileRecord>,
}

impl RunLog {
    pub fn new(
        tool_name: String,
        rules: RuleCatalog,
        files: FileRegistry,
        results: Vec<Finding>,
    ) -> Self {
        RunLog {
            tool: Tool {
                driver: Driver { name: tool_name },
            },
            results,
            resources: Resources {
                rules: rules.into_records(),
            },
            files: files.into_records(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub driver: Driver,
}

#[derive(Debug, Serialize)]
pub struct Driver {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct Resources {
    pub rules: KeyedRecords<RuleRecord>,
}

#[derive(Serialize)]
struct Text<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct FileLocation<'a> {
    uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocationView<'a> {
    file_location: FileLocation<'a>,
    region: RegionView<'a>,
}

impl PhysicalLocation {
    fn view<'a>(&'a self, message: Option<&'a str>) -> PhysicalLocationView<'a> {
        PhysicalLocationView {
            file_location: FileLocation { uri: &self.uri },
            region: self.region.with_message(message),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationView<'a> {
    physical_location: PhysicalLocationView<'a>,
}

#[derive(Serialize)]
struct ThreadFlowView<'a> {
    locations: &'a [FlowStep],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeFlowView<'a> {
    thread_flows: [ThreadFlowView<'a>; 1],
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Result", 5)?;
        state.serialize_field("message", &Text { text: &self.message })?;
        state.serialize_field("level", &self.severity)?;
        state.serialize_field("ruleId", &self.rule_id)?;
        state.serialize_field(
            "codeFlows",
            &[CodeFlowView {
                thread_flows: [ThreadFlowView {
                    locations: &self.code_flow.steps,
                }],
            }],
        )?;
        state.serialize_field(
            "locations",
            &[LocationView {
                physical_location: self.primary_location.view(None),
            }],
        )?;
        state.end()
    }
}

/// A step's message rides on its region so viewers show it inline.
impl Serialize for FlowStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct StepView<'a> {
            step: usize,
            #[serde(skip_serializing_if = "StepKind::is_plain")]
            kind: StepKind,
            location: LocationView<'a>,
        }

        StepView {
            step: self.index,
            kind: self.kind,
            location: LocationView {
                physical_location: self.location.view(Some(self.message.as_str())),
            },
        }
        .serialize(serializer)
    }
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct FileView<'a> {
            file_location: FileLocation<'a>,
            #[serde(skip_serializing_if = "Option::is_none")]
            mime_type: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            hashes: Option<[&'a Fingerprint; 1]>,
        }

        FileView {
            file_location: FileLocation { uri: &self.uri },
            mime_type: self.mime_type,
            hashes: self.fingerprint.as_ref().map(|fp| [fp]),
        }
        .serialize(serializer)
    }
}

impl Serialize for RuleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct RuleView<'a> {
            id: &'a str,
            name: Text<'a>,
        }

        RuleView {
            id: &self.id,
            name: Text {
                text: &self.display_name,
            },
        }
        .serialize(serializer)
    }
}
