use std::collections::HashMap;
use std::io::{self, Write};

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::model::{Finding, PhysicalLocation, Severity, StepKind};
use crate::report::sarif::{RunLog, SarifLog};

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Render the converted run(s) with colors unless `NO_COLOR` is set
pub fn render(log: &SarifLog, out: &mut dyn Write) -> io::Result<()> {
    let color = use_colors();
    for run in &log.runs {
        render_run(run, color, out)?;
    }
    Ok(())
}

fn render_run(run: &RunLog, color: bool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    let header = format!(
        "{} — {} results, {} rules, {} files",
        run.tool.driver.name,
        run.results.len(),
        run.resources.rules.len(),
        run.files.len()
    );
    if color {
        writeln!(out, "  {}", header.bold())?;
    } else {
        writeln!(out, "  {}", header)?;
    }
    writeln!(out)?;

    if run.results.is_empty() {
        writeln!(out, "  No results in the converted reports.")?;
        writeln!(out)?;
        return Ok(());
    }

    for finding in &run.results {
        render_finding(finding, color, out)?;
    }

    writeln!(out, "{}", "━".repeat(60))?;
    writeln!(out, "{}", rule_table(run))?;

    let errors = run
        .results
        .iter()
        .filter(|r| r.severity == Severity::Error)
        .count();
    let warnings = run.results.len() - errors;
    let summary = format!(" {} errors, {} warnings", errors, warnings);
    if color {
        writeln!(out, "{}", summary.bold())?;
    } else {
        writeln!(out, "{}", summary)?;
    }
    writeln!(out, "{}", "━".repeat(60))?;
    writeln!(out)
}

fn render_finding(finding: &Finding, color: bool, out: &mut dyn Write) -> io::Result<()> {
    let badge = format!(" {} ", finding.severity.as_str().to_uppercase());
    let badge = match (color, finding.severity) {
        (false, _) => badge,
        (true, Severity::Error) => badge.on_red().white().bold().to_string(),
        (true, Severity::Warning) => badge.on_yellow().black().bold().to_string(),
    };
    let place = display_location(&finding.primary_location);

    if color {
        writeln!(out, "  {}  {}  {}", badge, place.dimmed(), finding.rule_id.bold())?;
    } else {
        writeln!(out, "  {}  {}  {}", badge, place, finding.rule_id)?;
    }
    writeln!(out, "           {}", finding.message)?;
    if finding.code_flow.is_empty() {
        return writeln!(out);
    }

    for step in &finding.code_flow.steps {
        let marker = kind_marker(step.kind);
        let line = format!(
            "{:>4}. {:<8} {}  {}",
            step.index,
            marker,
            display_location(&step.location),
            step.message
        );
        if color {
            writeln!(out, "         {}", line.dimmed())?;
        } else {
            writeln!(out, "         {}", line)?;
        }
    }
    writeln!(out)
}

fn kind_marker(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Plain => "",
        StepKind::Call => "call →",
        StepKind::CallReturn => "← return",
        StepKind::FunctionEnter => "enter",
        StepKind::FunctionExit => "exit",
        StepKind::Branch => "branch",
    }
}

fn display_location(location: &PhysicalLocation) -> String {
    let path = location
        .uri
        .strip_prefix("file://")
        .unwrap_or(&location.uri);
    format!(
        "{}:{}:{}",
        path, location.region.start.line, location.region.start.column
    )
}

/// Result counts per rule, in catalog order
fn rule_table(run: &RunLog) -> Table {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for finding in &run.results {
        let entry = counts.entry(finding.rule_id.as_str()).or_default();
        match finding.severity {
            Severity::Error => entry.0 += 1,
            Severity::Warning => entry.1 += 1,
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rule", "Name", "Errors", "Warnings"]);

    for rule in run.resources.rules.iter() {
        let (errors, warnings) = counts.get(rule.id.as_str()).copied().unwrap_or_default();
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(&rule.display_name),
            Cell::new(errors).set_alignment(CellAlignment::Right),
            Cell::new(warnings).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeFlow, SourcePosition, SourceRegion};
    use crate::registry::{FileRegistry, RuleCatalog};

    fn finding(rule: &str, severity: Severity) -> Finding {
        Finding {
            rule_id: rule.into(),
            message: "m".into(),
            severity,
            primary_location: PhysicalLocation {
                uri: "file:///src/a.c".into(),
                region: SourceRegion::point(SourcePosition::new(3, 9)),
            },
            code_flow: CodeFlow::default(),
        }
    }

    #[test]
    fn test_render_lists_findings() {
        let log = SarifLog::single(RunLog::new(
            "Infer".into(),
            RuleCatalog::default(),
            FileRegistry::new("/", None),
            vec![finding("LEAK", Severity::Error)],
        ));
        let mut out = Vec::new();
        render(&log, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("LEAK"));
        assert!(text.contains("/src/a.c:3:9"));
    }

    #[test]
    fn test_display_location() {
        let f = finding("R", Severity::Warning);
        assert_eq!(display_location(&f.primary_location), "/src/a.c:3:9");
    }

    #[test]
    fn test_rule_table_counts() {
        let mut rules = RuleCatalog::default();
        rules.register("LEAK", "Resource Leak");
        rules.register("NPE", "Null Dereference");
        let run = RunLog::new(
            "Infer".into(),
            rules,
            FileRegistry::new("/", None),
            vec![
                finding("LEAK", Severity::Error),
                finding("LEAK", Severity::Warning),
                finding("LEAK", Severity::Warning),
            ],
        );
        let rendered = rule_table(&run).to_string();
        assert!(rendered.contains("Resource Leak"));
        assert!(rendered.contains("Null Dereference"));
        assert_eq!(rule_table(&run).row_iter().count(), 2);
    }
}
