use anyhow::Result;

use crate::report::sarif::SarifLog;

/// Render the output document as JSON, pretty-printed unless `compact`
pub fn render(log: &SarifLog, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(log)?
    } else {
        serde_json::to_string_pretty(log)?
    };
    Ok(json)
}
