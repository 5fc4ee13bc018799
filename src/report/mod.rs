pub mod json;
pub mod sarif;
pub mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use sarif::SarifLog;

/// Write the document and, for the "terminal" display, the summary.
///
/// The document always goes to `out_file` when given, else to `stdout`.
/// The terminal summary takes stdout only when the document went to a file;
/// otherwise it goes to `stderr` so stdout stays a clean document.
pub fn emit(
    log: &SarifLog,
    display: &str,
    compact: bool,
    out_file: Option<&Path>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let document = json::render(log, compact)?;

    match out_file {
        Some(path) => {
            std::fs::write(path, &document)?;
            info!("SARIF written to {}", path.display());
            if display == "terminal" {
                terminal::render(log, stdout)?;
            }
        }
        None => {
            if display == "terminal" {
                terminal::render(log, stderr)?;
            }
            writeln!(stdout, "{}", document)?;
        }
    }
    Ok(())
}
