pub mod run;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::adapters::{InputFormat, Report};
use crate::cli::ConvertArgs;
use crate::config::SarifizeConfig;
use crate::error::ConvertError;
use crate::registry::files::{sha256_fingerprint, HashFn};
use crate::registry::FileRegistry;
use crate::report::sarif::SarifLog;

use run::Run;

/// The conversion engine. Loads reports, feeds them into one run, and
/// produces the output document.
pub struct Converter {
    /// Input format shared by every report of this invocation
    format: InputFormat,
    /// Canonical root that relative analyzer paths are joined against
    project_root: PathBuf,
    /// Whether file fingerprints are computed
    hash: bool,
    /// Reports, in the order their results appear in the output
    inputs: Vec<PathBuf>,
}

impl Converter {
    pub fn new(args: &ConvertArgs, config: Option<&SarifizeConfig>) -> Result<Self> {
        let convert = config.map(|c| &c.convert);

        let format_name = args
            .format
            .clone()
            .or_else(|| convert.and_then(|c| c.format.clone()))
            .ok_or_else(|| anyhow::anyhow!("No input format given. Use --format plist|infer"))?;
        let format = InputFormat::from_name(&format_name)?;

        let project_path = args
            .project_path
            .clone()
            .or_else(|| convert.and_then(|c| c.project_path.clone()))
            .unwrap_or_else(|| PathBuf::from("."));
        let project_root = canonical_root(&project_path)?;

        let hash = !args.no_hash && convert.map_or(true, |c| c.hash);

        info!(
            "Converting {} {} report(s) against {}",
            args.inputs.len(),
            format,
            project_root.display()
        );

        Ok(Converter::with_settings(
            format,
            project_root,
            hash,
            args.inputs.clone(),
        ))
    }

    /// Build a converter directly, bypassing CLI arguments
    pub fn with_settings(
        format: InputFormat,
        project_root: PathBuf,
        hash: bool,
        inputs: Vec<PathBuf>,
    ) -> Self {
        Converter {
            format,
            project_root,
            hash,
            inputs,
        }
    }

    /// Run the full conversion pipeline
    pub fn run(&self) -> Result<SarifLog> {
        let start = Instant::now();

        // Step 1: Read and parse every report (parallel, order preserved)
        let reports = self
            .inputs
            .par_iter()
            .map(|path| self.load(path))
            .collect::<std::result::Result<Vec<_>, ConvertError>>()?;

        // Step 2: Feed reports into one run, in input order
        let hasher: Option<HashFn> = self.hash.then_some(sha256_fingerprint as HashFn);
        let mut run = Run::new(FileRegistry::new(&self.project_root, hasher));
        for report in &reports {
            report.convert_into(&mut run)?;
        }

        info!(
            "Converted {} results ({} rules, {} files) in {:.2}s",
            run.results().len(),
            run.rules().len(),
            run.files().len(),
            start.elapsed().as_secs_f64()
        );

        // Step 3: Close the run
        Ok(run.finalize())
    }

    fn load(&self, path: &Path) -> std::result::Result<Report, ConvertError> {
        let bytes = std::fs::read(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        self.format.load(&path.display().to_string(), &bytes)
    }
}

fn canonical_root(path: &Path) -> std::result::Result<PathBuf, ConvertError> {
    std::fs::canonicalize(path).map_err(|source| ConvertError::ProjectRoot {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::json;
    use std::fs;
    use tempfile::tempdir;

    const PLIST: &str = include_str!("../../tests/fixtures/null_deref.plist");
    const INFER: &str = include_str!("../../tests/fixtures/infer_report.json");

    fn project() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.c"), "int *p = 0;\nint main(void) { return *p; }\n").unwrap();
        // src/util.c and include/unused.h are intentionally absent
        (dir, root)
    }

    #[test]
    fn test_two_reports_share_one_run() {
        let (_dir, root) = project();
        let first = root.join("first.plist");
        let second = root.join("second.plist");
        fs::write(&first, PLIST).unwrap();
        fs::write(&second, PLIST).unwrap();

        let converter =
            Converter::with_settings(InputFormat::Plist, root.clone(), true, vec![first, second]);
        let log = converter.run().unwrap();
        let run = &log.runs[0];

        assert_eq!(log.runs.len(), 1);
        assert_eq!(run.results.len(), 2);
        assert_eq!(run.resources.rules.len(), 1);
        assert_eq!(run.files.len(), 3);

        let main_uri = crate::registry::uri::to_file_uri(&root.join("src/main.c"));
        let main = run.files.get(&main_uri).unwrap();
        assert!(main.fingerprint.is_some());

        // Missing files still resolve, without a fingerprint
        let util = run.files.iter().find(|f| f.uri.ends_with("util.c")).unwrap();
        assert!(util.fingerprint.is_none());
    }

    #[test]
    fn test_every_reference_is_in_the_file_table() {
        let (_dir, root) = project();
        let report = root.join("report.json");
        fs::write(&report, INFER).unwrap();

        let log = Converter::with_settings(InputFormat::Infer, root, false, vec![report])
            .run()
            .unwrap();
        let run = &log.runs[0];
        for result in &run.results {
            assert!(run.files.contains(&result.primary_location.uri));
            for (i, step) in result.code_flow.steps.iter().enumerate() {
                assert!(run.files.contains(&step.location.uri));
                assert_eq!(step.index, i + 1);
            }
        }
        assert!(run.files.contains("file:///opt/vendor/list.c"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let (_dir, root) = project();
        let report = root.join("report.plist");
        fs::write(&report, PLIST).unwrap();

        let render = || {
            let log = Converter::with_settings(
                InputFormat::Plist,
                root.clone(),
                true,
                vec![report.clone()],
            )
            .run()
            .unwrap();
            json::render(&log, false).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_malformed_report_aborts_the_invocation() {
        let (_dir, root) = project();
        let good = root.join("good.json");
        let bad = root.join("bad.json");
        fs::write(&good, INFER).unwrap();
        fs::write(&bad, r#"[{"bug_type": "X"}]"#).unwrap();

        let err = Converter::with_settings(InputFormat::Infer, root, false, vec![good, bad])
            .run()
            .unwrap_err();
        let err = err.downcast::<ConvertError>().unwrap();
        assert!(matches!(err, ConvertError::Json { .. }));
    }

    #[test]
    fn test_missing_input_file() {
        let (_dir, root) = project();
        let missing = root.join("nope.plist");
        let err = Converter::with_settings(InputFormat::Plist, root, false, vec![missing])
            .run()
            .unwrap_err();
        assert!(matches!(
            err.downcast::<ConvertError>().unwrap(),
            ConvertError::Io { .. }
        ));
    }

    #[test]
    fn test_results_keep_report_order() {
        let (_dir, root) = project();
        let infer = root.join("b.json");
        fs::write(&infer, INFER).unwrap();

        let log = Converter::with_settings(
            InputFormat::Infer,
            root,
            false,
            vec![infer.clone(), infer],
        )
        .run()
        .unwrap();
        let rules: Vec<_> = log.runs[0].results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "NULL_DEREFERENCE",
                "RESOURCE_LEAK",
                "NULL_DEREFERENCE",
                "NULL_DEREFERENCE",
                "RESOURCE_LEAK",
                "NULL_DEREFERENCE",
            ]
        );
    }
}
