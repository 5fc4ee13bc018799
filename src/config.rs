use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CONFIG_FILE: &str = ".sarifize.toml";

/// Sarifize configuration (loaded from .sarifize.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SarifizeConfig {
    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Input format: "plist" or "infer"
    #[serde(default)]
    pub format: Option<String>,

    /// Root that relative paths in reports are resolved against
    #[serde(default)]
    pub project_path: Option<PathBuf>,

    /// Compute content fingerprints for source files
    #[serde(default = "default_hash")]
    pub hash: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            format: None,
            project_path: None,
            hash: default_hash(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default display: "json" or "terminal"
    #[serde(default)]
    pub display: Option<String>,

    /// Single-line JSON
    #[serde(default)]
    pub compact: bool,
}

fn default_hash() -> bool {
    true
}

impl SarifizeConfig {
    /// Try to load .sarifize.toml from the given directory or its parents
    pub fn load(start: &Path) -> Option<Self> {
        let config_path = find_config_file(start)?;
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<SarifizeConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Could not read {}: {}", config_path.display(), e);
                None
            }
        }
    }
}

/// Walk up from the start directory to find .sarifize.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = std::fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# Sarifize configuration

[convert]
# Input format: "plist" (Clang Static Analyzer) or "infer" (Infer report.json)
# format = "plist"

# Root that relative paths in the reports are resolved against
# project_path = "."

# Compute SHA-256 fingerprints of referenced source files
hash = true

[output]
# "json" (default) or "terminal"
# display = "json"

# Emit single-line JSON
compact = false
"#;

/// Create a default .sarifize.toml in the current directory
pub fn init_config() -> Result<()> {
    init_config_in(&std::env::current_dir()?)
}

fn init_config_in(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE);
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE);
    println!("   Edit it to set the project path and input format.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: SarifizeConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.convert.hash);
        assert!(config.convert.format.is_none());
        assert!(!config.output.compact);
    }

    #[test]
    fn test_found_in_parent_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(CONFIG_FILE),
            "[convert]\nformat = \"infer\"\nhash = false\n",
        )
        .unwrap();
        let nested = root.join("build/reports");
        fs::create_dir_all(&nested).unwrap();

        let config = SarifizeConfig::load(&nested).unwrap();
        assert_eq!(config.convert.format.as_deref(), Some("infer"));
        assert!(!config.convert.hash);
        assert!(config.output.display.is_none());
    }

    #[test]
    fn test_unparsable_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[convert\nformat = ").unwrap();
        assert!(SarifizeConfig::load(dir.path()).is_none());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "# mine\n").unwrap();
        init_config_in(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            "# mine\n"
        );

        let fresh = tempdir().unwrap();
        init_config_in(fresh.path()).unwrap();
        assert!(fresh.path().join(CONFIG_FILE).exists());
    }
}
