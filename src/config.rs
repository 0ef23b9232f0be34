use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed artifact names under the library directory. Each consolidation run
/// rewrites all three in full; there is no merge with a previous run.
const CONSOLIDATED_CSV: &str = "methods-consolidated.csv";
const CONSOLIDATED_JSON: &str = "methods-consolidated.json";
const INDEX_JSON: &str = "methods-index.json";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Root of the tree to scan for record files.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Exact file name that marks a record file.
    #[serde(default = "default_record_filename")]
    pub record_filename: String,
    /// Directory names to prune in addition to the built-in noise set.
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    /// Root-relative glob patterns for files to skip.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            record_filename: default_record_filename(),
            exclude_dirs: Vec::new(),
            exclude_globs: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    /// Where the consolidated artifacts live. Fixed per deployment.
    #[serde(default = "default_library_dir")]
    pub dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dir: default_library_dir(),
        }
    }
}

impl LibraryConfig {
    pub fn consolidated_csv(&self) -> PathBuf {
        self.dir.join(CONSOLIDATED_CSV)
    }

    pub fn consolidated_json(&self) -> PathBuf {
        self.dir.join(CONSOLIDATED_JSON)
    }

    pub fn index_json(&self) -> PathBuf {
        self.dir.join(INDEX_JSON)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_record_filename() -> String {
    "methods.csv".to_string()
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("./library")
}

/// Load configuration from a TOML file.
///
/// A missing file yields the built-in defaults so the tool works out of the
/// box; a file that exists but cannot be read or parsed is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.scan.record_filename.is_empty() {
        anyhow::bail!("scan.record_filename must not be empty");
    }

    // The scanner matches file names, never paths.
    if config.scan.record_filename.contains('/') || config.scan.record_filename.contains('\\') {
        anyhow::bail!(
            "scan.record_filename must be a bare file name, got '{}'",
            config.scan.record_filename
        );
    }

    Ok(config)
}
