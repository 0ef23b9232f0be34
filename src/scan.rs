use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::progress::{Quiet, ScanProgress};

/// Directory names pruned on every scan: version-control metadata,
/// dependency caches, build caches, virtual environments.
const DEFAULT_EXCLUDE_DIRS: [&str; 6] = [
    ".git",
    "node_modules",
    "target",
    ".next",
    "__pycache__",
    ".venv",
];

/// A record file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSource {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated. Recorded as each
    /// record's provenance.
    pub relative: String,
}

/// Walk the scan root and collect every record file.
///
/// Returns sources in a deterministic order (entries sorted by file name at
/// each level). Directories in the exclusion set are never entered; an
/// unreadable directory is skipped with a warning rather than failing the
/// scan.
pub fn scan_record_files(
    config: &ScanConfig,
    progress: &dyn ScanProgress,
) -> Result<Vec<RecordSource>> {
    if !config.root.exists() {
        bail!("Scan root does not exist: {}", config.root.display());
    }
    let root = config
        .root
        .canonicalize()
        .with_context(|| format!("Failed to resolve scan root {}", config.root.display()))?;

    let exclude_set = build_globset(&config.exclude_globs)
        .with_context(|| "Invalid scan.exclude_globs pattern")?;

    progress.walk_started(&root);

    let mut sources = Vec::new();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        // The root itself is never pruned, even if its name matches.
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_dir(entry, &config.exclude_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: scan skipped an unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str() != Some(config.record_filename.as_str()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if exclude_set.is_match(&relative) {
            continue;
        }

        progress.file_found(&relative, sources.len() + 1);
        sources.push(RecordSource {
            path: entry.path().to_path_buf(),
            relative,
        });
    }

    Ok(sources)
}

/// `mth scan`: list every record file that a consolidation run would load.
///
/// The listing itself is the output, so this runs without a progress
/// reporter.
pub fn run_scan(config: &ScanConfig) -> Result<()> {
    let sources = scan_record_files(config, &Quiet)?;

    println!("scan {}", config.root.display());
    for source in &sources {
        println!("  {}", source.relative);
    }
    println!("  total: {} file(s)", sources.len());
    Ok(())
}

fn is_excluded_dir(entry: &DirEntry, extra: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    DEFAULT_EXCLUDE_DIRS.iter().any(|dir| *dir == name) || extra.iter().any(|dir| dir == &*name)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
