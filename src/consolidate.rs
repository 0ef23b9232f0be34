//! Consolidation pipeline orchestration.
//!
//! Coordinates the full run: scan, load, dedup, persist, index. Each stage
//! takes the previous stage's output and returns a new collection; nothing
//! accumulates in shared mutable state. Per-file load failures degrade the
//! result (that file contributes nothing) but never abort the run.

use anyhow::Result;
use std::collections::HashMap;

use crate::config::Config;
use crate::index::MethodIndex;
use crate::loader;
use crate::models::{MethodLibrary, MethodRecord};
use crate::persist;
use crate::progress::ScanProgress;
use crate::report;
use crate::scan::{self, RecordSource};

/// A record discarded by first-writer-wins dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDuplicate {
    pub method_id: String,
    /// Provenance of the discarded record.
    pub source_file: String,
    /// Provenance of the record that won the id.
    pub kept_source: String,
}

/// A source file that contributed nothing because it could not be read or
/// parsed.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative: String,
    pub reason: String,
}

/// Everything one consolidation pass produced.
pub struct ConsolidateOutcome {
    pub library: MethodLibrary,
    pub dropped: Vec<DroppedDuplicate>,
    pub skipped: Vec<SkippedFile>,
}

/// First-writer-wins dedup on non-empty method ids.
///
/// Records without a usable id never collide: every one of them is kept.
/// Dropped duplicates are returned alongside the survivors so callers can
/// report them instead of losing them silently.
pub fn dedup_records(records: Vec<MethodRecord>) -> (Vec<MethodRecord>, Vec<DroppedDuplicate>) {
    let mut winner_source: HashMap<String, String> = HashMap::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for record in records {
        let id = record.id().map(str::to_string);
        match id {
            Some(id) => {
                if let Some(kept_source) = winner_source.get(&id) {
                    dropped.push(DroppedDuplicate {
                        method_id: id,
                        source_file: record.source_file.clone().unwrap_or_default(),
                        kept_source: kept_source.clone(),
                    });
                } else {
                    winner_source
                        .insert(id, record.source_file.clone().unwrap_or_default());
                    kept.push(record);
                }
            }
            None => kept.push(record),
        }
    }

    (kept, dropped)
}

/// Scan, load, and dedup without touching the library directory.
///
/// Shared by `mth consolidate` and the read-only `mth report`.
pub fn consolidate(config: &Config, progress: &dyn ScanProgress) -> Result<ConsolidateOutcome> {
    let sources = scan::scan_record_files(&config.scan, progress)?;
    let (records, skipped) = load_all(&sources);
    let (methods, dropped) = dedup_records(records);
    let library = MethodLibrary::new(methods, sources.len());

    Ok(ConsolidateOutcome {
        library,
        dropped,
        skipped,
    })
}

fn load_all(sources: &[RecordSource]) -> (Vec<MethodRecord>, Vec<SkippedFile>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        match loader::load_records(&source.path, &source.relative) {
            Ok(mut loaded) => records.append(&mut loaded),
            Err(err) => {
                eprintln!("Warning: skipping {}: {:#}", source.relative, err);
                skipped.push(SkippedFile {
                    relative: source.relative.clone(),
                    reason: err.root_cause().to_string(),
                });
            }
        }
    }

    (records, skipped)
}

/// Run the full pipeline: consolidate, write both library artifacts, build
/// and write the index, print a summary. With `with_report`, the
/// consolidation report follows the summary.
pub fn run_consolidate(
    config: &Config,
    progress: &dyn ScanProgress,
    with_report: bool,
) -> Result<()> {
    let outcome = consolidate(config, progress)?;

    persist::write_library(&config.library, &outcome.library)?;
    let index = MethodIndex::build(&outcome.library.methods);
    index.write(&config.library.index_json())?;

    print_summary(config, &outcome);

    if with_report {
        println!();
        report::print_consolidation_report(config, &outcome.library);
    }

    Ok(())
}

/// Read-only mode: consolidate in memory and print the report. Writes
/// nothing.
pub fn run_report(config: &Config, progress: &dyn ScanProgress) -> Result<()> {
    let outcome = consolidate(config, progress)?;

    if !outcome.dropped.is_empty() {
        println!("duplicates dropped: {}", outcome.dropped.len());
        for dup in &outcome.dropped {
            println!(
                "  {}  {} (kept {})",
                dup.method_id, dup.source_file, dup.kept_source
            );
        }
        println!();
    }

    report::print_consolidation_report(config, &outcome.library);
    Ok(())
}

fn print_summary(config: &Config, outcome: &ConsolidateOutcome) {
    let loaded = outcome.library.methods.len() + outcome.dropped.len();

    println!("consolidate {}", config.scan.root.display());
    println!("  source files: {}", outcome.library.metadata.source_files);
    println!("  records loaded: {}", loaded);
    println!("  unique methods: {}", outcome.library.methods.len());
    println!("  duplicates dropped: {}", outcome.dropped.len());
    for dup in &outcome.dropped {
        println!(
            "    {}  {} (kept {})",
            dup.method_id, dup.source_file, dup.kept_source
        );
    }
    if !outcome.skipped.is_empty() {
        println!("  files skipped: {}", outcome.skipped.len());
        for skip in &outcome.skipped {
            println!("    {}  ({})", skip.relative, skip.reason);
        }
    }
    println!("  csv: {}", config.library.consolidated_csv().display());
    println!("  json: {}", config.library.consolidated_json().display());
    println!("  index: {}", config.library.index_json().display());
    println!("ok");
}
