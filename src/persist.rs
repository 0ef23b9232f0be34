//! Library artifact writing.
//!
//! Persists one consolidation run as two files under the library directory:
//! a flat CSV mirror of every record and a JSON document with run metadata.
//! Both writes fully replace any artifact from a previous run.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::LibraryConfig;
use crate::models::{MethodLibrary, MethodRecord, KNOWN_COLUMNS};

pub fn write_library(config: &LibraryConfig, library: &MethodLibrary) -> Result<()> {
    fs::create_dir_all(&config.dir).with_context(|| {
        format!("Failed to create library directory {}", config.dir.display())
    })?;

    write_csv(&config.consolidated_csv(), &library.methods)?;
    write_json(&config.consolidated_json(), library)?;
    Ok(())
}

/// Header covering every record: known columns that at least one record
/// carries, in canonical order, then extra columns in first-seen order.
/// No record's data is silently dropped for falling outside the first
/// record's shape.
pub(crate) fn csv_header(methods: &[MethodRecord]) -> Vec<String> {
    let mut header: Vec<String> = KNOWN_COLUMNS
        .iter()
        .filter(|col| methods.iter().any(|m| m.known_value(col).is_some()))
        .map(|col| col.to_string())
        .collect();

    for record in methods {
        for key in record.extra.keys() {
            if !header.iter().any(|col| col == key) {
                header.push(key.clone());
            }
        }
    }

    header
}

fn write_csv(path: &Path, methods: &[MethodRecord]) -> Result<()> {
    let header = csv_header(methods);
    if header.is_empty() {
        // Zero records. Still truncate so no stale artifact survives.
        fs::write(path, "")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    writer.write_record(&header)?;
    for record in methods {
        let row: Vec<&str> = header
            .iter()
            .map(|col| {
                record
                    .known_value(col)
                    .or_else(|| record.extra.get(col).map(String::as_str))
                    .unwrap_or("")
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_json(path: &Path, library: &MethodLibrary) -> Result<()> {
    let json = serde_json::to_string_pretty(library)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
