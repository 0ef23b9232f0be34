//! Record file loading and normalization.
//!
//! Parses one raw CSV into [`MethodRecord`]s and applies the two
//! enrichments every record receives: provenance (`source_file`) and
//! inferred execution-mode defaults. Inference only fires when the source
//! file lacks the column entirely; a present-but-empty value is kept as-is.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::MethodRecord;

/// Default for the `execution_mode` column when a source file omits it.
const DEFAULT_EXECUTION_MODE: &str = "full";

/// Default execution modes by category keyword, first match wins.
/// Matching is a case-insensitive substring check.
pub fn default_modes_for(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("analysis") {
        "quick,full,batch,party,interactive,debug"
    } else if category.contains("generation") {
        "full,batch,party"
    } else if category.contains("utility") || category.contains("helper") {
        "quick,batch"
    } else {
        "full,batch"
    }
}

/// Parse one record file.
///
/// The header row defines attribute names; every following row becomes one
/// record. Known columns land in typed fields, anything else is preserved
/// in `extra` in header order. Any open or parse failure (including invalid
/// UTF-8) is returned as an error so the caller can skip the whole file —
/// a partially parsed file contributes nothing.
pub fn load_records(path: &Path, source_file: &str) -> Result<Vec<MethodRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("Failed to parse {}", path.display()))?;
        records.push(record_from_row(&headers, &row, source_file));
    }

    Ok(records)
}

fn record_from_row(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    source_file: &str,
) -> MethodRecord {
    let mut record = MethodRecord::default();

    for (i, header) in headers.iter().enumerate() {
        // Short rows read as empty cells; cells beyond the header are dropped.
        let value = row.get(i).unwrap_or("").to_string();
        match header {
            "method_id" => record.method_id = Some(value),
            "method_name" => record.method_name = Some(value),
            "category" => record.category = Some(value),
            "file_path" => record.file_path = Some(value),
            "description" => record.description = Some(value),
            "execution_modes" => record.execution_modes = Some(value),
            "execution_mode" => record.execution_mode = Some(value),
            "source_file" => record.source_file = Some(value),
            _ => {
                record.extra.insert(header.to_string(), value);
            }
        }
    }

    // Provenance always reflects this run's scan, even if the source file
    // carried a source_file column of its own.
    record.source_file = Some(source_file.to_string());

    if record.execution_modes.is_none() {
        let category = record.category.as_deref().unwrap_or("");
        record.execution_modes = Some(default_modes_for(category).to_string());
    }
    if record.execution_mode.is_none() {
        record.execution_mode = Some(DEFAULT_EXECUTION_MODE.to_string());
    }

    record
}
