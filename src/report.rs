//! Human-readable output: the consolidation report, library stats, and
//! per-method result blocks.
//!
//! Everything here writes to stdout and formats only. Counting happens on
//! whichever side owns the data: the consolidation report counts records,
//! the stats view counts index buckets.

use indexmap::IndexMap;

use crate::config::Config;
use crate::models::{MethodLibrary, MethodRecord, UNKNOWN};
use crate::progress::format_number;
use crate::query::LibraryStats;

/// Consolidation-side report, computed from the library records themselves
/// so id-less records are covered too.
pub fn print_consolidation_report(config: &Config, library: &MethodLibrary) {
    let categories = category_counts(&library.methods);
    let modes = mode_counts(&library.methods);

    println!("consolidation report");
    println!("  source files:  {}", library.metadata.source_files);
    println!(
        "  total methods: {}",
        format_number(library.metadata.total_methods as u64)
    );

    println!();
    println!("  categories ({}):", categories.len());
    for (name, count) in sorted_desc(&categories) {
        println!("    {:<28} {:>6}", name, count);
    }

    println!();
    println!("  execution modes ({}):", modes.len());
    for (name, count) in sorted_desc(&modes) {
        println!("    {:<28} {:>6}", name, count);
    }

    println!();
    println!("  library:");
    println!("    csv:   {}", config.library.consolidated_csv().display());
    println!("    json:  {}", config.library.consolidated_json().display());
    println!("    index: {}", config.library.index_json().display());
}

/// Query-side stats view over the persisted index.
pub fn print_stats(stats: &LibraryStats) {
    println!("method library stats");
    println!("  methods:    {}", format_number(stats.total_methods as u64));
    println!("  categories: {}", stats.categories.len());
    println!("  modules:    {}", stats.modules.len());
    println!("  modes:      {}", stats.modes.len());

    print_histogram("top categories", &stats.categories, 10);
    print_histogram("execution modes", &stats.modes, usize::MAX);
    print_histogram("top modules", &stats.modules, 10);
}

/// Result blocks for query commands. `full` adds description, provenance,
/// and any extra columns the record carried.
pub fn print_records(records: &[&MethodRecord], full: bool) {
    if records.is_empty() {
        println!("No methods found.");
        return;
    }

    println!("Found {} method(s)", records.len());
    for record in records {
        println!();
        print_record(record, full);
    }
}

/// One result block. Id lookups print this directly, without the
/// `Found N method(s)` banner.
pub fn print_record(record: &MethodRecord, full: bool) {
    let id = record.id().unwrap_or("-");
    let name = record.method_name.as_deref().unwrap_or("(unnamed)");
    println!("{}  {}", id, name);
    println!(
        "  category: {}",
        record
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN)
    );
    println!("  module:   {}", record.module());
    let modes: Vec<&str> = record.modes().collect();
    if !modes.is_empty() {
        println!("  modes:    {}", modes.join(", "));
    }

    if full {
        if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
            println!("  about:    {}", description);
        }
        if let Some(path) = record.file_path.as_deref().filter(|p| !p.is_empty()) {
            println!("  file:     {}", path);
        }
        if let Some(source) = record.source_file.as_deref().filter(|s| !s.is_empty()) {
            println!("  source:   {}", source);
        }
        for (key, value) in &record.extra {
            println!("  {}: {}", key, value);
        }
    }
}

pub(crate) fn category_counts(methods: &[MethodRecord]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in methods {
        let category = record
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN);
        *counts.entry(category.to_string()).or_default() += 1;
    }
    counts
}

pub(crate) fn mode_counts(methods: &[MethodRecord]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in methods {
        for mode in record.modes() {
            *counts.entry(mode.to_string()).or_default() += 1;
        }
    }
    counts
}

fn print_histogram(title: &str, map: &IndexMap<String, usize>, top: usize) {
    if map.is_empty() {
        return;
    }
    println!();
    println!("  {}:", title);
    for (name, count) in sorted_desc(map).into_iter().take(top) {
        println!("    {:<28} {:>6}", name, format_number(count as u64));
    }
}

/// Descending by count; the sort is stable, so ties keep first-seen order.
fn sorted_desc(map: &IndexMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Option<&str>, modes: Option<&str>) -> MethodRecord {
        MethodRecord {
            category: category.map(str::to_string),
            execution_modes: modes.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn absent_and_empty_categories_report_as_unknown() {
        let counts = category_counts(&[
            record(Some("CODE_ANALYSIS"), None),
            record(Some(""), None),
            record(None, None),
        ]);
        assert_eq!(counts["CODE_ANALYSIS"], 1);
        assert_eq!(counts[UNKNOWN], 2);
    }

    #[test]
    fn mode_counts_tally_each_token() {
        let counts = mode_counts(&[
            record(None, Some("quick,full")),
            record(None, Some("full,batch")),
            record(None, Some("")),
        ]);
        assert_eq!(counts["full"], 2);
        assert_eq!(counts["quick"], 1);
        assert_eq!(counts["batch"], 1);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn sorted_desc_is_stable_on_ties() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), 2usize);
        map.insert("a".to_string(), 5usize);
        map.insert("c".to_string(), 2usize);
        let sorted = sorted_desc(&map);
        assert_eq!(sorted, vec![("a", 5), ("b", 2), ("c", 2)]);
    }
}
