//! The persisted lookup index.
//!
//! Four maps over one consolidation run, all in library insertion order:
//! `by_id` holds the full record for every identified method, and the three
//! secondary maps hold id lists per category, module, and execution mode.
//! Every id in a secondary map resolves through `by_id`; records without a
//! usable id appear in none of the maps.

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::MethodRecord;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodIndex {
    pub by_id: IndexMap<String, MethodRecord>,
    pub by_category: IndexMap<String, Vec<String>>,
    pub by_module: IndexMap<String, Vec<String>>,
    pub by_mode: IndexMap<String, Vec<String>>,
}

impl MethodIndex {
    /// Build all four maps in one pass over the library.
    ///
    /// Deterministic for a given input: same records, same index. Buckets
    /// and the ids inside them follow library order.
    pub fn build(methods: &[MethodRecord]) -> Self {
        let mut index = Self::default();

        for record in methods {
            let id = match record.id() {
                Some(id) => id.to_string(),
                None => continue,
            };

            // Only a present, non-empty category earns a bucket. Modules
            // always bucket, under "unknown" if need be.
            if let Some(category) = record.category.as_deref().filter(|c| !c.is_empty()) {
                index
                    .by_category
                    .entry(category.to_string())
                    .or_default()
                    .push(id.clone());
            }
            index
                .by_module
                .entry(record.module().to_string())
                .or_default()
                .push(id.clone());
            for mode in record.modes() {
                index
                    .by_mode
                    .entry(mode.to_string())
                    .or_default()
                    .push(id.clone());
            }

            index.by_id.insert(id, record.clone());
        }

        index
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "Method index not found at {}. Run `mth consolidate` first.",
                path.display()
            );
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let index = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(index)
    }
}
