//! Read-side lookups over a persisted index.
//!
//! The engine never touches the record files: everything is answered from
//! `methods-index.json`. Edits to source CSVs are invisible here until the
//! next `mth consolidate`.

use anyhow::Result;
use indexmap::IndexMap;

use crate::config::Config;
use crate::index::MethodIndex;
use crate::models::MethodRecord;

pub struct QueryEngine {
    index: MethodIndex,
}

/// Coverage counts derived from the index.
///
/// `total_methods` counts identified methods (`by_id` entries); id-less
/// records persist in the library artifacts but are not queryable.
#[derive(Debug, Clone)]
pub struct LibraryStats {
    pub total_methods: usize,
    pub categories: IndexMap<String, usize>,
    pub modules: IndexMap<String, usize>,
    pub modes: IndexMap<String, usize>,
}

impl QueryEngine {
    pub fn load(config: &Config) -> Result<Self> {
        let index = MethodIndex::load(&config.library.index_json())?;
        Ok(Self { index })
    }

    #[cfg(test)]
    fn from_index(index: MethodIndex) -> Self {
        Self { index }
    }

    /// Exact id lookup.
    pub fn get(&self, method_id: &str) -> Option<&MethodRecord> {
        self.index.by_id.get(method_id)
    }

    pub fn find_by_category(&self, category: &str, limit: usize) -> Vec<&MethodRecord> {
        self.resolve(self.index.by_category.get(category), limit)
    }

    pub fn find_by_mode(&self, mode: &str, limit: usize) -> Vec<&MethodRecord> {
        self.resolve(self.index.by_mode.get(mode), limit)
    }

    pub fn find_by_module(&self, module: &str, limit: usize) -> Vec<&MethodRecord> {
        self.resolve(self.index.by_module.get(module), limit)
    }

    /// Case-insensitive substring match over names and descriptions, in
    /// index order, stopping once `limit` methods matched.
    pub fn search_keyword(&self, keyword: &str, limit: usize) -> Vec<&MethodRecord> {
        let needle = keyword.to_lowercase();
        let mut results = Vec::new();

        for record in self.index.by_id.values() {
            if results.len() >= limit {
                break;
            }
            let name = record.method_name.as_deref().unwrap_or("");
            let description = record.description.as_deref().unwrap_or("");
            if name.to_lowercase().contains(&needle)
                || description.to_lowercase().contains(&needle)
            {
                results.push(record);
            }
        }

        results
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total_methods: self.index.by_id.len(),
            categories: bucket_sizes(&self.index.by_category),
            modules: bucket_sizes(&self.index.by_module),
            modes: bucket_sizes(&self.index.by_mode),
        }
    }

    /// The limit caps how many ids are taken from the bucket, before
    /// resolution. Ids with no `by_id` entry are dropped, so fewer than
    /// `limit` records can come back even from a longer bucket.
    fn resolve(&self, ids: Option<&Vec<String>>, limit: usize) -> Vec<&MethodRecord> {
        let Some(ids) = ids else {
            return Vec::new();
        };
        ids.iter()
            .take(limit)
            .filter_map(|id| self.index.by_id.get(id))
            .collect()
    }
}

fn bucket_sizes(map: &IndexMap<String, Vec<String>>) -> IndexMap<String, usize> {
    map.iter()
        .map(|(name, ids)| (name.clone(), ids.len()))
        .collect()
}
