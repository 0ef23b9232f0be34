//! Core data models used throughout methodlib.
//!
//! These types represent the method records, the consolidated library, and
//! the run metadata that flow through the consolidation and query pipeline.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bucket name for records whose `file_path` is absent or empty, and the
/// display value for a missing category in reports.
pub const UNKNOWN: &str = "unknown";

/// Known record columns, in canonical write order. Columns outside this set
/// are preserved verbatim in [`MethodRecord::extra`].
pub const KNOWN_COLUMNS: [&str; 8] = [
    "method_id",
    "method_name",
    "category",
    "file_path",
    "description",
    "execution_modes",
    "execution_mode",
    "source_file",
];

/// One method entry from a record file.
///
/// Field presence mirrors the source CSV: `None` means the column did not
/// exist in the file's header, `Some("")` means it existed with an empty
/// value. The loader relies on that distinction when deciding whether to
/// infer execution modes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_modes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
    /// Root-relative path of the file this record was loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Columns outside the known set, in header order.
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl MethodRecord {
    /// The record's id, if present and non-empty.
    ///
    /// Records without a usable id are carried through the library and the
    /// written artifacts but never participate in dedup or id lookup.
    pub fn id(&self) -> Option<&str> {
        self.method_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Coarse grouping key: the text before the first `/` of `file_path`,
    /// or [`UNKNOWN`] when the path is absent or empty.
    pub fn module(&self) -> &str {
        match self.file_path.as_deref() {
            Some(path) if !path.is_empty() => path.split('/').next().unwrap_or(UNKNOWN),
            _ => UNKNOWN,
        }
    }

    /// Non-empty, whitespace-trimmed execution mode tokens.
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.execution_modes
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
    }

    /// Value of a known column, if the record carries it.
    pub fn known_value(&self, column: &str) -> Option<&str> {
        match column {
            "method_id" => self.method_id.as_deref(),
            "method_name" => self.method_name.as_deref(),
            "category" => self.category.as_deref(),
            "file_path" => self.file_path.as_deref(),
            "description" => self.description.as_deref(),
            "execution_modes" => self.execution_modes.as_deref(),
            "execution_mode" => self.execution_mode.as_deref(),
            "source_file" => self.source_file.as_deref(),
            _ => None,
        }
    }
}

/// Metadata describing one consolidation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// When the library was consolidated (UTC, RFC3339).
    pub consolidation_date: DateTime<Utc>,
    /// Records in the library, id-less ones included.
    pub total_methods: usize,
    /// Record files discovered by the scan, parse failures included.
    pub source_files: usize,
}

/// The deduplicated, ordered collection of all records from one run.
///
/// Built fresh each consolidation; never merged with a previous run's
/// output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodLibrary {
    pub metadata: RunMetadata,
    pub methods: Vec<MethodRecord>,
}

impl MethodLibrary {
    pub fn new(methods: Vec<MethodRecord>, source_files: usize) -> Self {
        Self {
            metadata: RunMetadata {
                consolidation_date: Utc::now(),
                total_methods: methods.len(),
                source_files,
            },
            methods,
        }
    }
}
