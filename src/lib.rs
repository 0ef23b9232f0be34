//! # methodlib
//!
//! Consolidates scattered method record files into one canonical,
//! queryable library.
//!
//! Teams that describe their tooling in per-module `methods.csv` files end
//! up with records spread across the whole workspace. methodlib walks the
//! workspace, merges every record file into a single deduplicated library
//! with provenance, and persists an index for fast lookups by id, category,
//! module, and execution mode.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐
//! │    Scanner   │──▶│  Consolidate  │──▶│     Library     │
//! │ methods.csv  │   │ load + dedup  │   │ CSV+JSON+Index  │
//! └──────────────┘   └───────────────┘   └────────┬────────┘
//!                                                 │
//!                                                 ▼
//!                                          ┌──────────────┐
//!                                          │ Query Engine │
//!                                          │    (mth)     │
//!                                          └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! mth scan                          # list record files
//! mth consolidate --report          # build the library and index
//! mth query search "lint"           # keyword lookup
//! mth query category CODE_ANALYSIS  # category lookup
//! mth stats                         # library statistics
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`scan`] | Record file discovery |
//! | [`loader`] | CSV parsing and record normalization |
//! | [`consolidate`] | Pipeline orchestration and dedup |
//! | [`persist`] | Library artifact writing |
//! | [`index`] | The persisted lookup index |
//! | [`query`] | Read-side lookups over the index |
//! | [`report`] | Human-readable reports and result printing |

pub mod config;
pub mod consolidate;
pub mod index;
pub mod loader;
pub mod models;
pub mod persist;
pub mod progress;
pub mod query;
pub mod report;
pub mod scan;
