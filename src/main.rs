//! # Method Library CLI (`mth`)
//!
//! The `mth` binary is the primary interface for methodlib. It provides
//! commands for discovering scattered method record files, consolidating
//! them into a single library, and querying the resulting index.
//!
//! ## Usage
//!
//! ```bash
//! mth --config ./config/methodlib.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mth scan` | List every record file under the scan root |
//! | `mth consolidate` | Merge all record files into the library and build the index |
//! | `mth report` | Print the consolidation report without writing anything |
//! | `mth query search "<keyword>"` | Keyword search over names and descriptions |
//! | `mth query category <name>` | All methods in a category |
//! | `mth query mode <name>` | All methods supporting an execution mode |
//! | `mth query module <name>` | All methods in a module |
//! | `mth query id <id>` | Look up one method by id |
//! | `mth stats` | Library statistics from the index |
//!
//! ## Examples
//!
//! ```bash
//! # See what a consolidation run would pick up
//! mth scan --root ./workspace
//!
//! # Build the library and the index
//! mth consolidate --root ./workspace --report
//!
//! # Find methods by keyword
//! mth query search "lint" --limit 10
//!
//! # Everything in one category, with full detail
//! mth query category CODE_ANALYSIS --full
//!
//! # One method by id
//! mth query id MTH-001
//! ```

mod config;
mod consolidate;
mod index;
mod loader;
mod models;
mod persist;
mod progress;
mod query;
mod report;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Method library CLI — consolidates scattered method record files into one
/// canonical, queryable library.
///
/// Every command reads its settings from the TOML file named by `--config`;
/// `config/methodlib.example.toml` documents all keys.
#[derive(Parser)]
#[command(
    name = "mth",
    about = "Method library — consolidate scattered method record files and query the result",
    version,
    long_about = "methodlib walks a workspace for per-module method record files (CSV), merges \
    them into a single deduplicated library with provenance, and writes a persisted index for \
    fast lookups by id, category, module, and execution mode."
)]
struct Cli {
    /// TOML configuration file.
    ///
    /// Defaults to `./config/methodlib.toml`. A missing file is not an
    /// error; built-in defaults apply.
    #[arg(long, global = true, default_value = "./config/methodlib.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List every record file under the scan root.
    ///
    /// Walks the configured root, prunes excluded directories, and prints
    /// the root-relative path of each record file a consolidation run would
    /// load. Nothing is parsed or written.
    Scan {
        /// Scan this directory instead of the configured root.
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Consolidate all record files into the library.
    ///
    /// Scans the root, loads and normalizes every record, drops duplicate
    /// ids (first occurrence wins), and writes three artifacts under the
    /// library directory: the consolidated CSV, the consolidated JSON with
    /// run metadata, and the lookup index. Each run fully replaces the
    /// previous artifacts.
    Consolidate {
        /// Scan this directory instead of the configured root.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print the consolidation report after writing the artifacts.
        #[arg(long)]
        report: bool,
    },

    /// Print the consolidation report without writing anything.
    ///
    /// Runs the same scan, load, and dedup as `consolidate`, then prints
    /// the category and execution mode breakdown. The library directory is
    /// left untouched.
    Report {
        /// Scan this directory instead of the configured root.
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Look up methods in the persisted index.
    ///
    /// All lookups read `methods-index.json`; run `mth consolidate` first.
    /// Record files edited since the last consolidation are not visible
    /// here until the next run.
    Query {
        #[command(subcommand)]
        lookup: Lookup,
    },

    /// Show library statistics from the persisted index.
    ///
    /// Prints method, category, module, and mode totals plus the largest
    /// buckets of each kind.
    Stats,
}

/// Query subcommands.
#[derive(Subcommand)]
enum Lookup {
    /// Case-insensitive keyword search over method names and descriptions.
    Search {
        /// The keyword to look for.
        keyword: String,

        /// Maximum number of methods to return.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Show full detail for each method (description, provenance, extras).
        #[arg(long)]
        full: bool,
    },

    /// All methods in a category (exact name).
    Category {
        /// Category name, e.g. `CODE_ANALYSIS`.
        name: String,

        /// Maximum number of methods to return.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Show full detail for each method (description, provenance, extras).
        #[arg(long)]
        full: bool,
    },

    /// All methods supporting an execution mode.
    Mode {
        /// Mode name, e.g. `quick`, `full`, `batch`.
        name: String,

        /// Maximum number of methods to return.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Show full detail for each method (description, provenance, extras).
        #[arg(long)]
        full: bool,
    },

    /// All methods in a module (the first segment of their file path).
    Module {
        /// Module name, e.g. `tools`. Records without a file path live
        /// under `unknown`.
        name: String,

        /// Maximum number of methods to return.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Show full detail for each method (description, provenance, extras).
        #[arg(long)]
        full: bool,
    },

    /// Look up one method by its exact id.
    ///
    /// Prints the method in full detail, or `Method not found: <id>` if the
    /// index has no such id.
    Id {
        /// Method id, e.g. `MTH-001`.
        method_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Scan { root } => {
            if let Some(root) = root {
                cfg.scan.root = root;
            }
            scan::run_scan(&cfg.scan)?;
        }
        Commands::Consolidate { root, report } => {
            if let Some(root) = root {
                cfg.scan.root = root;
            }
            let progress = progress::for_tty();
            consolidate::run_consolidate(&cfg, progress.as_ref(), report)?;
        }
        Commands::Report { root } => {
            if let Some(root) = root {
                cfg.scan.root = root;
            }
            let progress = progress::for_tty();
            consolidate::run_report(&cfg, progress.as_ref())?;
        }
        Commands::Query { lookup } => {
            let engine = query::QueryEngine::load(&cfg)?;
            match lookup {
                Lookup::Search {
                    keyword,
                    limit,
                    full,
                } => {
                    report::print_records(&engine.search_keyword(&keyword, limit), full);
                }
                Lookup::Category { name, limit, full } => {
                    report::print_records(&engine.find_by_category(&name, limit), full);
                }
                Lookup::Mode { name, limit, full } => {
                    report::print_records(&engine.find_by_mode(&name, limit), full);
                }
                Lookup::Module { name, limit, full } => {
                    report::print_records(&engine.find_by_module(&name, limit), full);
                }
                Lookup::Id { method_id } => match engine.get(&method_id) {
                    Some(record) => report::print_record(record, true),
                    None => println!("Method not found: {}", method_id),
                },
            }
        }
        Commands::Stats => {
            let engine = query::QueryEngine::load(&cfg)?;
            report::print_stats(&engine.stats());
        }
    }

    Ok(())
}
