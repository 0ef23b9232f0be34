use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn mth_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("mth");
    path
}

fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    // Record files across three modules. Scan order is sorted, so the
    // analysis copy of MTH-001 wins over the writer duplicate.
    write_file(
        &root.join("analysis/methods.csv"),
        "method_id,method_name,category,file_path,description,execution_modes\n\
         MTH-001,Lint Sweep,CODE_ANALYSIS,analysis/lint.py,Fast syntax check,\"quick,full\"\n\
         MTH-002,Dead Code Scan,CODE_ANALYSIS,analysis/scan.py,Finds unreachable code,quick\n\
         MTH-003,Style Check,UTILITY,analysis/style.py,Formatting only,\n",
    );
    // No execution mode columns here: modes come from category defaults.
    write_file(
        &root.join("extras/methods.csv"),
        "method_id,method_name,category,file_path,description,line_number\n\
         MTH-201,Ext Method,UTILITY,extras/ext.py,Carries a custom column,42\n",
    );
    write_file(
        &root.join("writer/methods.csv"),
        "method_id,method_name,category,file_path,description\n\
         MTH-101,Draft Writer,GENERATION,writer/draft.py,Writes first drafts\n\
         MTH-001,Duplicate Lint,OTHER,writer/dup.py,Loses to the analysis copy\n",
    );
    // Noise that must never be scanned.
    write_file(
        &root.join("node_modules/junk/methods.csv"),
        "method_id,method_name\nMTH-999,Never Seen\n",
    );
    write_file(&root.join("notes.csv"), "method_id\nMTH-998\n");

    let config_content = format!(
        r#"[scan]
root = "{}"

[library]
dir = "{}/library"
"#,
        root.display(),
        root.display()
    );

    let config_path = root.join("config").join("methodlib.toml");
    write_file(&config_path, config_content);

    (tmp, config_path)
}

fn run_mth(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = mth_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run mth binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn library_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("library")
}

#[test]
fn test_scan_lists_record_files() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_mth(&config_path, &["scan"]);
    assert!(success, "scan failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("analysis/methods.csv"));
    assert!(stdout.contains("extras/methods.csv"));
    assert!(stdout.contains("writer/methods.csv"));
    assert!(stdout.contains("total: 3 file(s)"));
    assert!(
        !stdout.contains("node_modules"),
        "excluded dir leaked into scan: {}",
        stdout
    );
    assert!(!stdout.contains("notes.csv"));
}

#[test]
fn test_scan_root_override() {
    let (tmp, config_path) = setup_test_env();

    let analysis_root = tmp.path().join("analysis");
    let (stdout, _, success) = run_mth(
        &config_path,
        &["scan", "--root", analysis_root.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("methods.csv"));
    assert!(stdout.contains("total: 1 file(s)"));
}

#[test]
fn test_consolidate_writes_artifacts() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_mth(&config_path, &["consolidate"]);
    assert!(
        success,
        "consolidate failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("source files: 3"));
    assert!(stdout.contains("records loaded: 6"));
    assert!(stdout.contains("unique methods: 5"));
    assert!(stdout.contains("duplicates dropped: 1"));
    assert!(stdout.contains("ok"));

    let library = library_dir(&config_path);
    assert!(library.join("methods-consolidated.csv").exists());
    assert!(library.join("methods-consolidated.json").exists());
    assert!(library.join("methods-index.json").exists());
}

#[test]
fn test_consolidate_reports_dropped_duplicates() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, _) = run_mth(&config_path, &["consolidate"]);
    assert!(
        stdout.contains("MTH-001  writer/methods.csv (kept analysis/methods.csv)"),
        "Expected dropped duplicate line, got: {}",
        stdout
    );
}

#[test]
fn test_first_writer_wins() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let (stdout, _, success) = run_mth(&config_path, &["query", "id", "MTH-001"]);
    assert!(success);
    assert!(stdout.contains("Lint Sweep"));
    assert!(stdout.contains("CODE_ANALYSIS"));
    assert!(!stdout.contains("Duplicate Lint"));

    // The losing record's category never reaches the index.
    let (stdout, _, success) = run_mth(&config_path, &["query", "category", "OTHER"]);
    assert!(success);
    assert!(stdout.contains("No methods found."));
}

#[test]
fn test_inferred_modes_are_queryable() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    // GENERATION defaults include "party".
    let (stdout, _, success) = run_mth(&config_path, &["query", "mode", "party"]);
    assert!(success);
    assert!(stdout.contains("Draft Writer"));
    assert!(stdout.contains("Found 1 method(s)"));

    // UTILITY defaults include "batch".
    let (stdout, _, _) = run_mth(&config_path, &["query", "mode", "batch"]);
    assert!(stdout.contains("Ext Method"));
    assert!(stdout.contains("Draft Writer"));
}

#[test]
fn test_blank_modes_column_is_not_inferred() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    // MTH-003 has an empty execution_modes cell. An absent column would
    // have produced the UTILITY defaults; a blank one must stay blank.
    let (stdout, _, success) = run_mth(&config_path, &["query", "id", "MTH-003"]);
    assert!(success);
    assert!(stdout.contains("Style Check"));

    let (stdout, _, _) = run_mth(&config_path, &["query", "mode", "quick"]);
    assert!(!stdout.contains("MTH-003"), "blank modes were inferred: {}", stdout);
    let (stdout, _, _) = run_mth(&config_path, &["query", "mode", "batch"]);
    assert!(!stdout.contains("MTH-003"));
}

#[test]
fn test_query_before_consolidate_errors() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_mth(&config_path, &["query", "search", "lint"]);
    assert!(!success, "query without an index should fail");
    assert!(
        stderr.contains("mth consolidate"),
        "Should point at consolidate, got: {}",
        stderr
    );

    let (_, stderr, success) = run_mth(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("mth consolidate"));
}

#[test]
fn test_query_id_not_found() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let (stdout, _, success) = run_mth(&config_path, &["query", "id", "MTH-404"]);
    assert!(success, "a missing id is not a command failure");
    assert!(stdout.contains("Method not found: MTH-404"));
}

#[test]
fn test_search_keyword_limit() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    // "check" matches MTH-001 (description) and MTH-003 (name).
    let (stdout, _, success) = run_mth(&config_path, &["query", "search", "check"]);
    assert!(success);
    assert!(stdout.contains("Found 2 method(s)"));

    let (stdout, _, _) = run_mth(&config_path, &["query", "search", "check", "--limit", "1"]);
    assert!(stdout.contains("Found 1 method(s)"));
    assert!(stdout.contains("Lint Sweep"), "library order decides who fits the limit");
    assert!(!stdout.contains("Style Check"));
}

#[test]
fn test_search_case_insensitive() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let (stdout, _, success) = run_mth(&config_path, &["query", "search", "LINT"]);
    assert!(success);
    assert!(stdout.contains("Found 1 method(s)"));
    assert!(stdout.contains("Lint Sweep"));
}

#[test]
fn test_query_full_detail() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let (stdout, _, success) = run_mth(&config_path, &["query", "id", "MTH-201"]);
    assert!(success);
    assert!(stdout.contains("Ext Method"));
    assert!(stdout.contains("extras/methods.csv"), "provenance missing: {}", stdout);
    assert!(stdout.contains("line_number: 42"), "extra column missing: {}", stdout);
}

#[test]
fn test_report_writes_nothing() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_mth(&config_path, &["report"]);
    assert!(success, "report failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("consolidation report"));
    assert!(stdout.contains("total methods: 5"));
    assert!(
        !library_dir(&config_path).exists(),
        "report must not create the library directory"
    );
}

#[test]
fn test_consolidate_with_report_flag() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_mth(&config_path, &["consolidate", "--report"]);
    assert!(success);
    assert!(stdout.contains("ok"));
    assert!(stdout.contains("consolidation report"));
}

#[test]
fn test_consolidate_deterministic_artifacts() {
    let (_tmp, config_path) = setup_test_env();
    let library = library_dir(&config_path);

    run_mth(&config_path, &["consolidate"]);
    let index_first = fs::read(library.join("methods-index.json")).unwrap();
    let csv_first = fs::read(library.join("methods-consolidated.csv")).unwrap();

    run_mth(&config_path, &["consolidate"]);
    let index_second = fs::read(library.join("methods-index.json")).unwrap();
    let csv_second = fs::read(library.join("methods-consolidated.csv")).unwrap();

    assert_eq!(index_first, index_second, "index must be byte-identical across runs");
    assert_eq!(csv_first, csv_second);
}

#[test]
fn test_stats_totals() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let (stdout, _, success) = run_mth(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("methods:    5"), "got: {}", stdout);
    assert!(stdout.contains("categories: 3"));
    assert!(stdout.contains("CODE_ANALYSIS"));
}

#[test]
fn test_library_json_metadata() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let json = fs::read_to_string(library_dir(&config_path).join("methods-consolidated.json"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["total_methods"], 5);
    assert_eq!(value["metadata"]["source_files"], 3);
    assert!(value["metadata"]["consolidation_date"].is_string());
    assert_eq!(value["methods"].as_array().unwrap().len(), 5);
}

#[test]
fn test_index_buckets() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let json = fs::read_to_string(library_dir(&config_path).join("methods-index.json")).unwrap();
    let index: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        index["by_category"]["CODE_ANALYSIS"],
        serde_json::json!(["MTH-001", "MTH-002"])
    );
    assert_eq!(
        index["by_mode"]["quick"],
        serde_json::json!(["MTH-001", "MTH-002", "MTH-201"])
    );
    assert_eq!(index["by_module"]["extras"], serde_json::json!(["MTH-201"]));
    // Inference is persisted, not recomputed at query time.
    assert_eq!(index["by_id"]["MTH-101"]["execution_modes"], "full,batch,party");
    assert_eq!(index["by_id"]["MTH-101"]["execution_mode"], "full");
}

#[test]
fn test_csv_header_unions_extra_columns() {
    let (_tmp, config_path) = setup_test_env();
    run_mth(&config_path, &["consolidate"]);

    let csv_text =
        fs::read_to_string(library_dir(&config_path).join("methods-consolidated.csv")).unwrap();
    let header = csv_text.lines().next().unwrap();
    assert_eq!(
        header,
        "method_id,method_name,category,file_path,description,\
         execution_modes,execution_mode,source_file,line_number"
    );

    let row = csv_text
        .lines()
        .find(|line| line.starts_with("MTH-201"))
        .expect("MTH-201 row missing");
    assert!(row.ends_with(",42"), "extra column value lost: {}", row);

    // Records from files without that column get an empty cell.
    let row = csv_text
        .lines()
        .find(|line| line.starts_with("MTH-001"))
        .unwrap();
    assert!(row.ends_with(","), "expected empty trailing cell: {}", row);
}

#[test]
fn test_bad_source_file_skipped() {
    let (tmp, config_path) = setup_test_env();

    // Invalid UTF-8 in the header row; sorts after the good files.
    write_file(
        &tmp.path().join("zbroken/methods.csv"),
        [0x6d, 0x65, 0xff, 0xfe, 0x0a],
    );

    let (stdout, stderr, success) = run_mth(&config_path, &["consolidate"]);
    assert!(success, "one bad file must not abort the run: {}", stderr);
    assert!(stdout.contains("files skipped: 1"));
    assert!(stdout.contains("zbroken/methods.csv"));
    assert!(stdout.contains("unique methods: 5"), "good files still load: {}", stdout);
    assert!(stderr.contains("Warning: skipping"));
}
