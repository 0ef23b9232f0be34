//! Scan progress on stderr.
//!
//! Long walks over big workspaces should show signs of life without
//! polluting stdout, which stays reserved for command output. Reporters
//! write to stderr only; the default is picked by whether stderr is a
//! terminal.

use std::io::Write;
use std::path::Path;

/// Receives scan lifecycle notifications.
pub trait ScanProgress {
    fn walk_started(&self, root: &Path);
    fn file_found(&self, relative: &str, total: usize);
}

/// One stderr line per discovered record file, with a running count.
pub struct TtyProgress;

impl ScanProgress for TtyProgress {
    fn walk_started(&self, root: &Path) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "scan {}  walking...", root.display());
    }

    fn file_found(&self, relative: &str, total: usize) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "  found {}  ({})",
            relative,
            format_number(total as u64)
        );
    }
}

/// Discards everything. Used when stderr is piped, and in tests.
pub struct Quiet;

impl ScanProgress for Quiet {
    fn walk_started(&self, _root: &Path) {}
    fn file_found(&self, _relative: &str, _total: usize) {}
}

/// Line-per-file reporting when stderr is a terminal, quiet otherwise.
pub fn for_tty() -> Box<dyn ScanProgress> {
    if atty::is(atty::Stream::Stderr) {
        Box::new(TtyProgress)
    } else {
        Box::new(Quiet)
    }
}

/// Thousands separators for human-facing counts.
pub(crate) fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(65536), "65,536");
        assert_eq!(format_number(12_345_678), "12,345,678");
    }
}
