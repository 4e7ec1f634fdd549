//! GFF3 format detection.
//!
//! A stream is GFF3 when its first non-blank line, found within
//! [`BLANK_LINE_BUDGET`] leading blank lines, is a `##gff-version 3`
//! directive. Minor versions (`3.2.1`) and tab separators are accepted.

use crate::streaming::lines::first_line_within;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// Maximum number of blank lines allowed before the directive.
pub const BLANK_LINE_BUDGET: usize = 5;

const DIRECTIVE_PREFIX: &str = "##gff-version";

/// Outcome of a sniff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SniffReport {
    pub matched: bool,
    /// Reader hints. Always empty for GFF3.
    pub hints: HashMap<String, String>,
}

impl SniffReport {
    fn from_match(matched: bool) -> Self {
        Self {
            matched,
            hints: HashMap::new(),
        }
    }
}

/// Check a single line for the `##gff-version <ws>+ 3` directive.
pub fn is_version_directive(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(DIRECTIVE_PREFIX) else {
        return false;
    };
    let version = rest.trim_start_matches(char::is_whitespace);
    version.len() < rest.len() && version.starts_with('3')
}

/// Sniff a reader. Consumes lines from it; see [`sniff_seekable`] and
/// [`sniff_path`] for variants that leave the caller's position untouched.
///
/// Never fails: an I/O error is reported as no match.
pub fn sniff<R: BufRead>(reader: R) -> SniffReport {
    let matched = match first_line_within(reader, BLANK_LINE_BUDGET) {
        Ok(Some(line)) => is_version_directive(&line),
        Ok(None) | Err(_) => false,
    };
    SniffReport::from_match(matched)
}

/// Sniff a seekable reader and rewind it to where it started.
pub fn sniff_seekable<R: BufRead + Seek>(reader: &mut R) -> SniffReport {
    let Ok(start) = reader.stream_position() else {
        return SniffReport::default();
    };
    let report = sniff(&mut *reader);
    if reader.seek(SeekFrom::Start(start)).is_err() {
        return SniffReport::default();
    }
    report
}

/// Sniff a file by path. A file that cannot be opened does not match.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> SniffReport {
    match File::open(path) {
        Ok(file) => sniff(BufReader::new(file)),
        Err(_) => SniffReport::default(),
    }
}
