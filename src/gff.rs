//! Streaming GFF3 reader.
//!
//! Data lines are grouped into contiguous runs sharing a sequence id; each run
//! is parsed column by column and folded into a per-sequence feature sink.

use crate::collection::{FeatureCollection, FeatureSink};
use crate::feature::{Bound, FeatureRecord, Phase};
use crate::sniff::sniff_path;
use crate::streaming::grouping::{nth_record, RecordGroup, RecordGroups};
use log::{debug, warn};
use memchr::memchr_iter;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Number of tab-separated columns in a GFF3 data line.
pub const GFF3_COLUMNS: usize = 9;

/// Errors that can occur while reading or writing GFF3.
#[derive(Error, Debug)]
pub enum GffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Expected {expected} tab-separated columns, got {columns} in line: {line:?}", expected = GFF3_COLUMNS)]
    MalformedRecord { columns: usize, line: String },

    #[error("Invalid {field} coordinate '{value}' in line: {line:?}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        line: String,
    },

    #[error("Unknown value for phase column: '{value}' in line: {line:?}")]
    InvalidPhase { value: String, line: String },

    #[error("Attribute segment is not a single tag=value pair: {segment:?}")]
    MalformedAttribute { segment: String },

    #[error("Invalid record number: {0} (record numbers start at 1)")]
    InvalidRecordNumber(usize),

    #[error("Stream contains fewer than {requested} records (found {found})")]
    InsufficientRecords { requested: usize, found: usize },

    #[error("Input is not GFF3: {0}")]
    FormatMismatch(String),

    #[error("Bound {0} has no 1-based start")]
    UnwritableBound(Bound),
}

pub type Result<T> = std::result::Result<T, GffError>;

/// Parse a decimal coordinate. Digits only; `None` on overflow.
#[inline]
fn parse_position(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in s.as_bytes() {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse and validate one GFF3 data line.
///
/// The seqid column is not kept; the grouper carries it alongside the lines.
///
/// # Example
///
/// ```
/// use gffkit::gff::parse_line;
/// use gffkit::feature::Bound;
///
/// let rec = parse_line("ctg123\t.\tgene\t1000\t9000\t.\t+\t.\tID=gene00001;Name=EDEN").unwrap();
/// assert_eq!(rec.feature_type, "gene");
/// assert_eq!(rec.bound(), Bound::new(999, 9000));
/// ```
pub fn parse_line(line: &str) -> Result<FeatureRecord> {
    let columns = memchr_iter(b'\t', line.as_bytes()).count() + 1;
    if columns != GFF3_COLUMNS {
        return Err(GffError::MalformedRecord {
            columns,
            line: line.to_string(),
        });
    }

    let mut fields = line.split('\t').skip(1);
    // Count was checked above, so each field is present.
    let mut next = || fields.next().unwrap_or_default();
    let source = next();
    let feature_type = next();
    let start_field = next();
    let end_field = next();
    let score = next();
    let strand = next();
    let phase_field = next();
    let attributes = next();

    let start = match parse_position(start_field) {
        Some(start) if start > 0 => start,
        _ => {
            return Err(GffError::InvalidCoordinate {
                field: "start",
                value: start_field.to_string(),
                line: line.to_string(),
            })
        }
    };
    let end = parse_position(end_field).ok_or_else(|| GffError::InvalidCoordinate {
        field: "end",
        value: end_field.to_string(),
        line: line.to_string(),
    })?;

    let phase = Phase::from_field(phase_field).ok_or_else(|| GffError::InvalidPhase {
        value: phase_field.to_string(),
        line: line.to_string(),
    })?;

    Ok(FeatureRecord {
        source: source.to_string(),
        feature_type: feature_type.to_string(),
        start,
        end,
        score: score.to_string(),
        strand: strand.to_string(),
        phase,
        attributes: attributes.to_string(),
    })
}

/// Fold a group's lines into `sink`, returning it.
///
/// Every line is validated before anything is added, so on error the sink
/// is dropped and no partial collection escapes. An empty group is a no-op.
pub fn assemble<S: FeatureSink>(lines: &[String], mut sink: S) -> Result<S> {
    let records = lines
        .iter()
        .map(|line| parse_line(line))
        .collect::<Result<Vec<_>>>()?;

    for record in records {
        let (bounds, metadata) = record.into_parts();
        sink.add(bounds, metadata);
    }

    Ok(sink)
}

/// A streaming GFF3 reader.
pub struct GffReader<R: BufRead> {
    groups: RecordGroups<R>,
}

impl GffReader<BufReader<File>> {
    /// Open a GFF3 file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> GffReader<R> {
    /// Create a new reader from any buffered source.
    pub fn new(reader: R) -> Self {
        Self {
            groups: RecordGroups::new(reader),
        }
    }

    /// Iterate raw record groups without parsing columns.
    pub fn groups(self) -> RecordGroups<R> {
        self.groups
    }

    /// Read the `rec_num`-th (1-based) sequence into `sink`.
    ///
    /// Returns the sequence id together with the filled sink.
    pub fn read_record_into<S: FeatureSink>(self, rec_num: usize, sink: S) -> Result<(String, S)> {
        let group = nth_record(self.groups, rec_num)?;
        let sink = assemble(&group.lines, sink)?;
        debug!(
            "Assembled record {} ({}): {} features",
            rec_num,
            group.seq_id,
            group.lines.len()
        );
        Ok((group.seq_id, sink))
    }

    /// Read the `rec_num`-th (1-based) sequence into a new collection.
    pub fn read_record(self, rec_num: usize) -> Result<(String, FeatureCollection)> {
        self.read_record_into(rec_num, FeatureCollection::new())
    }

    /// Iterate every sequence in the stream as a parsed collection.
    pub fn collections(self) -> Collections<R> {
        Collections {
            groups: self.groups,
            seen: FxHashSet::default(),
        }
    }
}

/// Iterator over `(seq_id, FeatureCollection)` pairs.
///
/// The degenerate empty group produced for a stream without data lines is
/// skipped. A sequence id that reappears after another sequence yields a
/// second, separate collection and logs a warning.
pub struct Collections<R: BufRead> {
    groups: RecordGroups<R>,
    seen: FxHashSet<String>,
}

impl<R: BufRead> Collections<R> {
    fn build(&mut self, group: RecordGroup) -> Result<(String, FeatureCollection)> {
        if !self.seen.insert(group.seq_id.clone()) {
            warn!(
                "Sequence '{}' appears in non-contiguous runs; input is not grouped by sequence",
                group.seq_id
            );
        }
        let collection = assemble(&group.lines, FeatureCollection::with_capacity(group.len()))?;
        debug!(
            "Assembled sequence {}: {} features",
            group.seq_id,
            collection.len()
        );
        Ok((group.seq_id, collection))
    }
}

impl<R: BufRead> Iterator for Collections<R> {
    type Item = Result<(String, FeatureCollection)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.groups.next()? {
                Ok(group) if group.is_empty() => continue,
                Ok(group) => return Some(self.build(group)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Read the `rec_num`-th (1-based) sequence from a GFF3 file.
pub fn read_collection<P: AsRef<Path>>(path: P, rec_num: usize) -> Result<(String, FeatureCollection)> {
    GffReader::from_path(path)?.read_record(rec_num)
}

/// Read every sequence from a GFF3 file.
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<(String, FeatureCollection)>> {
    GffReader::from_path(path)?.collections().collect()
}

/// Read every sequence from a file that must sniff as GFF3.
pub fn read_all_checked<P: AsRef<Path>>(path: P) -> Result<Vec<(String, FeatureCollection)>> {
    let path = path.as_ref();
    if !sniff_path(path).matched {
        return Err(GffError::FormatMismatch(format!(
            "{} does not start with a ##gff-version 3 directive",
            path.display()
        )));
    }
    read_all(path)
}

/// Parse every sequence from a string (useful for testing).
pub fn parse_str(content: &str) -> Result<Vec<(String, FeatureCollection)>> {
    GffReader::new(content.as_bytes()).collections().collect()
}
