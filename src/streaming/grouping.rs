//! Grouping of data lines into per-sequence runs.
//!
//! A run is a maximal block of consecutive data lines with the same leading
//! sequence id. Input is expected to be grouped by sequence; this is not
//! enforced, and two separated runs of the same id come out as two groups.

use crate::gff::{GffError, Result};
use crate::streaming::lines::LineSource;
use memchr::memchr;
use std::io::BufRead;

/// A contiguous run of raw data lines belonging to one sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordGroup {
    /// Sequence id shared by every line. Empty only for the degenerate group
    /// of a stream without data lines.
    pub seq_id: String,
    pub lines: Vec<String>,
}

impl RecordGroup {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Single-pass iterator of [`RecordGroup`]s.
///
/// Comment lines are dropped without being inspected. After the input ends,
/// the last buffered group is yielded exactly once, even when it is empty.
pub struct RecordGroups<R: BufRead> {
    lines: LineSource<R>,
    current_id: Option<String>,
    buffer: Vec<String>,
    finished: bool,
}

impl<R: BufRead> RecordGroups<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineSource::new(reader),
            current_id: None,
            buffer: Vec::new(),
            finished: false,
        }
    }

    fn flush(&mut self) -> RecordGroup {
        RecordGroup {
            seq_id: self.current_id.take().unwrap_or_default(),
            lines: std::mem::take(&mut self.buffer),
        }
    }
}

impl<R: BufRead> Iterator for RecordGroups<R> {
    type Item = Result<RecordGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    return Some(Ok(self.flush()));
                }
            };

            if line.starts_with('#') {
                continue;
            }

            let Some(tab) = memchr(b'\t', line.as_bytes()) else {
                self.finished = true;
                return Some(Err(GffError::MalformedRecord { columns: 1, line }));
            };

            let same = self.current_id.as_deref().map(|id| id == &line[..tab]);
            match same {
                None => {
                    self.current_id = Some(line[..tab].to_string());
                    self.buffer.push(line);
                }
                Some(true) => self.buffer.push(line),
                Some(false) => {
                    let next_id = line[..tab].to_string();
                    let group = RecordGroup {
                        seq_id: self.current_id.replace(next_id).unwrap_or_default(),
                        lines: std::mem::replace(&mut self.buffer, vec![line]),
                    };
                    return Some(Ok(group));
                }
            }
        }
    }
}

/// Return the `n`-th (1-based) group from a group iterator.
pub fn nth_record<I>(groups: I, n: usize) -> Result<RecordGroup>
where
    I: IntoIterator<Item = Result<RecordGroup>>,
{
    if n == 0 {
        return Err(GffError::InvalidRecordNumber(n));
    }

    let mut found = 0;
    for group in groups {
        let group = group?;
        found += 1;
        if found == n {
            return Ok(group);
        }
    }

    Err(GffError::InsufficientRecords {
        requested: n,
        found,
    })
}
