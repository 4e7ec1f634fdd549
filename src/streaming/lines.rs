//! Line iteration over buffered readers.

use crate::gff::Result;
use std::io::{self, BufRead};

/// Forward-only source of trimmed, non-blank lines.
///
/// Comment lines are passed through; callers decide what to do with them.
pub struct LineSource<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Physical line number of the last line read (1-based, blanks included).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next non-blank line, trimmed of surrounding whitespace.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(line.to_string()));
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

/// Return the first non-blank line, unless more than `max_blanks` blank lines
/// precede it.
///
/// The line is returned verbatim apart from its terminator. `Ok(None)` means
/// either the blank budget ran out or the stream ended first.
pub fn first_line_within<R: BufRead>(mut reader: R, max_blanks: usize) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    let mut blanks = 0;
    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        if buffer.trim().is_empty() {
            blanks += 1;
            if blanks > max_blanks {
                return Ok(None);
            }
            continue;
        }
        let line = buffer.trim_end_matches(['\n', '\r']);
        return Ok(Some(line.to_string()));
    }
}
