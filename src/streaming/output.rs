//! GFF3 output formatting.
//!
//! Uses itoa for coordinate formatting to avoid allocation per line.

use crate::collection::FeatureCollection;
use crate::feature::{Bound, Feature, Phase};
use crate::gff::{GffError, Result};
use std::io::{BufWriter, Write};

/// Header directive written at the top of every output.
pub const GFF3_DIRECTIVE: &str = "##gff-version 3";

/// Buffer size for GffWriter (64KB default).
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Placeholder for a missing column.
const MISSING: &[u8] = b".";

/// Buffered GFF3 writer.
///
/// Every stored bound becomes one 9-column line; coordinates are converted
/// back from 0-based half-open to 1-based inclusive.
pub struct GffWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    lines_written: usize,
}

impl<W: Write> GffWriter<W> {
    /// Create a new GffWriter with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new GffWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            lines_written: 0,
        }
    }

    /// Write the `##gff-version 3` directive.
    pub fn write_header(&mut self) -> Result<()> {
        self.write_line(GFF3_DIRECTIVE.as_bytes())
    }

    /// Write the header followed by every feature of `collection`.
    pub fn write_collection(&mut self, collection: &FeatureCollection, seq_id: &str) -> Result<()> {
        self.write_header()?;
        self.write_features(collection, seq_id)
    }

    /// Write every feature of `collection` in insertion order, without a header.
    pub fn write_features(&mut self, collection: &FeatureCollection, seq_id: &str) -> Result<()> {
        for feature in collection {
            self.write_feature(feature, seq_id)?;
        }
        Ok(())
    }

    /// Write one line per bound of `feature`.
    pub fn write_feature(&mut self, feature: &Feature, seq_id: &str) -> Result<()> {
        for bound in &feature.bounds {
            self.write_bound(feature, *bound, seq_id)?;
        }
        Ok(())
    }

    fn write_bound(&mut self, feature: &Feature, bound: Bound, seq_id: &str) -> Result<()> {
        let md = &feature.metadata;
        let start = bound
            .one_based_start()
            .ok_or(GffError::UnwritableBound(bound))?;

        self.write_bytes(seq_id.as_bytes())?;
        self.write_tab()?;
        self.write_field(md.source.as_deref())?;
        self.write_tab()?;
        self.write_field(md.feature_type.as_deref())?;
        self.write_tab()?;
        self.write_int(start)?;
        self.write_tab()?;
        self.write_int(bound.end)?;
        self.write_tab()?;
        self.write_field(md.score.as_deref())?;
        self.write_tab()?;
        self.write_field(md.strand.as_deref())?;
        self.write_tab()?;
        match md.phase {
            Phase::Absent => self.write_bytes(MISSING)?,
            Phase::Value(v) => self.write_int(v)?,
        }
        self.write_tab()?;
        self.write_field(md.attributes.as_deref())?;
        self.write_newline()?;

        self.lines_written += 1;
        Ok(())
    }

    /// Write an optional field, or `.` when it is absent.
    #[inline]
    fn write_field(&mut self, value: Option<&str>) -> Result<()> {
        self.write_bytes(value.map_or(MISSING, str::as_bytes))
    }

    /// Write a full line as-is with newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.write_bytes(line)?;
        self.write_newline()
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(GffError::Io)
    }

    #[inline]
    fn write_tab(&mut self) -> Result<()> {
        self.write_bytes(b"\t")
    }

    #[inline]
    fn write_newline(&mut self) -> Result<()> {
        self.write_bytes(b"\n")
    }

    /// Write an integer using itoa.
    #[inline]
    fn write_int<I: itoa::Integer>(&mut self, n: I) -> Result<()> {
        self.writer
            .write_all(self.itoa_buf.format(n).as_bytes())
            .map_err(GffError::Io)
    }

    /// Number of feature lines written so far (header excluded).
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the internal buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(GffError::Io)
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| GffError::Io(e.into_error()))
    }
}

/// Render a collection as GFF3 text, header included.
pub fn to_gff3_string(collection: &FeatureCollection, seq_id: &str) -> Result<String> {
    let mut writer = GffWriter::new(Vec::new());
    writer.write_collection(collection, seq_id)?;
    let bytes = writer.into_inner()?;
    // Every byte written came from &str inputs or ASCII digits.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
