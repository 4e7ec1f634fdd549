//! Streaming utilities for gffkit.
//!
//! This module provides the single-pass pieces the reader and writer are
//! built from:
//! - Blank-skipping line iteration
//! - Grouping of data lines into per-sequence runs
//! - Buffered GFF3 output formatting

pub mod grouping;
pub mod lines;
pub mod output;

pub use grouping::{nth_record, RecordGroup, RecordGroups};
pub use lines::{first_line_within, LineSource};
pub use output::{to_gff3_string, GffWriter, GFF3_DIRECTIVE};
