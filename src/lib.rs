//! gffkit: GFF3 reading, writing and sniffing
//!
//! This library turns GFF3 annotation streams into per-sequence feature
//! collections and writes them back out.
//!
//! # Features
//!
//! - **Streaming I/O**: data lines are grouped by sequence in a single pass
//! - **Strict validation**: column count, coordinates and phase are checked
//! - **Lossless round-trip**: written lines match the parsed input
//!
//! # Example
//!
//! ```rust
//! use gffkit::{gff, streaming::to_gff3_string};
//!
//! let content = "##gff-version 3\nctg123\t.\tgene\t1000\t9000\t.\t+\t.\tID=gene00001;Name=EDEN\n";
//! let (seq_id, features) = gff::GffReader::new(content.as_bytes()).read_record(1).unwrap();
//!
//! assert_eq!(seq_id, "ctg123");
//! assert_eq!(to_gff3_string(&features, &seq_id).unwrap(), content);
//! ```

pub mod attributes;
pub mod collection;
pub mod config;
pub mod feature;
pub mod gff;
pub mod sniff;
pub mod streaming;

// Re-export commonly used types
pub use attributes::{parse_attributes, AttributeMap};
pub use collection::{FeatureCollection, FeatureSink};
pub use feature::{Bound, Feature, FeatureMetadata, FeatureRecord, Phase, Strand};
pub use gff::{parse_line, read_all, read_collection, GffError, GffReader};
pub use sniff::{sniff, sniff_path, SniffReport};
pub use streaming::GffWriter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::attributes::{parse_attributes, AttributeMap};
    pub use crate::collection::{FeatureCollection, FeatureSink};
    pub use crate::feature::{Bound, Feature, FeatureMetadata, FeatureRecord, Phase, Strand};
    pub use crate::gff::{GffError, GffReader};
    pub use crate::sniff::sniff;
    pub use crate::streaming::GffWriter;
}
