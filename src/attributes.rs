//! Column 9 attribute parsing.
//!
//! Attributes are `tag=value` pairs separated by `;`. Tags from the GFF3
//! predefined vocabulary are normalised through a fixed rename table; every
//! other tag is kept verbatim. Comma-separated multi-values stay a single
//! string; use [`split_values`] when the individual values are needed.

use crate::config::is_lenient_attributes;
use crate::gff::{GffError, Result};
use indexmap::IndexMap;

/// Ordered tag -> value mapping. Insertion order follows the column; a
/// repeated tag keeps its first position and its last value.
pub type AttributeMap = IndexMap<String, String>;

/// Predefined GFF3 tags and the key each one is stored under.
const VOCABULARY: &[(&str, &str)] = &[
    ("ID", "ID"),
    ("Name", "Name"),
    ("Alias", "Alias"),
    ("Parent", "Parent"),
    ("Target", "Target"),
    ("Gap", "Gap"),
    ("Derives_from", "Derives_from"),
    ("Note", "note"),
    ("Dbxref", "db_xref"),
    ("Ontology_term", "Ontology_term"),
    ("Is_circular", "Is_circular"),
];

/// Map a tag as written in a file to its stored key.
#[inline]
pub fn canonical_tag(tag: &str) -> &str {
    VOCABULARY
        .iter()
        .find(|(file_tag, _)| *file_tag == tag)
        .map_or(tag, |(_, key)| *key)
}

/// Map a stored key back to the tag written in a file.
#[inline]
pub fn output_tag(key: &str) -> &str {
    VOCABULARY
        .iter()
        .find(|(_, stored)| *stored == key)
        .map_or(key, |(file_tag, _)| *file_tag)
}

/// Check whether a file tag belongs to the predefined vocabulary.
pub fn is_predefined(tag: &str) -> bool {
    VOCABULARY.iter().any(|(file_tag, _)| *file_tag == tag)
}

/// Parse an attribute column into an [`AttributeMap`].
///
/// Every `;`-separated segment must contain exactly one `=`. An empty
/// segment (from a trailing `;` or `;;`) and a bare `.` column are malformed
/// unless [`crate::config::is_lenient_attributes`] is set, in which case empty
/// segments are skipped and `.` yields an empty map.
///
/// # Example
///
/// ```
/// use gffkit::attributes::parse_attributes;
///
/// let attrs = parse_attributes("ID=gene1;Name=EDEN").unwrap();
/// assert_eq!(attrs["ID"], "gene1");
/// assert_eq!(attrs["Name"], "EDEN");
///
/// assert!(parse_attributes("ID=gene1;BadSegmentNoEquals").is_err());
/// ```
pub fn parse_attributes(raw: &str) -> Result<AttributeMap> {
    let lenient = is_lenient_attributes();
    let mut attributes = AttributeMap::new();

    if lenient && raw == "." {
        return Ok(attributes);
    }

    for segment in raw.split(';') {
        if lenient && segment.is_empty() {
            continue;
        }

        let (tag, value) = match segment.split_once('=') {
            Some((tag, value)) if !value.contains('=') => (tag, value),
            _ => {
                return Err(GffError::MalformedAttribute {
                    segment: segment.to_string(),
                })
            }
        };

        attributes.insert(canonical_tag(tag).to_string(), value.to_string());
    }

    Ok(attributes)
}

/// Format an [`AttributeMap`] back into column 9 text.
///
/// Stored keys are renamed to their file tags. An empty map formats as `.`.
pub fn format_attributes(attributes: &AttributeMap) -> String {
    if attributes.is_empty() {
        return ".".to_string();
    }
    attributes
        .iter()
        .map(|(key, value)| format!("{}={}", output_tag(key), value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Split a comma-joined multi-value (e.g. several `Parent` IDs).
pub fn split_values(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').filter(|v| !v.is_empty())
}
