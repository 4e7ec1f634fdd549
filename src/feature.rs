//! Core feature types for GFF3 annotation records.

use crate::attributes::{parse_attributes, AttributeMap};
use crate::config::is_lenient_phase;
use crate::gff::Result;
use std::cmp::Ordering;
use std::fmt;

/// A stored feature bound.
/// Uses 0-based, half-open coordinates, so a GFF3 line spanning `1000..=9000`
/// is stored as `(999, 9000)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    pub start: u64,
    pub end: u64,
}

impl Bound {
    /// Create a new bound.
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Returns the length of the bound.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the bound has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 1-based inclusive start, as written in column 4. `None` when the
    /// stored start is `u64::MAX`.
    #[inline]
    pub fn one_based_start(&self) -> Option<u64> {
        self.start.checked_add(1)
    }
}

impl From<(u64, u64)> for Bound {
    fn from((start, end): (u64, u64)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Strand orientation as defined for column 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    /// `.`: the feature is not stranded.
    Unstranded,
    /// `?`: stranded, but the strand is unknown.
    Unknown,
}

impl Strand {
    /// Parse a strand column. Returns `None` for anything outside `+ - . ?`.
    pub fn from_field(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            "." => Some(Strand::Unstranded),
            "?" => Some(Strand::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
            Strand::Unstranded => write!(f, "."),
            Strand::Unknown => write!(f, "?"),
        }
    }
}

/// Reading-frame phase from column 8.
///
/// Decided purely from the column text: `.` is [`Phase::Absent`], an integer
/// literal is [`Phase::Value`]. Which integers are accepted depends on
/// [`crate::config::is_lenient_phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Absent,
    Value(u8),
}

impl Phase {
    /// Parse a phase column, returning `None` if the text is not a valid phase.
    pub fn from_field(s: &str) -> Option<Self> {
        if s == "." {
            return Some(Phase::Absent);
        }
        if is_lenient_phase() {
            // Canonical digits only, so the value writes back as read
            let canonical = !s.is_empty()
                && s.bytes().all(|b| b.is_ascii_digit())
                && (s == "0" || !s.starts_with('0'));
            return if canonical {
                s.parse().ok().map(Phase::Value)
            } else {
                None
            };
        }
        match s {
            "0" => Some(Phase::Value(0)),
            "1" => Some(Phase::Value(1)),
            "2" => Some(Phase::Value(2)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Phase::Absent)
    }

    #[inline]
    pub fn value(&self) -> Option<u8> {
        match self {
            Phase::Absent => None,
            Phase::Value(v) => Some(*v),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Absent => write!(f, "."),
            Phase::Value(v) => write!(f, "{}", v),
        }
    }
}

/// Flat per-feature metadata kept alongside the bounds.
///
/// Every column except seqid, start and end. A field left as `None` is
/// written back as `.`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureMetadata {
    pub source: Option<String>,
    pub feature_type: Option<String>,
    pub score: Option<String>,
    pub strand: Option<String>,
    pub phase: Phase,
    /// Raw, unsplit column 9.
    pub attributes: Option<String>,
}

impl FeatureMetadata {
    /// Typed view of the strand column.
    pub fn strand_kind(&self) -> Option<Strand> {
        self.strand.as_deref().and_then(Strand::from_field)
    }

    /// Numeric score, or `None` if missing, `.` or not a float.
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_deref().and_then(|s| s.parse().ok())
    }

    /// Parse the raw attribute column on demand.
    pub fn parsed_attributes(&self) -> Result<AttributeMap> {
        match self.attributes.as_deref() {
            Some(raw) => parse_attributes(raw),
            None => Ok(AttributeMap::default()),
        }
    }
}

/// One stored feature: one or more bounds sharing a metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub bounds: Vec<Bound>,
    pub metadata: FeatureMetadata,
}

impl Feature {
    pub fn new(bounds: Vec<Bound>, metadata: FeatureMetadata) -> Self {
        Self { bounds, metadata }
    }
}

/// A single parsed GFF3 data line.
///
/// Coordinates are kept exactly as read (1-based, inclusive); [`Self::bound`]
/// gives the stored half-open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub source: String,
    pub feature_type: String,
    pub start: u64,
    pub end: u64,
    /// Raw score text; `.` or a float literal, not validated.
    pub score: String,
    /// Raw strand text; see [`Self::strand_kind`] for the typed view.
    pub strand: String,
    pub phase: Phase,
    /// Raw attribute column.
    pub attributes: String,
}

impl FeatureRecord {
    /// The stored 0-based half-open bound `(start - 1, end)`.
    #[inline]
    pub fn bound(&self) -> Bound {
        Bound::new(self.start.saturating_sub(1), self.end)
    }

    /// Feature length in base pairs (1-based inclusive coordinates).
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start.saturating_sub(1))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn strand_kind(&self) -> Option<Strand> {
        Strand::from_field(&self.strand)
    }

    pub fn score_value(&self) -> Option<f64> {
        self.score.parse().ok()
    }

    /// Parse the attribute column on demand.
    pub fn parsed_attributes(&self) -> Result<AttributeMap> {
        parse_attributes(&self.attributes)
    }

    /// Split into the `(bounds, metadata)` pair handed to a feature sink.
    pub fn into_parts(self) -> (Vec<Bound>, FeatureMetadata) {
        let bounds = vec![self.bound()];
        let metadata = FeatureMetadata {
            source: Some(self.source),
            feature_type: Some(self.feature_type),
            score: Some(self.score),
            strand: Some(self.strand),
            phase: self.phase,
            attributes: Some(self.attributes),
        };
        (bounds, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn record(start: u64, end: u64) -> FeatureRecord {
        FeatureRecord {
            source: ".".to_string(),
            feature_type: "gene".to_string(),
            start,
            end,
            score: ".".to_string(),
            strand: "+".to_string(),
            phase: Phase::Absent,
            attributes: "ID=gene00001;Name=EDEN".to_string(),
        }
    }

    #[test]
    fn test_record_bound_conversion() {
        let rec = record(1000, 9000);
        assert_eq!(rec.bound(), Bound::new(999, 9000));
        assert_eq!(rec.bound().one_based_start(), Some(1000));
        assert_eq!(rec.len(), 8001);
        assert_eq!(rec.bound().len(), 8001);
    }

    #[test]
    fn test_extreme_coordinates() {
        let rec = record(1, u64::MAX);
        assert_eq!(rec.len(), u64::MAX);
        assert_eq!(record(u64::MAX, u64::MAX).len(), 1);
        assert!(!rec.is_empty());

        assert_eq!(Bound::new(u64::MAX - 1, u64::MAX).one_based_start(), Some(u64::MAX));
        assert_eq!(Bound::new(u64::MAX, u64::MAX).one_based_start(), None);
    }

    #[test]
    fn test_into_parts() {
        let (bounds, md) = record(1000, 9000).into_parts();
        assert_eq!(bounds, vec![Bound::new(999, 9000)]);
        assert_eq!(md.source.as_deref(), Some("."));
        assert_eq!(md.feature_type.as_deref(), Some("gene"));
        assert_eq!(md.score.as_deref(), Some("."));
        assert_eq!(md.strand.as_deref(), Some("+"));
        assert!(md.phase.is_absent());
        assert_eq!(md.attributes.as_deref(), Some("ID=gene00001;Name=EDEN"));
    }

    #[test]
    fn test_strand_from_field() {
        assert_eq!(Strand::from_field("+"), Some(Strand::Plus));
        assert_eq!(Strand::from_field("-"), Some(Strand::Minus));
        assert_eq!(Strand::from_field("."), Some(Strand::Unstranded));
        assert_eq!(Strand::from_field("?"), Some(Strand::Unknown));
        assert_eq!(Strand::from_field("x"), None);
        assert_eq!(Strand::Unknown.to_string(), "?");
    }

    #[test]
    #[serial]
    fn test_phase_strict() {
        crate::config::set_lenient_phase(false);
        assert_eq!(Phase::from_field("."), Some(Phase::Absent));
        assert_eq!(Phase::from_field("0"), Some(Phase::Value(0)));
        assert_eq!(Phase::from_field("2"), Some(Phase::Value(2)));
        assert_eq!(Phase::from_field("5"), None);
        assert_eq!(Phase::from_field("abc"), None);
        assert_eq!(Phase::from_field(""), None);
    }

    #[test]
    #[serial]
    fn test_phase_lenient() {
        crate::config::set_lenient_phase(true);
        assert_eq!(Phase::from_field("5"), Some(Phase::Value(5)));
        assert_eq!(Phase::from_field("abc"), None);
        assert_eq!(Phase::from_field("300"), None);
        assert_eq!(Phase::from_field("0"), Some(Phase::Value(0)));
        assert_eq!(Phase::from_field("10"), Some(Phase::Value(10)));
        for text in ["+1", "01", "007", "00", " 1", ""] {
            assert_eq!(Phase::from_field(text), None, "{text:?}");
        }
        crate::config::set_lenient_phase(false);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Absent.to_string(), ".");
        assert_eq!(Phase::Value(1).to_string(), "1");
        assert_eq!(Phase::Value(1).value(), Some(1));
    }

    #[test]
    fn test_metadata_typed_views() {
        let md = FeatureMetadata {
            score: Some("1.8".to_string()),
            strand: Some("-".to_string()),
            ..Default::default()
        };
        assert_eq!(md.score_value(), Some(1.8));
        assert_eq!(md.strand_kind(), Some(Strand::Minus));
        assert!(md.parsed_attributes().unwrap().is_empty());
    }

    #[test]
    fn test_bound_ordering() {
        let mut bounds = [Bound::new(50, 60), Bound::new(10, 30), Bound::new(10, 20)];
        bounds.sort();
        assert_eq!(bounds[0], Bound::new(10, 20));
        assert_eq!(bounds[2], Bound::new(50, 60));
    }
}
