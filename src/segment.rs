use std::fmt::{self, Write};

use lazy_static::lazy_static;
use regex::Regex;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::columns;

/// Number of decimal places used for quality scores when no precision
/// is given.
pub const DEFAULT_PHRED_DECIMALS: usize = 2;

/// Marker written in place of a quality that hasn't been computed.
pub const MISSING_VALUE: &str = ".";

/// Written for a quality that is not a number
pub const NAN_VALUE: &str = "nan";

/// The four quality scores attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum QualityKind {
    /// Confidence that at least one breakpoint in the segment is real
    Some,
    /// Confidence that the whole segment is called exactly
    Exact,
    /// Confidence in the start breakpoint
    Start,
    /// Confidence in the end breakpoint
    End,
}

impl QualityKind {
    pub const ALL: [QualityKind; 4] = [
        QualityKind::Some,
        QualityKind::Exact,
        QualityKind::Start,
        QualityKind::End,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            QualityKind::Some => columns::SOME_QUALITY_COLUMN_NAME,
            QualityKind::Exact => columns::EXACT_QUALITY_COLUMN_NAME,
            QualityKind::Start => columns::START_QUALITY_COLUMN_NAME,
            QualityKind::End => columns::END_QUALITY_COLUMN_NAME,
        }
    }
}

impl fmt::Display for QualityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// The contig name was empty, or contained a tab or line break,
    /// which would corrupt the row layout.
    MalformedContig(String),
    /// The sample name was empty, or contained a tab or line break,
    /// which would corrupt the metadata line.
    MalformedSampleName(String),
    /// A quality score can only be assigned once.
    QualityAlreadySet(QualityKind),
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::MalformedContig(contig) => write!(
                f,
                "Contig name {:?} is empty or contains a tab or line break",
                contig
            ),
            SegmentError::MalformedSampleName(name) => write!(
                f,
                "Sample name {:?} is empty or contains a tab or line break",
                name
            ),
            SegmentError::QualityAlreadySet(kind) => {
                write!(f, "Quality `{}` has already been set", kind)
            }
        }
    }
}

impl std::error::Error for SegmentError {}

/// A constant copy-number genomic interval ("segment") along with its
/// quality metrics.
///
/// The coordinates, interval count and copy numbers are fixed at
/// construction. The qualities start out absent and are filled in
/// later, each at most once, by whatever computes them.
///
/// The `Display` implementation produces the tab-delimited row; the
/// precision flag selects the number of decimals used for qualities,
/// e.g. `format!("{:.3}", segment)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CopyNumberSegment {
    contig: String,
    start: i64,
    end: i64,
    num_spanning_intervals: usize,
    call_copy_number: u32,
    baseline_copy_number: u32,
    some_quality: Option<f64>,
    exact_quality: Option<f64>,
    start_quality: Option<f64>,
    end_quality: Option<f64>,
}

lazy_static! {
    static ref FIELD_RE: Regex = Regex::new(r"^[^\t\r\n]+$").unwrap();
}

/// Returns true if `contig` can be written as a single row field
pub fn is_valid_contig(contig: &str) -> bool {
    FIELD_RE.is_match(contig)
}

/// Returns true if `name` can be written as the `SM` tag of the
/// sample metadata line
pub fn is_valid_sample_name(name: &str) -> bool {
    FIELD_RE.is_match(name)
}

impl CopyNumberSegment {
    /// Create a segment with all qualities absent. Nothing is
    /// validated; use `try_new` to reject contig names that would
    /// break the row format.
    pub fn new<S: Into<String>>(
        contig: S,
        start: i64,
        end: i64,
        num_spanning_intervals: usize,
        call_copy_number: u32,
        baseline_copy_number: u32,
    ) -> Self {
        CopyNumberSegment {
            contig: contig.into(),
            start,
            end,
            num_spanning_intervals,
            call_copy_number,
            baseline_copy_number,
            some_quality: None,
            exact_quality: None,
            start_quality: None,
            end_quality: None,
        }
    }

    pub fn try_new<S: Into<String>>(
        contig: S,
        start: i64,
        end: i64,
        num_spanning_intervals: usize,
        call_copy_number: u32,
        baseline_copy_number: u32,
    ) -> Result<Self, SegmentError> {
        let contig = contig.into();
        if !is_valid_contig(&contig) {
            return Err(SegmentError::MalformedContig(contig));
        }
        Ok(Self::new(
            contig,
            start,
            end,
            num_spanning_intervals,
            call_copy_number,
            baseline_copy_number,
        ))
    }

    #[inline]
    pub fn contig(&self) -> &str {
        &self.contig
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    #[inline]
    pub fn num_spanning_intervals(&self) -> usize {
        self.num_spanning_intervals
    }

    #[inline]
    pub fn call_copy_number(&self) -> u32 {
        self.call_copy_number
    }

    #[inline]
    pub fn baseline_copy_number(&self) -> u32 {
        self.baseline_copy_number
    }

    /// True if the called copy number differs from the baseline
    pub fn is_variant(&self) -> bool {
        self.call_copy_number != self.baseline_copy_number
    }

    pub fn some_quality(&self) -> Option<f64> {
        self.some_quality
    }

    pub fn exact_quality(&self) -> Option<f64> {
        self.exact_quality
    }

    pub fn start_quality(&self) -> Option<f64> {
        self.start_quality
    }

    pub fn end_quality(&self) -> Option<f64> {
        self.end_quality
    }

    pub fn quality(&self, kind: QualityKind) -> Option<f64> {
        match kind {
            QualityKind::Some => self.some_quality,
            QualityKind::Exact => self.exact_quality,
            QualityKind::Start => self.start_quality,
            QualityKind::End => self.end_quality,
        }
    }

    fn quality_slot(&mut self, kind: QualityKind) -> &mut Option<f64> {
        match kind {
            QualityKind::Some => &mut self.some_quality,
            QualityKind::Exact => &mut self.exact_quality,
            QualityKind::Start => &mut self.start_quality,
            QualityKind::End => &mut self.end_quality,
        }
    }

    /// Assign a quality score. Fails without modifying the segment if
    /// the quality is already present.
    pub fn set_quality(
        &mut self,
        kind: QualityKind,
        value: f64,
    ) -> Result<(), SegmentError> {
        let slot = self.quality_slot(kind);
        if slot.is_some() {
            return Err(SegmentError::QualityAlreadySet(kind));
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn set_some_quality(&mut self, value: f64) -> Result<(), SegmentError> {
        self.set_quality(QualityKind::Some, value)
    }

    pub fn set_exact_quality(&mut self, value: f64) -> Result<(), SegmentError> {
        self.set_quality(QualityKind::Exact, value)
    }

    pub fn set_start_quality(&mut self, value: f64) -> Result<(), SegmentError> {
        self.set_quality(QualityKind::Start, value)
    }

    pub fn set_end_quality(&mut self, value: f64) -> Result<(), SegmentError> {
        self.set_quality(QualityKind::End, value)
    }

    /// The header row matching `to_row`; see `columns::header_row`
    pub fn header_row() -> String {
        columns::header_row()
    }

    /// Write the tab-delimited row for this segment, without a line
    /// terminator.
    pub fn write_row<W: Write>(
        &self,
        stream: &mut W,
        phred_decimals: usize,
    ) -> fmt::Result {
        write!(
            stream,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.contig,
            self.start,
            self.end,
            self.num_spanning_intervals,
            self.call_copy_number,
            self.baseline_copy_number
        )?;

        for kind in QualityKind::ALL.iter() {
            stream.write_char('\t')?;
            write_quality(stream, self.quality(*kind), phred_decimals)?;
        }

        Ok(())
    }

    pub fn to_row(&self, phred_decimals: usize) -> String {
        let mut row = String::new();
        // writing to a String can't fail
        let _ = self.write_row(&mut row, phred_decimals);
        row
    }
}

impl fmt::Display for CopyNumberSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phred_decimals = f.precision().unwrap_or(DEFAULT_PHRED_DECIMALS);
        self.write_row(f, phred_decimals)
    }
}

/// Write a quality as a fixed-point decimal with `phred_decimals`
/// digits after the point, or `.` if it's absent.
///
/// Rounding is done on the exact binary value of the float, and exact
/// ties round half to even: at zero decimals 0.5 becomes "0" and 2.5
/// becomes "2", at two decimals 0.125 becomes "0.12". NaN is written
/// as `nan`, infinities as `inf` and `-inf`.
pub fn write_quality<W: Write>(
    stream: &mut W,
    quality: Option<f64>,
    phred_decimals: usize,
) -> fmt::Result {
    match quality {
        Some(q) if q.is_nan() => stream.write_str(NAN_VALUE),
        Some(q) => write!(stream, "{:.*}", phred_decimals, q),
        None => stream.write_str(MISSING_VALUE),
    }
}

pub fn format_quality(quality: Option<f64>, phred_decimals: usize) -> String {
    let mut result = String::new();
    let _ = write_quality(&mut result, quality, phred_decimals);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chr1_segment() -> CopyNumberSegment {
        CopyNumberSegment::new("chr1", 1000, 2000, 5, 2, 2)
    }

    #[test]
    fn new_segment_has_no_qualities() {
        let seg = chr1_segment();
        for kind in QualityKind::ALL.iter() {
            assert_eq!(None, seg.quality(*kind));
        }
        assert_eq!(seg.to_row(3), "chr1\t1000\t2000\t5\t2\t2\t.\t.\t.\t.");
    }

    #[test]
    fn row_after_setting_exact_quality() {
        let mut seg = chr1_segment();
        seg.set_exact_quality(12.5).unwrap();
        assert_eq!(
            seg.to_row(3),
            "chr1\t1000\t2000\t5\t2\t2\t.\t12.500\t.\t."
        );
    }

    #[test]
    fn row_matches_header_layout() {
        let mut seg = CopyNumberSegment::new("chrX", -15, 0, 0, 0, 1);
        seg.set_some_quality(1.0).unwrap();
        seg.set_end_quality(99.999).unwrap();

        let row = seg.to_row(2);
        let header = CopyNumberSegment::header_row();
        let fields: Vec<_> = row.split('\t').collect();
        assert_eq!(fields.len(), header.split('\t').count());
        assert_eq!(fields.len(), columns::COLUMN_COUNT);
        assert_eq!(
            fields,
            vec!["chrX", "-15", "0", "0", "0", "1", "1.00", ".", ".", "100.00"]
        );
    }

    #[test]
    fn to_row_is_idempotent() {
        let mut seg = chr1_segment();
        seg.set_start_quality(7.25).unwrap();
        let first = seg.to_row(2);
        let second = seg.to_row(2);
        assert_eq!(first, second);
    }

    #[test]
    fn quality_precision() {
        assert_eq!(format_quality(Some(3.14159), 2), "3.14");
        assert_eq!(format_quality(Some(3.14159), 0), "3");
        assert_eq!(format_quality(Some(3.0), 4), "3.0000");
        assert_eq!(format_quality(None, 2), ".");
        assert_eq!(format_quality(None, 0), ".");
    }

    #[test]
    fn quality_ties_round_half_to_even() {
        assert_eq!(format_quality(Some(0.5), 0), "0");
        assert_eq!(format_quality(Some(1.5), 0), "2");
        assert_eq!(format_quality(Some(2.5), 0), "2");
        assert_eq!(format_quality(Some(0.125), 2), "0.12");
        assert_eq!(format_quality(Some(0.375), 2), "0.38");
    }

    #[test]
    fn quality_non_finite_values() {
        assert_eq!(format_quality(Some(f64::NAN), 2), "nan");
        assert_eq!(format_quality(Some(-f64::NAN), 0), "nan");
        assert_eq!(format_quality(Some(f64::INFINITY), 2), "inf");
        assert_eq!(format_quality(Some(f64::NEG_INFINITY), 2), "-inf");
        assert_eq!(format_quality(Some(-0.0), 2), "-0.00");

        let mut seg = CopyNumberSegment::new("chr1", 1000, 2000, 5, 2, 2);
        seg.set_exact_quality(f64::NAN).unwrap();
        assert_eq!(seg.to_row(2), "chr1\t1000\t2000\t5\t2\t2\t.\tnan\t.\t.");
    }

    #[test]
    fn display_uses_precision_flag() {
        let mut seg = chr1_segment();
        seg.set_some_quality(3.14159).unwrap();

        assert_eq!(
            format!("{}", seg),
            "chr1\t1000\t2000\t5\t2\t2\t3.14\t.\t.\t."
        );
        assert_eq!(
            format!("{:.4}", seg),
            "chr1\t1000\t2000\t5\t2\t2\t3.1416\t.\t.\t."
        );
        assert_eq!(format!("{:.0}", seg), seg.to_row(0));
    }

    #[test]
    fn qualities_are_set_once() {
        let mut seg = chr1_segment();
        assert!(seg.set_quality(QualityKind::Start, 10.0).is_ok());
        assert_eq!(
            seg.set_quality(QualityKind::Start, 20.0),
            Err(SegmentError::QualityAlreadySet(QualityKind::Start))
        );
        assert_eq!(seg.start_quality(), Some(10.0));

        // the other qualities are independent
        assert!(seg.set_end_quality(30.0).is_ok());
        assert_eq!(seg.end_quality(), Some(30.0));
        assert_eq!(seg.some_quality(), None);
        assert_eq!(seg.exact_quality(), None);
    }

    #[test]
    fn contig_with_tab_is_not_corrected() {
        let seg = CopyNumberSegment::new("chr\t1", 1, 2, 1, 2, 2);
        assert_eq!(seg.to_row(2).split('\t').count(), 11);
    }

    #[test]
    fn checked_construction_rejects_malformed_contigs() {
        assert!(CopyNumberSegment::try_new("chr1", 1, 2, 1, 2, 2).is_ok());
        assert!(CopyNumberSegment::try_new("HLA-A*01:01", 1, 2, 1, 2, 2).is_ok());

        for bad in &["", "chr\t1", "chr1\n", "chr1\r\n"] {
            assert_eq!(
                CopyNumberSegment::try_new(*bad, 1, 2, 1, 2, 2),
                Err(SegmentError::MalformedContig(bad.to_string()))
            );
        }
    }

    #[test]
    fn variant_calls() {
        assert!(!chr1_segment().is_variant());
        assert!(CopyNumberSegment::new("chr1", 1, 2, 1, 3, 2).is_variant());
        assert!(CopyNumberSegment::new("chrY", 1, 2, 1, 0, 1).is_variant());
    }
}
