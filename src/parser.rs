pub mod error;

pub use self::error::{
    ParseError, ParseFieldError, ParserTolerance, SegmentFieldResult,
    SegmentResult,
};

use std::io;

use bstr::ByteSlice;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::digit1,
    combinator::{all_consuming, map, map_opt, opt, recognize},
    sequence::pair,
    IResult,
};
use tracing::{debug, trace};

use crate::collection::SegmentCollection;
use crate::columns;
use crate::segment::{CopyNumberSegment, QualityKind};

/// A single parsed line of a segments file
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentLine {
    /// An `@`-prefixed metadata line; holds the sample name if the
    /// line is a read group with an `SM` tag.
    Metadata(Option<String>),
    Header,
    Segment(CopyNumberSegment),
}

fn parse_ascii<T: std::str::FromStr>(bs: &[u8]) -> Option<T> {
    bs.to_str().ok()?.parse().ok()
}

fn signed_int(i: &[u8]) -> IResult<&[u8], i64> {
    map_opt(recognize(pair(opt(tag("-")), digit1)), parse_ascii::<i64>)(i)
}

fn unsigned_usize(i: &[u8]) -> IResult<&[u8], usize> {
    map_opt(digit1, parse_ascii::<usize>)(i)
}

fn unsigned_u32(i: &[u8]) -> IResult<&[u8], u32> {
    map_opt(digit1, parse_ascii::<u32>)(i)
}

// A number is tried first, so that e.g. ".5" isn't mistaken for the
// missing value marker
fn quality(i: &[u8]) -> IResult<&[u8], Option<f64>> {
    let value = map(map_opt(is_not("\t"), parse_ascii::<f64>), Some);
    let missing = map(tag("."), |_| None);
    alt((value, missing))(i)
}

fn parse_field<'a, O, F>(
    field: Option<&'a [u8]>,
    column: &'static str,
    parser: F,
) -> SegmentFieldResult<O>
where
    F: Fn(&'a [u8]) -> IResult<&'a [u8], O>,
{
    let field = field.ok_or(ParseFieldError::MissingFields)?;
    all_consuming(parser)(field)
        .map(|(_, value)| value)
        .map_err(|_| ParseFieldError::InvalidField(column))
}

fn parse_contig(field: Option<&[u8]>) -> SegmentFieldResult<String> {
    let field = field.ok_or(ParseFieldError::MissingFields)?;
    if field.is_empty() {
        return Err(ParseFieldError::InvalidField(
            columns::CONTIG_COLUMN_NAME,
        ));
    }
    Ok(field.to_str()?.to_string())
}

/// Parse a segment from an iterator over the tab-delimited fields of
/// a row. The iterator must produce exactly ten fields.
pub fn parse_segment<'a, I>(mut input: I) -> SegmentFieldResult<CopyNumberSegment>
where
    I: Iterator<Item = &'a [u8]>,
{
    use columns::*;

    let contig = parse_contig(input.next())?;
    let start = parse_field(input.next(), START_COLUMN_NAME, signed_int)?;
    let end = parse_field(input.next(), END_COLUMN_NAME, signed_int)?;
    let num_spanning_intervals = parse_field(
        input.next(),
        NUM_SPANNING_INTERVALS_COLUMN_NAME,
        unsigned_usize,
    )?;
    let call_copy_number =
        parse_field(input.next(), CALL_COPY_NUMBER_COLUMN_NAME, unsigned_u32)?;
    let baseline_copy_number = parse_field(
        input.next(),
        BASELINE_COPY_NUMBER_COLUMN_NAME,
        unsigned_u32,
    )?;

    let mut segment = CopyNumberSegment::new(
        contig,
        start,
        end,
        num_spanning_intervals,
        call_copy_number,
        baseline_copy_number,
    );

    for kind in QualityKind::ALL.iter() {
        let value = parse_field(input.next(), kind.column_name(), quality)?;
        if let Some(q) = value {
            // every quality is still absent on a fresh segment
            let _ = segment.set_quality(*kind, q);
        }
    }

    if input.next().is_some() {
        return Err(ParseFieldError::ExtraFields);
    }

    Ok(segment)
}

/// Parse the sample name out of a metadata line's fields, if it's a
/// read group line
fn parse_metadata<'a, I>(mut fields: I) -> Option<String>
where
    I: Iterator<Item = &'a [u8]>,
{
    let record_type = fields.next()?;
    if record_type != b"@RG" {
        return None;
    }
    fields
        .find_map(|f| f.strip_prefix(b"SM:"))
        .and_then(|name| name.to_str().ok())
        .map(String::from)
}

#[derive(Debug, Clone, Default)]
pub struct SegmentParser {
    tolerance: ParserTolerance,
}

impl SegmentParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_tolerance(tolerance: ParserTolerance) -> Self {
        SegmentParser { tolerance }
    }

    pub fn tolerance(&self) -> ParserTolerance {
        self.tolerance
    }

    /// Classify and parse a single line; a trailing `\n` or `\r\n`
    /// is ignored. Any line starting with `@` is treated as metadata,
    /// see `parse_lines` for how rows with such contigs are read.
    pub fn parse_line(&self, line: &[u8]) -> SegmentResult<SegmentLine> {
        self.classify_line(line, false)
    }

    fn classify_line(
        &self,
        line: &[u8],
        seen_header: bool,
    ) -> SegmentResult<SegmentLine> {
        let line = line.trim_end_with(|c| c == '\n' || c == '\r');
        if line.is_empty() {
            return Err(ParseError::EmptyLine);
        }

        // metadata only precedes the header; after it, `@` starts a contig
        if !seen_header && line[0] == b'@' {
            let sample = parse_metadata(line.split_str(b"\t"));
            return Ok(SegmentLine::Metadata(sample));
        }

        if line.starts_with(columns::CONTIG_COLUMN_NAME.as_bytes())
            && line.split_str(b"\t").nth(1) == Some(columns::START_COLUMN_NAME.as_bytes())
        {
            if columns::is_header(line.split_str(b"\t")) {
                return Ok(SegmentLine::Header);
            }
            return Err(ParseError::header_mismatch(line));
        }

        parse_segment(line.split_str(b"\t"))
            .map(SegmentLine::Segment)
            .map_err(|err| ParseError::invalid_line(err, line))
    }

    /// Parse all lines of a segments file. Lines that fail to parse
    /// are skipped or returned as errors depending on the tolerance.
    pub fn parse_lines<I>(&self, lines: I) -> SegmentResult<SegmentCollection>
    where
        I: Iterator,
        I::Item: AsRef<[u8]>,
    {
        self.collect_lines(lines.map(Ok))
    }

    /// Parse a segments file from a reader. Read errors always end
    /// parsing, whatever the tolerance.
    pub fn parse_reader<R: io::BufRead>(
        &self,
        reader: R,
    ) -> SegmentResult<SegmentCollection> {
        self.collect_lines(reader.split(b'\n').map(|l| l.map_err(ParseError::from)))
    }

    fn collect_lines<I, L>(&self, lines: I) -> SegmentResult<SegmentCollection>
    where
        I: Iterator<Item = SegmentResult<L>>,
        L: AsRef<[u8]>,
    {
        let mut collection = SegmentCollection::default();
        let mut seen_header = false;

        for (line_no, line) in lines.enumerate() {
            let parsed = line
                .and_then(|l| self.classify_line(l.as_ref(), seen_header))
                .and_then(|l| match l {
                    SegmentLine::Segment(_) if !seen_header => {
                        Err(ParseError::MissingHeader)
                    }
                    l => Ok(l),
                });

            match parsed {
                Ok(SegmentLine::Metadata(Some(name))) => {
                    collection.sample_name = Some(name);
                }
                Ok(SegmentLine::Metadata(None)) => {}
                Ok(SegmentLine::Header) => {
                    seen_header = true;
                }
                Ok(SegmentLine::Segment(seg)) => {
                    trace!(line = line_no + 1, contig = seg.contig(), "parsed segment");
                    collection.push(seg);
                }
                Err(err) => {
                    if err.can_safely_continue(&self.tolerance) {
                        debug!(line = line_no + 1, error = %err, "skipping line");
                    } else {
                        return Err(err);
                    }
                }
            }
        }

        if !seen_header && collection.is_empty() && self.tolerance != ParserTolerance::IgnoreAll {
            return Err(ParseError::MissingHeader);
        }

        Ok(collection)
    }
}
