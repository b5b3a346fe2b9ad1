use std::io;

use fnv::FnvHashMap;

use crate::config::FormatConfig;
use crate::segment::CopyNumberSegment;
use crate::writer::SegmentWriter;

/// The segments called for one sample, in file order. There's no
/// sorting or deduplication; the segments are kept as they're pushed.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SegmentCollection {
    pub sample_name: Option<String>,
    pub segments: Vec<CopyNumberSegment>,
}

impl SegmentCollection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_sample_name<S: Into<String>>(sample_name: S) -> Self {
        SegmentCollection {
            sample_name: Some(sample_name.into()),
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: CopyNumberSegment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CopyNumberSegment> {
        self.segments.iter()
    }

    /// Number of segments on each contig
    pub fn contig_counts(&self) -> FnvHashMap<&str, usize> {
        let mut counts = FnvHashMap::default();
        for seg in self.segments.iter() {
            *counts.entry(seg.contig()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of segments whose call differs from the baseline
    pub fn num_called_variants(&self) -> usize {
        self.segments.iter().filter(|s| s.is_variant()).count()
    }

    /// Write the collection as a segments file, including the sample
    /// metadata line if there is a sample name. Returns the inner
    /// writer; a sample name that can't be written on one line is an
    /// `InvalidInput` error.
    pub fn write_to<W: io::Write>(
        &self,
        inner: W,
        config: FormatConfig,
    ) -> io::Result<W> {
        let mut writer = SegmentWriter::new(inner, config);
        if let Some(name) = &self.sample_name {
            writer = writer
                .with_sample_name(name.as_str())
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        }
        writer.write_all(self.segments.iter())?;
        let (_, inner) = writer.finish()?;
        Ok(inner)
    }
}

impl Extend<CopyNumberSegment> for SegmentCollection {
    fn extend<I: IntoIterator<Item = CopyNumberSegment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

impl std::iter::FromIterator<CopyNumberSegment> for SegmentCollection {
    fn from_iter<I: IntoIterator<Item = CopyNumberSegment>>(iter: I) -> Self {
        SegmentCollection {
            sample_name: None,
            segments: iter.into_iter().collect(),
        }
    }
}
