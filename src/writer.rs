use crate::columns;
use crate::config::FormatConfig;
use crate::segment::{is_valid_sample_name, CopyNumberSegment, SegmentError};

use std::fmt;
use std::io;

use tracing::debug;

/// Read group ID used on the sample metadata line
pub const READ_GROUP_ID: &str = "GATKCopyNumber";

// Write header
pub fn header_string() -> String {
    columns::header_row()
}

// Write segment
pub fn write_segment<T: fmt::Write>(
    seg: &CopyNumberSegment,
    config: &FormatConfig,
    stream: &mut T,
) -> fmt::Result {
    seg.write_row(stream, config.phred_decimals)
}

pub fn segment_string(seg: &CopyNumberSegment, config: &FormatConfig) -> String {
    let mut result = String::new();
    let _ = write_segment(seg, config, &mut result);
    result
}

pub fn sample_metadata_string(sample_name: &str) -> String {
    format!("@RG\tID:{}\tSM:{}", READ_GROUP_ID, sample_name)
}

/// Writes a complete segments file: an optional sample metadata line,
/// the header row, then one row per segment. Every line ends with
/// `\n`. The header is written before the first segment, or by
/// `finish` if there were no segments.
pub struct SegmentWriter<W: io::Write> {
    inner: W,
    config: FormatConfig,
    sample_name: Option<String>,
    line_buf: String,
    header_written: bool,
    rows_written: usize,
}

impl<W: io::Write> SegmentWriter<W> {
    pub fn new(inner: W, config: FormatConfig) -> Self {
        SegmentWriter {
            inner,
            config,
            sample_name: None,
            line_buf: String::with_capacity(128),
            header_written: false,
            rows_written: 0,
        }
    }

    /// Write a sample metadata line before the header. Fails if the
    /// name is empty or contains a tab or line break.
    pub fn with_sample_name<S: Into<String>>(
        mut self,
        sample_name: S,
    ) -> Result<Self, SegmentError> {
        let sample_name = sample_name.into();
        if !is_valid_sample_name(&sample_name) {
            return Err(SegmentError::MalformedSampleName(sample_name));
        }
        self.sample_name = Some(sample_name);
        Ok(self)
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_preamble(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        if let Some(name) = &self.sample_name {
            writeln!(self.inner, "{}", sample_metadata_string(name))?;
        }
        writeln!(self.inner, "{}", header_string())?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_segment(&mut self, seg: &CopyNumberSegment) -> io::Result<()> {
        self.write_preamble()?;

        self.line_buf.clear();
        write_segment(seg, &self.config, &mut self.line_buf)
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "formatting error"))?;
        self.line_buf.push('\n');
        self.inner.write_all(self.line_buf.as_bytes())?;

        self.rows_written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, segments: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a CopyNumberSegment>,
    {
        for seg in segments {
            self.write_segment(seg)?;
        }
        Ok(())
    }

    /// Flush the underlying writer, returning it along with the number
    /// of rows written
    pub fn finish(mut self) -> io::Result<(usize, W)> {
        self.write_preamble()?;
        self.inner.flush()?;
        debug!(
            rows = self.rows_written,
            phred_decimals = self.config.phred_decimals,
            "finished writing segments"
        );
        Ok((self.rows_written, self.inner))
    }
}
