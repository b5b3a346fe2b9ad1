use crate::{
    collection::SegmentCollection,
    parser::{ParserTolerance, SegmentParser},
};

use anyhow::Result;

use memmap::Mmap;

use std::fs::File;
use std::path::Path;

use bstr::ByteSlice;
use tracing::debug;

/// A segments file mapped into memory
pub struct MmapSegments {
    // zero-length files can't be mapped
    mmap: Option<Mmap>,
}

impl MmapSegments {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file)? })
        };
        debug!(
            path = %path.display(),
            bytes = mmap.as_ref().map(|m| m.len()).unwrap_or(0),
            "mapped segments file"
        );

        Ok(Self { mmap })
    }

    pub fn get_ref(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => mmap.as_ref(),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lines in the file, including metadata and header
    /// lines
    pub fn line_count(&self) -> usize {
        ByteSlice::lines(self.get_ref()).count()
    }

    /// Parse the entire file into a collection
    pub fn parse(&self, tolerance: ParserTolerance) -> Result<SegmentCollection> {
        let parser = SegmentParser::with_tolerance(tolerance);
        let collection = parser.parse_lines(ByteSlice::lines(self.get_ref()))?;
        debug!(
            segments = collection.len(),
            sample = ?collection.sample_name,
            "parsed segments file"
        );
        Ok(collection)
    }
}
