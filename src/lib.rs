//! Reading and writing integer copy-number segment calls as
//! tab-delimited text.
//!
//! A segments file holds an optional `@RG` metadata line naming the
//! sample, one header row, and one row per `CopyNumberSegment`:
//!
//! ```
//! use cnv_segments::{CopyNumberSegment, FormatConfig};
//!
//! let mut seg = CopyNumberSegment::new("chr1", 1000, 2000, 5, 2, 2);
//! assert_eq!(seg.to_row(3), "chr1\t1000\t2000\t5\t2\t2\t.\t.\t.\t.");
//!
//! seg.set_exact_quality(12.5).unwrap();
//! let config = FormatConfig::new(3);
//! assert_eq!(config.format_row(&seg), "chr1\t1000\t2000\t5\t2\t2\t.\t12.500\t.\t.");
//! ```

pub mod collection;
pub mod columns;
pub mod config;
pub mod mmap;
pub mod parser;
pub mod segment;
pub mod writer;

pub use self::collection::SegmentCollection;
pub use self::config::FormatConfig;
pub use self::segment::{CopyNumberSegment, QualityKind, SegmentError};
