use std::fmt::Write;

/// Column names used by segments files. The order of
/// `SEGMENT_COLUMNS` is the order of the fields in every row.
pub const CONTIG_COLUMN_NAME: &str = "CONTIG";
pub const START_COLUMN_NAME: &str = "START";
pub const END_COLUMN_NAME: &str = "END";
pub const NUM_SPANNING_INTERVALS_COLUMN_NAME: &str = "NUM_INTERVALS";
pub const CALL_COPY_NUMBER_COLUMN_NAME: &str = "CALL_COPY_NUMBER";
pub const BASELINE_COPY_NUMBER_COLUMN_NAME: &str = "BASELINE_COPY_NUMBER";
pub const SOME_QUALITY_COLUMN_NAME: &str = "QUALITY_SOME_CALLED";
pub const EXACT_QUALITY_COLUMN_NAME: &str = "QUALITY_ALL_CALLED";
pub const START_QUALITY_COLUMN_NAME: &str = "QUALITY_START";
pub const END_QUALITY_COLUMN_NAME: &str = "QUALITY_END";

pub const COLUMN_COUNT: usize = 10;

pub const SEGMENT_COLUMNS: [&str; COLUMN_COUNT] = [
    CONTIG_COLUMN_NAME,
    START_COLUMN_NAME,
    END_COLUMN_NAME,
    NUM_SPANNING_INTERVALS_COLUMN_NAME,
    CALL_COPY_NUMBER_COLUMN_NAME,
    BASELINE_COPY_NUMBER_COLUMN_NAME,
    SOME_QUALITY_COLUMN_NAME,
    EXACT_QUALITY_COLUMN_NAME,
    START_QUALITY_COLUMN_NAME,
    END_QUALITY_COLUMN_NAME,
];

/// Write the tab-delimited header row, without a line terminator
pub fn write_header<T: Write>(stream: &mut T) -> std::fmt::Result {
    for (i, name) in SEGMENT_COLUMNS.iter().enumerate() {
        if i != 0 {
            stream.write_char('\t')?;
        }
        stream.write_str(name)?;
    }
    Ok(())
}

pub fn header_row() -> String {
    SEGMENT_COLUMNS.join("\t")
}

/// Returns true if the given fields are exactly the segment columns,
/// in order
pub fn is_header<I>(fields: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut fields = fields.into_iter();
    let matched = SEGMENT_COLUMNS.iter().all(|name| {
        fields
            .next()
            .map(|f| f.as_ref() == name.as_bytes())
            .unwrap_or(false)
    });
    matched && fields.next().is_none()
}
