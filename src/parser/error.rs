use std::{error, fmt};

use bstr::ByteSlice;

pub type SegmentFieldResult<T> = Result<T, ParseFieldError>;
pub type SegmentResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserTolerance {
    IgnoreAll,
    Safe,
    Pedantic,
}

impl Default for ParserTolerance {
    fn default() -> Self {
        Self::Safe
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFieldError {
    /// A bytestring couldn't be parsed as a bytestring, can happen
    /// when the contents aren't UTF8.
    Utf8Error,
    /// A field was incorrectly formatted. Includes the column name
    /// of the field.
    InvalidField(&'static str),
    MissingFields,
    /// The row had more than the ten segment columns.
    ExtraFields,
}

impl From<bstr::Utf8Error> for ParseFieldError {
    fn from(_: bstr::Utf8Error) -> Self {
        ParseFieldError::Utf8Error
    }
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseFieldError as PFE;
        match self {
            PFE::Utf8Error => {
                write!(f, "Failed to parse a bytestring as a UTF-8 string")
            }
            PFE::InvalidField(field) => {
                write!(f, "Failed to parse field `{}`", field)
            }
            PFE::MissingFields => write!(f, "Line is missing required fields"),
            PFE::ExtraFields => {
                write!(f, "Line has more fields than the segment columns")
            }
        }
    }
}

impl error::Error for ParseFieldError {}

/// Type encapsulating different kinds of segments file parsing errors
#[derive(Debug)]
pub enum ParseError {
    /// Tried to parse an empty line. Can be ignored.
    EmptyLine,
    /// A line looked like a header, but the columns didn't match the
    /// segment columns. Includes the problem line.
    HeaderMismatch(String),
    /// A segment row appeared before the header row.
    MissingHeader,
    /// A line couldn't be parsed. Includes the problem line and a
    /// variant describing the error.
    InvalidLine(ParseFieldError, String),
    /// Wrapper for an IO error from the underlying reader.
    IOError(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError as PE;
        match self {
            PE::EmptyLine => write!(f, "Line was empty"),
            PE::HeaderMismatch(line) => {
                write!(f, "Header line does not match segment columns: {}", line)
            }
            PE::MissingHeader => {
                write!(f, "Segment row found before the header line")
            }
            PE::InvalidLine(field_err, line) => {
                write!(f, "Failed to parse line {}, error: {}", line, field_err)
            }
            PE::IOError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl From<std::io::Error> for ParseError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err)
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ParseError::InvalidLine(err, _) => Some(err),
            ParseError::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ParseError {
    #[inline]
    pub(crate) fn invalid_line(error: ParseFieldError, line: &[u8]) -> Self {
        let mut dest = String::new();
        line.to_str_lossy_into(&mut dest);
        Self::InvalidLine(error, dest)
    }

    #[inline]
    pub(crate) fn header_mismatch(line: &[u8]) -> Self {
        Self::HeaderMismatch(line.to_str_lossy().into_owned())
    }

    #[inline]
    pub fn can_safely_continue(&self, tol: &ParserTolerance) -> bool {
        use ParserTolerance as Tol;
        match tol {
            Tol::IgnoreAll => !matches!(self, ParseError::IOError(_)),
            Tol::Safe => matches!(self, ParseError::EmptyLine),
            Tol::Pedantic => false,
        }
    }
}
