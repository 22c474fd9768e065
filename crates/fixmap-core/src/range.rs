//! Byte range descriptors for fixed-width fields.
//!
//! A field declares where it lives in a line with a `"<start>,<end>"` string.
//! Offsets are byte positions and the range is half-open, so `"0,20"` covers
//! bytes 0 through 19. An end of `-1` means "to the end of the line, however
//! long it is".
//!
//! ## Slicing short lines
//!
//! Flat-file producers often strip trailing padding, so a line may end before
//! the last declared column. [`Span::slice`] clamps: a start past the end yields
//! an empty slice and an end past the end yields the tail. [`Span::try_slice`]
//! is the strict variant and returns `None` instead.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Declaration value meaning "to the end of the line"
pub const END_OF_LINE: i64 = -1;

/// End bound of a [`Span`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanEnd {
    /// Exclusive byte offset
    Offset(usize),
    /// Runs to the end of the line
    EndOfLine,
}

/// A validated half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: SpanEnd,
}

impl Span {
    /// Creates a span with a finite end, rejecting empty and reversed ranges
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if end == start {
            return Err(Error::invalid_range(
                format!("{},{}", start, end),
                format!("empty range: start and end are both {}", start),
            ));
        }
        if end < start {
            return Err(Error::invalid_range(
                format!("{},{}", start, end),
                format!("reversed range: end {} precedes start {}", end, start),
            ));
        }
        Ok(Self {
            start,
            end: SpanEnd::Offset(end),
        })
    }

    /// Creates a span from `start` to the end of the line
    pub fn to_end(start: usize) -> Self {
        Self {
            start,
            end: SpanEnd::EndOfLine,
        }
    }

    /// Parses a `"<start>,<end>"` declaration
    pub fn parse(declaration: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::invalid_range(declaration, reason);

        if declaration.trim().is_empty() {
            return Err(invalid("empty declaration"));
        }

        let mut parts = declaration.split(',');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected \"<start>,<end>\""));
        };

        let start: usize = start
            .trim()
            .parse()
            .map_err(|_| invalid("start offset must be a non-negative integer"))?;
        let end: i64 = end
            .trim()
            .parse()
            .map_err(|_| invalid("end offset must be an integer"))?;

        if end == END_OF_LINE {
            return Ok(Self::to_end(start));
        }
        if end < END_OF_LINE {
            return Err(invalid("end offset must be -1 or greater than start"));
        }

        let end = usize::try_from(end).map_err(|_| invalid("end offset does not fit in usize"))?;
        Self::new(start, end).map_err(|e| match e {
            Error::InvalidRangeDeclaration { reason, .. } => {
                Error::invalid_range(declaration, reason)
            }
            other => other,
        })
    }

    /// Start offset (inclusive)
    pub fn start(&self) -> usize {
        self.start
    }

    /// End bound
    pub fn end(&self) -> SpanEnd {
        self.end
    }

    /// Finite end offset, or `None` for an end-of-line span
    pub fn end_offset(&self) -> Option<usize> {
        match self.end {
            SpanEnd::Offset(end) => Some(end),
            SpanEnd::EndOfLine => None,
        }
    }

    /// Declared width in bytes, or `None` for an end-of-line span
    pub fn width(&self) -> Option<usize> {
        self.end_offset().map(|end| end - self.start)
    }

    /// Returns true if the span runs to the end of the line
    pub fn is_to_end(&self) -> bool {
        self.end == SpanEnd::EndOfLine
    }

    /// Slices `line`, clamping both bounds to its length
    pub fn slice<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        let start = self.start.min(line.len());
        let end = match self.end {
            SpanEnd::Offset(end) => end.min(line.len()),
            SpanEnd::EndOfLine => line.len(),
        };
        &line[start..end]
    }

    /// Slices `line`, returning `None` if the span does not fit
    pub fn try_slice<'a>(&self, line: &'a [u8]) -> Option<&'a [u8]> {
        match self.end {
            SpanEnd::Offset(end) => line.get(self.start..end),
            SpanEnd::EndOfLine => line.get(self.start..),
        }
    }
}

impl FromStr for Span {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Span {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            SpanEnd::Offset(end) => write!(f, "[{},{})", self.start, end),
            SpanEnd::EndOfLine => write!(f, "[{},EOL)", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn reason(declaration: &str) -> String {
        match Span::parse(declaration) {
            Err(Error::InvalidRangeDeclaration { reason, .. }) => reason,
            other => panic!("expected invalid range for {:?}, got {:?}", declaration, other),
        }
    }

    #[test]
    fn test_parse_finite() {
        let span = Span::parse("0,20").unwrap();
        assert_eq!(span.start(), 0);
        assert_eq!(span.end(), SpanEnd::Offset(20));
        assert_eq!(span.width(), Some(20));
    }

    #[test]
    fn test_parse_end_of_line() {
        let span: Span = "37,-1".parse().unwrap();
        assert_eq!(span.start(), 37);
        assert!(span.is_to_end());
        assert_eq!(span.width(), None);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(Span::parse(" 4 , 8 ").unwrap(), Span::new(4, 8).unwrap());
    }

    #[test]
    fn test_parse_rejects_degenerate() {
        assert!(reason("5,5").contains("empty range"));
        assert!(reason("9,3").contains("reversed range"));
        assert_eq!(
            Span::parse("5,5").unwrap_err().kind(),
            ErrorKind::InvalidRangeDeclaration
        );
    }

    #[test]
    fn test_parse_rejects_syntax() {
        assert_eq!(reason(""), "empty declaration");
        assert_eq!(reason("   "), "empty declaration");
        assert!(reason("12").contains("<start>,<end>"));
        assert!(reason("1,2,3").contains("<start>,<end>"));
        assert!(reason("a,4").contains("start offset"));
        assert!(reason("-2,4").contains("start offset"));
        assert!(reason("0,x").contains("end offset"));
        assert!(reason("3,-2").contains("-1"));
    }

    #[test]
    fn test_error_keeps_declaration() {
        match Span::parse("7,2") {
            Err(Error::InvalidRangeDeclaration { declaration, .. }) => {
                assert_eq!(declaration, "7,2")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_slice_in_range() {
        let line = b"ABCDEFGHIJ";
        assert_eq!(Span::new(2, 5).unwrap().slice(line), b"CDE");
        assert_eq!(Span::to_end(7).slice(line), b"HIJ");
    }

    #[test]
    fn test_slice_clamps_short_line() {
        let line = b"ABCDEF";
        assert_eq!(Span::new(4, 10).unwrap().slice(line), b"EF");
        assert_eq!(Span::new(8, 10).unwrap().slice(line), b"");
        assert_eq!(Span::to_end(6).slice(line), b"");
        assert_eq!(Span::to_end(9).slice(line), b"");
    }

    #[test]
    fn test_try_slice_is_strict() {
        let line = b"ABCDEF";
        assert_eq!(Span::new(1, 3).unwrap().try_slice(line), Some(&b"BC"[..]));
        assert_eq!(Span::new(4, 10).unwrap().try_slice(line), None);
        assert_eq!(Span::to_end(6).try_slice(line), Some(&b""[..]));
        assert_eq!(Span::to_end(7).try_slice(line), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(0, 20).unwrap().to_string(), "[0,20)");
        assert_eq!(Span::to_end(37).to_string(), "[37,EOL)");
    }
}
