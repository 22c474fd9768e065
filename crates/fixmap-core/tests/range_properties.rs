//! Property tests for range declaration parsing and slicing.

use fixmap_core::{ErrorKind, Span, SpanEnd};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_valid_finite_ranges_parse(start in 0usize..10_000, width in 1usize..10_000) {
        let end = start + width;
        let span = Span::parse(&format!("{},{}", start, end)).unwrap();
        prop_assert_eq!(span.start(), start);
        prop_assert_eq!(span.end(), SpanEnd::Offset(end));
    }

    #[test]
    fn prop_end_of_line_ranges_parse(start in 0usize..10_000) {
        let span = Span::parse(&format!("{},-1", start)).unwrap();
        prop_assert_eq!(span.start(), start);
        prop_assert_eq!(span.end(), SpanEnd::EndOfLine);
    }

    #[test]
    fn prop_degenerate_ranges_rejected(start in 0usize..10_000, back in 0usize..10_000) {
        let end = start.saturating_sub(back);
        let err = Span::parse(&format!("{},{}", start, end)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidRangeDeclaration);
    }

    #[test]
    fn prop_end_below_sentinel_rejected(start in 0usize..10_000, end in i64::MIN..-1) {
        let err = Span::parse(&format!("{},{}", start, end)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidRangeDeclaration);
    }

    #[test]
    fn prop_non_numeric_rejected(start in "[a-zA-Z_]{1,6}", end in 1usize..100) {
        let err = Span::parse(&format!("{},{}", start, end)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidRangeDeclaration);
        let err = Span::parse(&format!("0,{}x", end)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidRangeDeclaration);
    }

    #[test]
    fn prop_clamped_slice_never_panics(
        line in proptest::collection::vec(any::<u8>(), 0..64),
        start in 0usize..80,
        width in 1usize..80,
    ) {
        let span = Span::new(start, start + width).unwrap();
        let slice = span.slice(&line);
        prop_assert!(slice.len() <= width);
        if let Some(strict) = span.try_slice(&line) {
            prop_assert_eq!(strict, slice);
        }
    }
}
