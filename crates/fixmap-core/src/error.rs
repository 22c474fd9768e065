//! Error types for the fixmap-core library.
//!
//! Errors fall into two phases. Schema errors ([`Error::InvalidRangeDeclaration`],
//! [`Error::UnsupportedFieldKind`], wrapped in [`Error::Schema`]) are raised while
//! a record schema is built and stop any decoding. Decode errors
//! ([`Error::Field`]) carry the first field that failed on a given line.
//!
//! Use [`Error::kind`] to classify an error without walking the wrappers by hand.

use crate::range::Span;
use std::num::{ParseFloatError, ParseIntError};
use std::str::Utf8Error;
use thiserror::Error;

/// Result type alias for fixmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by custom decoders
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for schema construction and line decoding
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A range declaration could not be parsed or describes an empty/reversed range
    #[error("invalid range declaration {declaration:?}: {reason}")]
    InvalidRangeDeclaration {
        /// The declaration text as written
        declaration: String,
        /// What is wrong with it
        reason: String,
    },

    /// A field declares a kind the built-in coercer cannot produce
    #[error("unsupported field kind: {kind}")]
    UnsupportedFieldKind {
        /// Rendered field kind
        kind: String,
    },

    /// A schema-build error, tagged with the field that caused it
    #[error("invalid mapping for {record}.{field}: {source}")]
    Schema {
        /// Record type name
        record: &'static str,
        /// Field name
        field: &'static str,
        /// The underlying declaration error
        #[source]
        source: Box<Error>,
    },

    /// A field failed to decode from its slice of the line
    #[error("failed to decode {record}.{field} at {span} from {raw:?}: {source}")]
    Field {
        /// Record type name
        record: &'static str,
        /// Field name
        field: &'static str,
        /// Span the field was sliced from
        span: Span,
        /// The raw slice (lossy UTF-8)
        raw: String,
        /// Underlying cause
        #[source]
        source: FieldError,
    },
}

/// Per-field decode failure
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FieldError {
    /// Integer parse failure (non-digits, overflow, blank)
    #[error("invalid {target} value: {source}")]
    InvalidInteger {
        /// Declared integer kind
        target: &'static str,
        /// Parser error
        #[source]
        source: ParseIntError,
    },

    /// Float parse failure
    #[error("invalid {target} value: {source}")]
    InvalidFloat {
        /// Declared float kind
        target: &'static str,
        /// Parser error
        #[source]
        source: ParseFloatError,
    },

    /// Text that is not one of the recognised boolean tokens
    #[error("invalid boolean value {value:?}")]
    InvalidBoolean {
        /// Trimmed input text
        value: String,
    },

    /// String field over bytes that are not valid UTF-8
    #[error("invalid string value: {0}")]
    InvalidString(#[from] Utf8Error),

    /// Kind has no built-in coercion
    #[error("unsupported field kind: {kind}")]
    UnsupportedKind {
        /// Rendered field kind
        kind: String,
    },

    /// Span does not fit the line under the strict slice policy
    #[error("span {span} is out of bounds for a line of {line_len} bytes")]
    OutOfBounds {
        /// The requested span
        span: Span,
        /// Actual line length
        line_len: usize,
    },

    /// A custom decoder rejected the slice
    #[error("custom decoder failed: {0}")]
    Custom(#[source] BoxError),

    /// A nested record failed
    #[error("nested record failed: {0}")]
    Nested(#[source] Box<Error>),
}

/// Classification of an [`Error`], independent of the wrapping context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed, empty or reversed range declaration
    InvalidRangeDeclaration,
    /// Integer coercion failed
    InvalidIntegerValue,
    /// Float coercion failed
    InvalidFloatValue,
    /// Boolean coercion failed
    InvalidBooleanValue,
    /// String coercion failed (bad UTF-8)
    InvalidStringValue,
    /// Field kind has no coercion
    UnsupportedFieldKind,
    /// A custom decoder reported an error
    CustomDecoderFailure,
    /// Span past the end of the line under the strict policy
    FieldOutOfBounds,
}

impl Error {
    /// Creates a new invalid range declaration error
    pub fn invalid_range(declaration: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRangeDeclaration {
            declaration: declaration.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new unsupported field kind error
    pub fn unsupported_kind(kind: impl ToString) -> Self {
        Self::UnsupportedFieldKind {
            kind: kind.to_string(),
        }
    }

    /// Wraps a declaration error with the record and field it belongs to
    pub fn schema(record: &'static str, field: &'static str, source: Error) -> Self {
        Self::Schema {
            record,
            field,
            source: Box::new(source),
        }
    }

    /// Creates a new field decode error
    pub fn field(
        record: &'static str,
        field: &'static str,
        span: Span,
        raw: &[u8],
        source: FieldError,
    ) -> Self {
        Self::Field {
            record,
            field,
            span,
            raw: String::from_utf8_lossy(raw).into_owned(),
            source,
        }
    }

    /// Returns the root classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRangeDeclaration { .. } => ErrorKind::InvalidRangeDeclaration,
            Self::UnsupportedFieldKind { .. } => ErrorKind::UnsupportedFieldKind,
            Self::Schema { source, .. } => source.kind(),
            Self::Field { source, .. } => source.kind(),
        }
    }

    /// Returns true if the error was raised while building a schema
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRangeDeclaration { .. }
                | Self::UnsupportedFieldKind { .. }
                | Self::Schema { .. }
        )
    }

    /// Returns the innermost `(record, field)` pair this error is attached to
    pub fn field_path(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Field {
                source: FieldError::Nested(inner),
                record,
                field,
                ..
            } => inner.field_path().or(Some((*record, *field))),
            Self::Field { record, field, .. } | Self::Schema { record, field, .. } => {
                Some((*record, *field))
            }
            _ => None,
        }
    }
}

impl FieldError {
    /// Creates a new unsupported kind error
    pub fn unsupported(kind: impl ToString) -> Self {
        Self::UnsupportedKind {
            kind: kind.to_string(),
        }
    }

    /// Wraps a custom decoder error
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }

    /// Returns the root classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInteger { .. } => ErrorKind::InvalidIntegerValue,
            Self::InvalidFloat { .. } => ErrorKind::InvalidFloatValue,
            Self::InvalidBoolean { .. } => ErrorKind::InvalidBooleanValue,
            Self::InvalidString(_) => ErrorKind::InvalidStringValue,
            Self::UnsupportedKind { .. } => ErrorKind::UnsupportedFieldKind,
            Self::OutOfBounds { .. } => ErrorKind::FieldOutOfBounds,
            Self::Custom(_) => ErrorKind::CustomDecoderFailure,
            Self::Nested(inner) => inner.kind(),
        }
    }
}
