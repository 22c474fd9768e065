//! The record mapper: decodes one line into a record.
//!
//! [`Decoder::decode`] resolves the record's [`Schema`] (building and caching
//! it on first use), then walks the mapped fields in declaration order. Each
//! field is sliced from the line, coerced and assigned in place. The first
//! failure aborts the record and is returned as [`Error::Field`]; fields that
//! were assigned before it keep their new values and must not be relied upon.
//!
//! The free functions [`decode`] and [`from_line`] use a process-wide decoder
//! with the default [`DecoderConfig`].

use crate::coerce::coerce;
use crate::error::{BoxError, Error, FieldError, Result};
use crate::range::Span;
use crate::schema::{Binding, Schema, SchemaCache};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// A type that decodes its own field value from the raw slice
///
/// A field registered as custom always uses this impl, even when the type
/// could also be handled as a nested record or a built-in kind.
pub trait Unmarshal {
    /// Fill `self` from the raw, untrimmed field slice
    fn unmarshal(&mut self, raw: &[u8]) -> std::result::Result<(), BoxError>;
}

/// A record type with a fixed-width layout
///
/// Usually derived with `#[derive(fixmap::Record)]`.
pub trait Record: Sized + 'static {
    /// Build the schema for this type
    fn schema() -> Result<Schema<Self>>;
}

/// What to do when a span reaches past the end of the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlicePolicy {
    /// Clamp to the line: short lines give short or empty slices
    #[default]
    Clamp,
    /// Fail the field with `FieldOutOfBounds`
    Strict,
}

/// How an optional field that decodes to its zero value is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPolicy {
    /// `0`, `0.0`, `false` become `None`
    #[default]
    Absent,
    /// Keep `Some(0)`; only blank slices become `None`
    Keep,
}

/// Configuration for the decoder
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Handling of spans past the end of the line
    pub slice_policy: SlicePolicy,
    /// Handling of zero values in optional fields
    pub optional_zero: ZeroPolicy,
    /// Trim ASCII whitespace from string fields
    pub trim_strings: bool,
}

impl DecoderConfig {
    /// Creates a new decoder config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slice policy
    pub fn slice_policy(mut self, policy: SlicePolicy) -> Self {
        self.slice_policy = policy;
        self
    }

    /// Sets the zero policy for optional fields
    pub fn optional_zero(mut self, policy: ZeroPolicy) -> Self {
        self.optional_zero = policy;
        self
    }

    /// Sets whether string fields are trimmed
    pub fn trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }
}

/// Decodes lines into records, caching one schema per record type
///
/// A `Decoder` is `Send + Sync`; share one across threads to decode
/// independent lines in parallel.
#[derive(Debug, Default)]
pub struct Decoder {
    config: DecoderConfig,
    cache: SchemaCache,
}

impl Decoder {
    /// Creates a new decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            cache: SchemaCache::new(),
        }
    }

    /// Returns the decoder configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns the schema for `T`, building it if needed
    pub fn schema<T: Record>(&self) -> Result<Arc<Schema<T>>> {
        self.cache.get_or_build::<T>()
    }

    /// Builds and caches the schema for `T` ahead of decoding
    ///
    /// Surfaces declaration errors before any line is read.
    pub fn prepare<T: Record>(&self) -> Result<()> {
        self.schema::<T>().map(|_| ())
    }

    /// Decode `line` into `target`
    pub fn decode<T: Record>(&self, line: impl AsRef<[u8]>, target: &mut T) -> Result<()> {
        let schema = self.schema::<T>()?;
        self.map_fields(&schema, line.as_ref(), target)
    }

    /// Decode `line` into a new `T::default()`
    pub fn decode_new<T: Record + Default>(&self, line: impl AsRef<[u8]>) -> Result<T> {
        let mut record = T::default();
        self.decode(line, &mut record)?;
        Ok(record)
    }

    pub(crate) fn map_fields<T>(
        &self,
        schema: &Schema<T>,
        line: &[u8],
        target: &mut T,
    ) -> Result<()> {
        trace!("Decoding {} from {} byte line", schema.record(), line.len());

        for entry in schema.fields() {
            let span = entry.span();
            let raw = match &entry.binding {
                Binding::Nested(_) => line,
                _ => match self.slice(span, line) {
                    Some(raw) => raw,
                    None => {
                        let source = FieldError::OutOfBounds {
                            span,
                            line_len: line.len(),
                        };
                        return Err(Error::field(schema.record(), entry.name(), span, &[], source));
                    }
                },
            };

            trace!(
                "{}.{} {} -> {:?}",
                schema.record(),
                entry.name(),
                span,
                String::from_utf8_lossy(raw)
            );

            let outcome = match &entry.binding {
                Binding::Builtin(assign) => {
                    coerce(entry.kind(), raw, &self.config).and_then(|value| assign(target, value))
                }
                Binding::Custom(unmarshal) => unmarshal(target, raw, &self.config),
                Binding::Nested(decode_nested) => {
                    decode_nested(target, line, self).map_err(|e| FieldError::Nested(Box::new(e)))
                }
            };

            if let Err(source) = outcome {
                debug!("Failed to decode {}.{}: {}", schema.record(), entry.name(), source);
                return Err(Error::field(schema.record(), entry.name(), span, raw, source));
            }
        }

        Ok(())
    }

    fn slice<'a>(&self, span: Span, line: &'a [u8]) -> Option<&'a [u8]> {
        match self.config.slice_policy {
            SlicePolicy::Clamp => Some(span.slice(line)),
            SlicePolicy::Strict => span.try_slice(line),
        }
    }
}

/// The process-wide decoder used by [`decode`] and [`from_line`]
pub fn default_decoder() -> &'static Decoder {
    static DEFAULT: OnceLock<Decoder> = OnceLock::new();
    DEFAULT.get_or_init(Decoder::new)
}

/// Decode `line` into `target` with the default decoder
pub fn decode<T: Record>(line: impl AsRef<[u8]>, target: &mut T) -> Result<()> {
    default_decoder().decode(line, target)
}

/// Decode `line` into a new `T` with the default decoder
pub fn from_line<T: Record + Default>(line: impl AsRef<[u8]>) -> Result<T> {
    default_decoder().decode_new(line)
}
