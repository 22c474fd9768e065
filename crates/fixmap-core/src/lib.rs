//! # fixmap-core
//!
//! The engine behind `fixmap`: decodes fixed-width text lines into typed
//! records by mapping declared byte ranges onto struct fields.
//!
//! This crate provides:
//! - Parsing and validating `"<start>,<end>"` range declarations
//! - Slicing a line by those ranges, clamping short lines by default
//! - Coercing slices into strings, integers, floats, booleans and options
//! - Custom per-type decoders and nested records addressed against the same line
//!
//! ## Architecture
//!
//! - [`range`]: Range declarations and line slicing
//! - [`coerce`]: Built-in byte-to-value coercion
//! - [`schema`]: Per-record field schemas and the schema cache
//! - [`decoder`]: The record mapper and its configuration
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use fixmap_core::{Decoder, Record, Result, Schema};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     full_name: String,
//!     birth_date: String,
//!     ssn: String,
//!     income: f64,
//! }
//!
//! impl Record for Person {
//!     fn schema() -> Result<Schema<Self>> {
//!         Schema::builder("Person")
//!             .field("full_name", "0,20", |p: &mut Person| &mut p.full_name)
//!             .field("birth_date", "20,28", |p: &mut Person| &mut p.birth_date)
//!             .field("ssn", "28,37", |p: &mut Person| &mut p.ssn)
//!             .field("income", "37,-1", |p: &mut Person| &mut p.income)
//!             .build()
//!     }
//! }
//!
//! let decoder = Decoder::new();
//! let person: Person = decoder.decode_new("Olivia Parker       199703221112223331550.85")?;
//! assert_eq!(person.ssn, "111222333");
//! assert_eq!(person.income, 1550.85);
//! # Ok::<(), fixmap_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`Unmarshal`]: Decode a field type from its raw slice
//! - [`FieldType`]: Map a newtype onto a built-in kind
//! - [`Record`]: Declare a record layout by hand instead of deriving it

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod coerce;
pub mod decoder;
pub mod error;
pub mod range;
pub mod schema;

// Re-export primary types for convenience
pub use coerce::{FieldKind, FieldType, FloatWidth, IntWidth, Value};
pub use decoder::{
    decode, default_decoder, from_line, Decoder, DecoderConfig, Record, SlicePolicy, Unmarshal,
    ZeroPolicy,
};
pub use error::{BoxError, Error, ErrorKind, FieldError, Result};
pub use range::{Span, SpanEnd, END_OF_LINE};
pub use schema::{FieldEntry, Schema, SchemaBuilder, SchemaCache};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
