//! # fixmap
//!
//! Decode fixed-width text lines into typed Rust records.
//!
//! Each field declares the byte range it occupies; `-1` as the end means "to
//! the end of the line". Deriving [`Record`] builds the schema from the
//! attributes, and [`decode`] or [`from_line`] fill a record from one line.
//!
//! ```
//! use fixmap::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct Person {
//!     #[fixmap(range = "0,20")]
//!     full_name: String,
//!     #[fixmap(range = "20,28")]
//!     birth_date: String,
//!     #[fixmap(range = "28,37")]
//!     ssn: String,
//!     #[fixmap(range = "37,-1")]
//!     income: f64,
//! }
//!
//! let person: Person = fixmap::from_line("Olivia Parker       199703221112223331550.85")?;
//! assert_eq!(person.full_name, "Olivia Parker       ");
//! assert_eq!(person.income, 1550.85);
//! # Ok::<(), fixmap::Error>(())
//! ```
//!
//! See [`fixmap_core`] for the decoding rules, [`Unmarshal`] for custom field
//! decoders and [`DecoderConfig`] for the slicing and optional-field policies.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub use fixmap_core::*;
pub use fixmap_derive::Record;
