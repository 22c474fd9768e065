//! Record schemas: the ordered field-to-span mappings of a record type.
//!
//! A [`Schema`] is built once per record type, normally by the `Record` derive
//! in the `fixmap` crate, and then shared by every decode of that type. Each
//! entry pairs a field name and [`Span`] with a binding chosen at build time:
//!
//! - built-in coercion for [`FieldType`] fields,
//! - a custom decoder for [`Unmarshal`] fields,
//! - recursion for nested [`Record`] fields.
//!
//! Nested records address the *whole* line: their spans are offsets into the
//! original line, not into the parent field's span. The parent's declaration
//! for a nested field is validated but does not restrict what the nested record
//! sees. A nested record's schema is built together with its parent's, so a bad
//! declaration anywhere in the tree fails the parent's build.
//!
//! ## Example
//!
//! ```
//! use fixmap_core::{Decoder, Record, Result, Schema};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl Record for Person {
//!     fn schema() -> Result<Schema<Self>> {
//!         Schema::builder("Person")
//!             .field("name", "0,10", |p: &mut Person| &mut p.name)
//!             .field("age", "10,-1", |p: &mut Person| &mut p.age)
//!             .build()
//!     }
//! }
//!
//! let person: Person = Decoder::new().decode_new(b"Ada       36")?;
//! assert_eq!(person.age, 36);
//! # Ok::<(), fixmap_core::Error>(())
//! ```

mod cache;

use crate::coerce::{is_blank, FieldKind, FieldType, Value};
use crate::decoder::{Decoder, DecoderConfig, Record, Unmarshal, ZeroPolicy};
use crate::error::{Error, FieldError, Result};
use crate::range::Span;
use std::fmt;
use tracing::debug;

pub use cache::SchemaCache;

type FieldResult = std::result::Result<(), FieldError>;
type AssignFn<T> = dyn Fn(&mut T, Value) -> FieldResult + Send + Sync;
type CustomFn<T> = dyn Fn(&mut T, &[u8], &DecoderConfig) -> FieldResult + Send + Sync;
type NestedFn<T> = dyn Fn(&mut T, &[u8], &Decoder) -> Result<()> + Send + Sync;

/// How a field is filled, fixed when the schema is built
pub(crate) enum Binding<T> {
    /// Coerce by [`FieldKind`] and assign
    Builtin(Box<AssignFn<T>>),
    /// Hand the slice to the field's [`Unmarshal`] impl
    Custom(Box<CustomFn<T>>),
    /// Decode a nested record from the whole line
    Nested(Box<NestedFn<T>>),
}

/// One mapped field of a record
pub struct FieldEntry<T> {
    name: &'static str,
    span: Span,
    kind: FieldKind,
    pub(crate) binding: Binding<T>,
}

impl<T> FieldEntry<T> {
    /// Field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared span
    pub fn span(&self) -> Span {
        self.span
    }

    /// Declared kind
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns true if the field is decoded from the whole line
    pub fn is_nested(&self) -> bool {
        matches!(self.binding, Binding::Nested(_))
    }
}

impl<T> fmt::Debug for FieldEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("span", &self.span)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered field mappings for a record type
pub struct Schema<T> {
    record: &'static str,
    fields: Vec<FieldEntry<T>>,
}

impl<T: 'static> Schema<T> {
    /// Starts building a schema for the named record type
    pub fn builder(record: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            record,
            fields: Vec::new(),
            error: None,
        }
    }
}

impl<T> Schema<T> {
    /// Record type name
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Field entries in declaration order
    pub fn fields(&self) -> &[FieldEntry<T>] {
        &self.fields
    }

    /// Looks up a field entry by name
    pub fn field(&self, name: &str) -> Option<&FieldEntry<T>> {
        self.fields.iter().find(|entry| entry.name == name)
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is mapped
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("record", &self.record)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`Schema`]
///
/// Declarations are parsed as they are added. The first invalid declaration is
/// kept and reported by [`SchemaBuilder::build`]; later calls are ignored.
pub struct SchemaBuilder<T> {
    record: &'static str,
    fields: Vec<FieldEntry<T>>,
    error: Option<Error>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Maps a field filled by built-in coercion
    pub fn field<V, A>(self, name: &'static str, declaration: &str, accessor: A) -> Self
    where
        V: FieldType + 'static,
        A: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let kind = V::kind();
        if !kind.is_builtin() {
            return self.fail(name, Error::unsupported_kind(&kind));
        }

        let assign = move |record: &mut T, value: Value| -> FieldResult {
            *accessor(record) =
                V::from_value(value).ok_or_else(|| FieldError::unsupported(V::kind()))?;
            Ok(())
        };
        self.push(name, declaration, kind, Binding::Builtin(Box::new(assign)))
    }

    /// Maps a field decoded by its own [`Unmarshal`] impl
    pub fn custom<C, A>(self, name: &'static str, declaration: &str, accessor: A) -> Self
    where
        C: Unmarshal + 'static,
        A: Fn(&mut T) -> &mut C + Send + Sync + 'static,
    {
        let unmarshal = move |record: &mut T, raw: &[u8], _: &DecoderConfig| {
            accessor(record).unmarshal(raw).map_err(FieldError::Custom)
        };
        self.push(
            name,
            declaration,
            FieldKind::Custom(short_type_name::<C>()),
            Binding::Custom(Box::new(unmarshal)),
        )
    }

    /// Maps an `Option` field whose inner type has its own [`Unmarshal`] impl
    ///
    /// A blank slice leaves the field `None` without calling the decoder. A
    /// decoded value equal to `C::default()` is treated as zero and follows
    /// [`ZeroPolicy`].
    pub fn custom_optional<C, A>(self, name: &'static str, declaration: &str, accessor: A) -> Self
    where
        C: Unmarshal + Default + PartialEq + 'static,
        A: Fn(&mut T) -> &mut Option<C> + Send + Sync + 'static,
    {
        let unmarshal = move |record: &mut T, raw: &[u8], config: &DecoderConfig| -> FieldResult {
            let slot = accessor(record);
            if is_blank(raw) {
                *slot = None;
                return Ok(());
            }
            let mut value = C::default();
            value.unmarshal(raw).map_err(FieldError::Custom)?;
            let zero = config.optional_zero == ZeroPolicy::Absent && value == C::default();
            *slot = if zero { None } else { Some(value) };
            Ok(())
        };
        self.push(
            name,
            declaration,
            FieldKind::Optional(Box::new(FieldKind::Custom(short_type_name::<C>()))),
            Binding::Custom(Box::new(unmarshal)),
        )
    }

    /// Maps a nested record, decoded from the whole line
    ///
    /// The nested schema is built here; its errors are reported by
    /// [`SchemaBuilder::build`] against this field.
    pub fn nested<N, A>(self, name: &'static str, declaration: &str, accessor: A) -> Self
    where
        N: Record,
        A: Fn(&mut T) -> &mut N + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }
        let schema = match N::schema() {
            Ok(schema) => schema,
            Err(err) => return self.fail(name, err),
        };
        let decode = move |record: &mut T, line: &[u8], decoder: &Decoder| {
            decoder.map_fields(&schema, line, accessor(record))
        };
        self.push(
            name,
            declaration,
            FieldKind::Nested(short_type_name::<N>()),
            Binding::Nested(Box::new(decode)),
        )
    }

    /// Finishes the schema, or returns the first declaration error
    pub fn build(self) -> Result<Schema<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        debug!(
            "Built schema for {} with {} mapped field(s)",
            self.record,
            self.fields.len()
        );
        Ok(Schema {
            record: self.record,
            fields: self.fields,
        })
    }

    fn push(
        mut self,
        name: &'static str,
        declaration: &str,
        kind: FieldKind,
        binding: Binding<T>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match Span::parse(declaration) {
            Ok(span) => self.fields.push(FieldEntry {
                name,
                span,
                kind,
                binding,
            }),
            Err(err) => return self.fail(name, err),
        }
        self
    }

    fn fail(mut self, name: &'static str, err: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(Error::schema(self.record, name, err));
        }
        self
    }
}

/// Type name without its module path, e.g. `Date` for `my_app::types::Date`
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
