//! Field kinds, decoded values and the [`FieldType`] bridge to Rust types.

use std::fmt;

/// Bit width of an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 8-bit
    W8,
    /// 16-bit
    W16,
    /// 32-bit
    W32,
    /// 64-bit
    W64,
    /// 128-bit
    W128,
    /// Pointer-sized
    Size,
}

/// Precision of a floating-point field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    /// `f32`
    F32,
    /// `f64`
    F64,
}

/// Declared semantic type of a mapped field
///
/// Resolved once when a schema is built; the coercer dispatches on it for
/// every decoded line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// UTF-8 text
    Str,
    /// Raw bytes
    Bytes,
    /// Signed integer
    Int(IntWidth),
    /// Unsigned integer
    UInt(IntWidth),
    /// Floating point
    Float(FloatWidth),
    /// Boolean
    Bool,
    /// `Option` wrapper over another kind
    Optional(Box<FieldKind>),
    /// Nested record addressed against the same line
    Nested(&'static str),
    /// Type with its own decoder
    Custom(&'static str),
}

impl FieldKind {
    /// Returns true if the built-in coercer can produce this kind
    pub fn is_builtin(&self) -> bool {
        match self {
            Self::Nested(_) | Self::Custom(_) => false,
            Self::Optional(inner) => inner.is_builtin(),
            _ => true,
        }
    }

    /// Short name of the kind, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bytes => "bytes",
            Self::Int(IntWidth::W8) => "i8",
            Self::Int(IntWidth::W16) => "i16",
            Self::Int(IntWidth::W32) => "i32",
            Self::Int(IntWidth::W64) => "i64",
            Self::Int(IntWidth::W128) => "i128",
            Self::Int(IntWidth::Size) => "isize",
            Self::UInt(IntWidth::W8) => "u8",
            Self::UInt(IntWidth::W16) => "u16",
            Self::UInt(IntWidth::W32) => "u32",
            Self::UInt(IntWidth::W64) => "u64",
            Self::UInt(IntWidth::W128) => "u128",
            Self::UInt(IntWidth::Size) => "usize",
            Self::Float(FloatWidth::F32) => "f32",
            Self::Float(FloatWidth::F64) => "f64",
            Self::Bool => "bool",
            Self::Optional(_) => "optional",
            Self::Nested(_) => "record",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optional(inner) => write!(f, "Option<{}>", inner),
            Self::Nested(name) => write!(f, "record {}", name),
            Self::Custom(name) => write!(f, "custom {}", name),
            other => f.write_str(other.name()),
        }
    }
}

/// A coerced field value, widened to the largest type of its family
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Optional field left unset
    Absent,
    /// Text
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Any signed integer
    Int(i128),
    /// Any unsigned integer
    UInt(u128),
    /// Any float
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl Value {
    /// Returns true for the zero value of the value's type
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Str(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Bool(v) => !*v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "{:?}", String::from_utf8_lossy(b)),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Rust types that can be filled by built-in coercion
///
/// Implemented for the primitive types, `String`, `Vec<u8>` and `Option<T>`.
/// A newtype can implement it to reuse an existing kind:
///
/// ```
/// use fixmap_core::{FieldKind, FieldType, Value};
///
/// struct AccountCode(String);
///
/// impl FieldType for AccountCode {
///     fn kind() -> FieldKind {
///         FieldKind::Str
///     }
///
///     fn from_value(value: Value) -> Option<Self> {
///         match value {
///             Value::Str(s) => Some(AccountCode(s)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait FieldType: Sized {
    /// Kind the coercer should produce for this type
    fn kind() -> FieldKind;

    /// Converts a coerced value back into this type, `None` on a mismatch
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! int_field_type {
    ($($ty:ty => $variant:ident($width:ident)),* $(,)?) => {
        $(
            impl FieldType for $ty {
                fn kind() -> FieldKind {
                    FieldKind::$variant(IntWidth::$width)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_field_type! {
    i8 => Int(W8),
    i16 => Int(W16),
    i32 => Int(W32),
    i64 => Int(W64),
    i128 => Int(W128),
    isize => Int(Size),
    u8 => UInt(W8),
    u16 => UInt(W16),
    u32 => UInt(W32),
    u64 => UInt(W64),
    u128 => UInt(W128),
    usize => UInt(Size),
}

impl FieldType for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float(FloatWidth::F32)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            // Coerced at f32 precision, so narrowing is exact
            Value::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float(FloatWidth::F64)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for String {
    fn kind() -> FieldKind {
        FieldKind::Str
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldType for Vec<u8> {
    fn kind() -> FieldKind {
        FieldKind::Bytes
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::kind()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Absent => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
