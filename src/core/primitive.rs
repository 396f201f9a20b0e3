//! # Primitive Dispatch Table
//!
//! The closed set of primitive value kinds and the single place that maps each kind
//! to its writer call. Adding a primitive kind means adding one variant to
//! [`PrimitiveKind`] and [`Primitive`] and one arm to [`Primitive::encode`] /
//! [`Primitive::decode`].

use crate::core::reader::WireReader;
use crate::core::writer::WireWriter;
use crate::error::Result;
use std::borrow::Cow;
use std::fmt;

/// Primitive kinds understood by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Length-prefixed UTF-8 text
    Str,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Single-byte boolean
    Bool,
}

impl PrimitiveKind {
    /// Every primitive kind, in table order
    pub const ALL: [PrimitiveKind; 5] = [
        PrimitiveKind::Str,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::Bool,
    ];

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Str => "string",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Bool => "bool",
        }
    }

    /// Encoded width in bytes, `None` for variable-width kinds
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            PrimitiveKind::Str => None,
            PrimitiveKind::I16 => Some(2),
            PrimitiveKind::I32 => Some(4),
            PrimitiveKind::I64 => Some(8),
            PrimitiveKind::Bool => Some(1),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value, borrowed where possible
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Primitive<'a> {
    Str(Cow<'a, str>),
    I16(i16),
    I32(i32),
    I64(i64),
    Bool(bool),
}

impl Primitive<'static> {
    /// Placeholder written for absent map values and sequence elements
    pub const EMPTY_STRING: Self = Primitive::Str(Cow::Borrowed(""));
}

impl<'a> Primitive<'a> {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Str(_) => PrimitiveKind::Str,
            Primitive::I16(_) => PrimitiveKind::I16,
            Primitive::I32(_) => PrimitiveKind::I32,
            Primitive::I64(_) => PrimitiveKind::I64,
            Primitive::Bool(_) => PrimitiveKind::Bool,
        }
    }

    /// Write this value with its kind's writer call
    #[inline]
    pub fn encode(&self, writer: &mut WireWriter) {
        match self {
            Primitive::Str(v) => writer.write_str(v),
            Primitive::I16(v) => writer.write_i16(*v),
            Primitive::I32(v) => writer.write_i32(*v),
            Primitive::I64(v) => writer.write_i64(*v),
            Primitive::Bool(v) => writer.write_bool(*v),
        }
    }

    /// Read a value of the given kind
    pub fn decode(kind: PrimitiveKind, reader: &mut WireReader<'_>) -> Result<Primitive<'static>> {
        Ok(match kind {
            PrimitiveKind::Str => Primitive::Str(Cow::Owned(reader.read_string()?)),
            PrimitiveKind::I16 => Primitive::I16(reader.read_i16()?),
            PrimitiveKind::I32 => Primitive::I32(reader.read_i32()?),
            PrimitiveKind::I64 => Primitive::I64(reader.read_i64()?),
            PrimitiveKind::Bool => Primitive::Bool(reader.read_bool()?),
        })
    }

    pub fn into_owned(self) -> Primitive<'static> {
        match self {
            Primitive::Str(v) => Primitive::Str(Cow::Owned(v.into_owned())),
            Primitive::I16(v) => Primitive::I16(v),
            Primitive::I32(v) => Primitive::I32(v),
            Primitive::I64(v) => Primitive::I64(v),
            Primitive::Bool(v) => Primitive::Bool(v),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value widened to i64, if this is an integer kind
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Primitive::I16(v) => Some(i64::from(*v)),
            Primitive::I32(v) => Some(i64::from(*v)),
            Primitive::I64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(v) => f.write_str(v),
            Primitive::I16(v) => write!(f, "{v}"),
            Primitive::I32(v) => write!(f, "{v}"),
            Primitive::I64(v) => write!(f, "{v}"),
            Primitive::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i16> for Primitive<'static> {
    fn from(v: i16) -> Self {
        Primitive::I16(v)
    }
}

impl From<i32> for Primitive<'static> {
    fn from(v: i32) -> Self {
        Primitive::I32(v)
    }
}

impl From<i64> for Primitive<'static> {
    fn from(v: i64) -> Self {
        Primitive::I64(v)
    }
}

impl From<bool> for Primitive<'static> {
    fn from(v: bool) -> Self {
        Primitive::Bool(v)
    }
}

impl From<String> for Primitive<'static> {
    fn from(v: String) -> Self {
        Primitive::Str(Cow::Owned(v))
    }
}

impl<'a> From<&'a str> for Primitive<'a> {
    fn from(v: &'a str) -> Self {
        Primitive::Str(Cow::Borrowed(v))
    }
}
