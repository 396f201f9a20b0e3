//! # Value Shapes
//!
//! Every field value the encoder sees is classified into one of a small closed set of
//! shapes: absent, primitive, ordered sequence, key/value map, or nested object.
//! [`ToWire`] performs the classification; the encoder never inspects concrete types.
//!
//! ```text
//! String, &str, Cow<str>, i16, i32, i64, bool  -> Primitive
//! Option<T>                                     -> Absent | T
//! Vec<T>, VecDeque<T>, [T; N]                   -> Sequence
//! HashMap<K, V>, BTreeMap<K, V>                 -> Map
//! T: WireObject, Box<T: WireObject>             -> Nested
//! ```

use crate::core::primitive::Primitive;
use crate::protocol::object::WireObject;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;

/// Borrowed, classified view of a value
pub enum WireValue<'a> {
    /// No value present; writes nothing at field level
    Absent,
    Primitive(Primitive<'a>),
    Sequence(&'a dyn WireSequence),
    Map(&'a dyn WireMap),
    Nested(&'a dyn WireObject),
}

impl<'a> WireValue<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, WireValue::Absent)
    }

    pub fn as_primitive(&self) -> Option<&Primitive<'a>> {
        match self {
            WireValue::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Short description of the shape, used in error messages
    pub fn describe(&self) -> String {
        match self {
            WireValue::Absent => "absent".to_string(),
            WireValue::Primitive(p) => p.kind().name().to_string(),
            WireValue::Sequence(_) => "sequence".to_string(),
            WireValue::Map(_) => "map".to_string(),
            WireValue::Nested(obj) => format!("object {}", obj.type_name()),
        }
    }
}

impl std::fmt::Debug for WireValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireValue::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            other => f.write_str(&other.describe()),
        }
    }
}

/// Classify a value for encoding
pub trait ToWire {
    fn to_wire(&self) -> WireValue<'_>;
}

/// Ordered container of elements
pub trait WireSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in iteration order
    fn elements(&self) -> Box<dyn Iterator<Item = WireValue<'_>> + '_>;
}

/// Key/value container
pub trait WireMap {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in the container's native iteration order
    fn entries(&self) -> Box<dyn Iterator<Item = (WireValue<'_>, WireValue<'_>)> + '_>;
}

// ---- primitives -------------------------------------------------------------

impl ToWire for str {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Primitive(Primitive::Str(Cow::Borrowed(self)))
    }
}

impl ToWire for &str {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Primitive(Primitive::Str(Cow::Borrowed(*self)))
    }
}

impl ToWire for String {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Primitive(Primitive::Str(Cow::Borrowed(self.as_str())))
    }
}

impl ToWire for Cow<'_, str> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Primitive(Primitive::Str(Cow::Borrowed(self.as_ref())))
    }
}

macro_rules! copy_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToWire for $ty {
                fn to_wire(&self) -> WireValue<'_> {
                    WireValue::Primitive(Primitive::$variant(*self))
                }
            }
        )*
    };
}

copy_primitive!(i16 => I16, i32 => I32, i64 => I64, bool => Bool);

impl ToWire for Primitive<'_> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Primitive(match self {
            Primitive::Str(v) => Primitive::Str(Cow::Borrowed(v.as_ref())),
            Primitive::I16(v) => Primitive::I16(*v),
            Primitive::I32(v) => Primitive::I32(*v),
            Primitive::I64(v) => Primitive::I64(*v),
            Primitive::Bool(v) => Primitive::Bool(*v),
        })
    }
}

// ---- optional and nested ----------------------------------------------------

impl<T: ToWire> ToWire for Option<T> {
    fn to_wire(&self) -> WireValue<'_> {
        match self {
            Some(value) => value.to_wire(),
            None => WireValue::Absent,
        }
    }
}

impl<T: WireObject> ToWire for T {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Nested(self)
    }
}

// ---- sequences --------------------------------------------------------------

impl<T: ToWire> WireSequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = WireValue<'_>> + '_> {
        Box::new(self.iter().map(ToWire::to_wire))
    }
}

impl<T: ToWire> ToWire for Vec<T> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Sequence(self)
    }
}

impl<T: ToWire> WireSequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = WireValue<'_>> + '_> {
        Box::new(self.iter().map(ToWire::to_wire))
    }
}

impl<T: ToWire> ToWire for VecDeque<T> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Sequence(self)
    }
}

impl<T: ToWire, const N: usize> WireSequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn elements(&self) -> Box<dyn Iterator<Item = WireValue<'_>> + '_> {
        Box::new(self.iter().map(ToWire::to_wire))
    }
}

impl<T: ToWire, const N: usize> ToWire for [T; N] {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Sequence(self)
    }
}

// ---- maps -------------------------------------------------------------------

impl<K: ToWire, V: ToWire, S: BuildHasher> WireMap for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (WireValue<'_>, WireValue<'_>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.to_wire(), v.to_wire())))
    }
}

impl<K: ToWire, V: ToWire, S: BuildHasher> ToWire for HashMap<K, V, S> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Map(self)
    }
}

impl<K: ToWire, V: ToWire> WireMap for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (WireValue<'_>, WireValue<'_>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.to_wire(), v.to_wire())))
    }
}

impl<K: ToWire, V: ToWire> ToWire for BTreeMap<K, V> {
    fn to_wire(&self) -> WireValue<'_> {
        WireValue::Map(self)
    }
}
