//! The closed value-kind registry
//!
//! Every datum on the wire carries one of sixteen tags. The tag set is
//! versioned with the wire format itself: adding a kind is a format change,
//! so the enum is exhaustive and conversion from raw bytes is checked.
//!
//! Tags are grouped into three classes for generic traversal:
//! - **Primitive**: fixed-width scalars (null through double)
//! - **BytesLike**: length-prefixed flat payloads (bytes, string)
//! - **Composite**: payloads that are themselves frames (container, array)

use std::fmt;

/// Wire tag for a value, one of the sixteen closed kinds.
///
/// The discriminants are the on-wire byte values and must never be
/// renumbered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Null = 0,
    Bool = 1,
    Short = 2,
    UShort = 3,
    Int = 4,
    UInt = 5,
    /// Signed 32-bit on the wire; construction range-checks a 64-bit input.
    Long = 6,
    /// Unsigned 32-bit on the wire; construction range-checks a 64-bit input.
    ULong = 7,
    LLong = 8,
    ULLong = 9,
    Float = 10,
    Double = 11,
    Bytes = 12,
    Container = 13,
    Str = 14,
    Array = 15,
}

/// Classification of a tag for generic traversal dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Fixed-width scalar payload (possibly empty, for null)
    Primitive,
    /// Length-prefixed flat payload (opaque bytes or UTF-8 text)
    BytesLike,
    /// Payload is itself a sequence of frames
    Composite,
}

/// All tags in wire order. Handy for table-driven tests and pool layout.
pub const ALL_TAGS: [ValueTag; 16] = [
    ValueTag::Null,
    ValueTag::Bool,
    ValueTag::Short,
    ValueTag::UShort,
    ValueTag::Int,
    ValueTag::UInt,
    ValueTag::Long,
    ValueTag::ULong,
    ValueTag::LLong,
    ValueTag::ULLong,
    ValueTag::Float,
    ValueTag::Double,
    ValueTag::Bytes,
    ValueTag::Container,
    ValueTag::Str,
    ValueTag::Array,
];

impl ValueTag {
    /// Convert a raw wire byte to a tag. Returns `None` for bytes outside
    /// the closed set; the decoder turns that into an unknown-tag error
    /// carrying the failing offset.
    pub fn from_u8(raw: u8) -> Option<ValueTag> {
        match raw {
            0 => Some(ValueTag::Null),
            1 => Some(ValueTag::Bool),
            2 => Some(ValueTag::Short),
            3 => Some(ValueTag::UShort),
            4 => Some(ValueTag::Int),
            5 => Some(ValueTag::UInt),
            6 => Some(ValueTag::Long),
            7 => Some(ValueTag::ULong),
            8 => Some(ValueTag::LLong),
            9 => Some(ValueTag::ULLong),
            10 => Some(ValueTag::Float),
            11 => Some(ValueTag::Double),
            12 => Some(ValueTag::Bytes),
            13 => Some(ValueTag::Container),
            14 => Some(ValueTag::Str),
            15 => Some(ValueTag::Array),
            _ => None,
        }
    }

    /// The tag's wire byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Canonical lower-case name, as used by the text format and the
    /// projections.
    pub fn name(self) -> &'static str {
        match self {
            ValueTag::Null => "null",
            ValueTag::Bool => "bool",
            ValueTag::Short => "short",
            ValueTag::UShort => "ushort",
            ValueTag::Int => "int",
            ValueTag::UInt => "uint",
            ValueTag::Long => "long",
            ValueTag::ULong => "ulong",
            ValueTag::LLong => "llong",
            ValueTag::ULLong => "ullong",
            ValueTag::Float => "float",
            ValueTag::Double => "double",
            ValueTag::Bytes => "bytes",
            ValueTag::Container => "container",
            ValueTag::Str => "string",
            ValueTag::Array => "array",
        }
    }

    /// Inverse of [`ValueTag::name`].
    pub fn from_name(name: &str) -> Option<ValueTag> {
        match name {
            "null" => Some(ValueTag::Null),
            "bool" => Some(ValueTag::Bool),
            "short" => Some(ValueTag::Short),
            "ushort" => Some(ValueTag::UShort),
            "int" => Some(ValueTag::Int),
            "uint" => Some(ValueTag::UInt),
            "long" => Some(ValueTag::Long),
            "ulong" => Some(ValueTag::ULong),
            "llong" => Some(ValueTag::LLong),
            "ullong" => Some(ValueTag::ULLong),
            "float" => Some(ValueTag::Float),
            "double" => Some(ValueTag::Double),
            "bytes" => Some(ValueTag::Bytes),
            "container" => Some(ValueTag::Container),
            "string" => Some(ValueTag::Str),
            "array" => Some(ValueTag::Array),
            _ => None,
        }
    }

    /// Traversal class for this tag.
    pub fn class(self) -> TagClass {
        match self {
            ValueTag::Null
            | ValueTag::Bool
            | ValueTag::Short
            | ValueTag::UShort
            | ValueTag::Int
            | ValueTag::UInt
            | ValueTag::Long
            | ValueTag::ULong
            | ValueTag::LLong
            | ValueTag::ULLong
            | ValueTag::Float
            | ValueTag::Double => TagClass::Primitive,
            ValueTag::Bytes | ValueTag::Str => TagClass::BytesLike,
            ValueTag::Container | ValueTag::Array => TagClass::Composite,
        }
    }

    /// Exact payload width for fixed-width tags, `None` for
    /// variable-length ones. Null has an empty payload, hence `Some(0)`.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ValueTag::Null => Some(0),
            ValueTag::Bool => Some(1),
            ValueTag::Short | ValueTag::UShort => Some(2),
            // Long/ULong are range-checked into 32 bits on the wire
            ValueTag::Int
            | ValueTag::UInt
            | ValueTag::Long
            | ValueTag::ULong
            | ValueTag::Float => Some(4),
            ValueTag::LLong | ValueTag::ULLong | ValueTag::Double => Some(8),
            ValueTag::Bytes | ValueTag::Container | ValueTag::Str | ValueTag::Array => None,
        }
    }

    /// True for the integer tags (bool excluded).
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ValueTag::Short
                | ValueTag::UShort
                | ValueTag::Int
                | ValueTag::UInt
                | ValueTag::Long
                | ValueTag::ULong
                | ValueTag::LLong
                | ValueTag::ULLong
        )
    }

    /// True for float and double.
    pub fn is_floating(self) -> bool {
        matches!(self, ValueTag::Float | ValueTag::Double)
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
