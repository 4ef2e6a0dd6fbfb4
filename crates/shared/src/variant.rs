//! Variant values: decoded-scalar representation
//!
//! A [`VariantValue`] carries the same information as a `Value` but stores
//! decoded scalars instead of payload bytes, which makes pattern matching
//! the natural access style. The thread-safe container offers variant
//! getters and setters for exactly that reason.
//!
//! Wire behavior is delegated to the Value codec through the bridge, so a
//! variant's serialized bytes are bit-identical to those of the
//! corresponding `Value`.

use crate::bridge;
use parcel_core::{CodecError, Container, Value, ValueTag, decode_one};

/// Sum over the sixteen wire tags with decoded payloads.
///
/// `Long`/`ULong` are kept distinct from `LLong`/`ULLong` even though they
/// carry the same Rust scalars: the wire tag is part of value identity and
/// the bridge must stay invertible. Long/ULong contents must fit 32 bits;
/// the checked constructors on [`VariantValue`] enforce that, and the
/// bridge re-checks values built directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Null,
    Bool(bool),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    LLong(i64),
    ULLong(u64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Str(String),
    Container(Box<Container>),
    Array(Vec<VariantValue>),
}

impl Variant {
    /// The wire tag this alternative maps to.
    pub fn tag(&self) -> ValueTag {
        match self {
            Variant::Null => ValueTag::Null,
            Variant::Bool(_) => ValueTag::Bool,
            Variant::Short(_) => ValueTag::Short,
            Variant::UShort(_) => ValueTag::UShort,
            Variant::Int(_) => ValueTag::Int,
            Variant::UInt(_) => ValueTag::UInt,
            Variant::Long(_) => ValueTag::Long,
            Variant::ULong(_) => ValueTag::ULong,
            Variant::LLong(_) => ValueTag::LLong,
            Variant::ULLong(_) => ValueTag::ULLong,
            Variant::Float(_) => ValueTag::Float,
            Variant::Double(_) => ValueTag::Double,
            Variant::Bytes(_) => ValueTag::Bytes,
            Variant::Str(_) => ValueTag::Str,
            Variant::Container(_) => ValueTag::Container,
            Variant::Array(_) => ValueTag::Array,
        }
    }
}

/// A named variant: the decoded-scalar twin of `Value`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantValue {
    pub name: String,
    pub data: Variant,
}

impl VariantValue {
    pub fn new(name: impl Into<String>, data: Variant) -> VariantValue {
        VariantValue {
            name: name.into(),
            data,
        }
    }

    pub fn null(name: impl Into<String>) -> VariantValue {
        VariantValue::new(name, Variant::Null)
    }

    pub fn boolean(name: impl Into<String>, v: bool) -> VariantValue {
        VariantValue::new(name, Variant::Bool(v))
    }

    pub fn short(name: impl Into<String>, v: i16) -> VariantValue {
        VariantValue::new(name, Variant::Short(v))
    }

    pub fn ushort(name: impl Into<String>, v: u16) -> VariantValue {
        VariantValue::new(name, Variant::UShort(v))
    }

    pub fn int(name: impl Into<String>, v: i32) -> VariantValue {
        VariantValue::new(name, Variant::Int(v))
    }

    pub fn uint(name: impl Into<String>, v: u32) -> VariantValue {
        VariantValue::new(name, Variant::UInt(v))
    }

    /// Checked: the value must fit the 32-bit long wire width.
    pub fn long(name: impl Into<String>, v: i64) -> Result<VariantValue, CodecError> {
        if i32::try_from(v).is_err() {
            return Err(CodecError::RangeOverflow {
                tag: ValueTag::Long,
                value: v as i128,
            });
        }
        Ok(VariantValue::new(name, Variant::Long(v)))
    }

    /// Checked: the value must fit the 32-bit ulong wire width.
    pub fn ulong(name: impl Into<String>, v: u64) -> Result<VariantValue, CodecError> {
        if u32::try_from(v).is_err() {
            return Err(CodecError::RangeOverflow {
                tag: ValueTag::ULong,
                value: v as i128,
            });
        }
        Ok(VariantValue::new(name, Variant::ULong(v)))
    }

    pub fn llong(name: impl Into<String>, v: i64) -> VariantValue {
        VariantValue::new(name, Variant::LLong(v))
    }

    pub fn ullong(name: impl Into<String>, v: u64) -> VariantValue {
        VariantValue::new(name, Variant::ULLong(v))
    }

    pub fn float(name: impl Into<String>, v: f32) -> VariantValue {
        VariantValue::new(name, Variant::Float(v))
    }

    pub fn double(name: impl Into<String>, v: f64) -> VariantValue {
        VariantValue::new(name, Variant::Double(v))
    }

    pub fn bytes(name: impl Into<String>, v: impl Into<Vec<u8>>) -> VariantValue {
        VariantValue::new(name, Variant::Bytes(v.into()))
    }

    pub fn string(name: impl Into<String>, v: impl Into<String>) -> VariantValue {
        VariantValue::new(name, Variant::Str(v.into()))
    }

    pub fn container(name: impl Into<String>, c: Container) -> VariantValue {
        VariantValue::new(name, Variant::Container(Box::new(c)))
    }

    pub fn array(name: impl Into<String>, children: Vec<VariantValue>) -> VariantValue {
        VariantValue::new(name, Variant::Array(children))
    }

    pub fn tag(&self) -> ValueTag {
        self.data.tag()
    }

    /// Wire bytes, bit-identical to the corresponding `Value` frame.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        Ok(bridge::to_value(self)?.encode())
    }

    /// Parse one frame and convert. The buffer must hold exactly one
    /// frame.
    pub fn deserialize(bytes: &[u8]) -> Result<VariantValue, CodecError> {
        let (value, consumed) = decode_one(bytes)?;
        if consumed != bytes.len() {
            return Err(CodecError::BadLength {
                offset: consumed,
                declared: (bytes.len() - consumed) as u64,
                remaining: 0,
            });
        }
        bridge::to_variant(&value)
    }
}

impl TryFrom<&Value> for VariantValue {
    type Error = CodecError;

    fn try_from(value: &Value) -> Result<VariantValue, CodecError> {
        bridge::to_variant(value)
    }
}

impl TryFrom<&VariantValue> for Value {
    type Error = CodecError;

    fn try_from(variant: &VariantValue) -> Result<Value, CodecError> {
        bridge::to_value(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_tags_map_one_to_one() {
        assert_eq!(VariantValue::null("").tag(), ValueTag::Null);
        assert_eq!(VariantValue::long("", 1).unwrap().tag(), ValueTag::Long);
        assert_eq!(VariantValue::llong("", 1).tag(), ValueTag::LLong);
        assert_eq!(
            VariantValue::array("", vec![]).tag(),
            ValueTag::Array
        );
    }

    #[test]
    fn test_checked_long_constructors() {
        assert!(VariantValue::long("n", 3_000_000_000).is_err());
        assert!(VariantValue::ulong("n", u64::from(u32::MAX) + 1).is_err());
        assert!(VariantValue::long("n", i64::from(i32::MIN)).is_ok());
    }

    #[test]
    #[serial]
    fn test_wire_bytes_match_value_codec() {
        let variant = VariantValue::int("n", 42);
        let value = Value::int("n", 42);
        assert_eq!(variant.serialize().unwrap(), value.encode());
    }

    #[test]
    #[serial]
    fn test_serialize_deserialize_roundtrip() {
        let mut inner = Container::new();
        inner.set_message_type("inner");
        let variant = VariantValue::array(
            "a",
            vec![
                VariantValue::string("s", "text"),
                VariantValue::container("c", inner),
            ],
        );
        let bytes = variant.serialize().unwrap();
        let back = VariantValue::deserialize(&bytes).unwrap();
        assert_eq!(back, variant);
    }

    #[test]
    #[serial]
    fn test_trailing_bytes_rejected() {
        let mut bytes = VariantValue::int("n", 1).serialize().unwrap();
        bytes.push(0);
        assert!(matches!(
            VariantValue::deserialize(&bytes),
            Err(CodecError::BadLength { .. })
        ));
    }
}
