//! Value: the leaf of the serialization tree
//!
//! A value is a named, tagged datum whose payload is the canonical
//! little-endian wire bytes of its scalar (or the recursive encoding for
//! composite tags). Keeping the payload in wire form makes `encode` a
//! straight copy and makes structural equality a byte comparison.
//!
//! Values do not point back at the container that owns them. Ownership
//! flows container → value only; any context a traversal needs is passed
//! down explicitly. This rules out reference cycles by construction.
//!
//! # Coercion rules
//!
//! - numeric ↔ numeric: static cast
//! - numeric → bool: non-zero
//! - string → numeric: decimal parse, 0 on any parse failure
//! - null → numeric/bool: fails with an illegal-coercion error
//! - bytes → string: UTF-8, lossy permitted

use crate::container::Container;
use crate::error::CodecError;
use crate::tag::{TagClass, ValueTag};
use std::fmt;

/// Maximum composite nesting depth, counted in composite levels including
/// the top-level container frame. Exceeding it fails construction and
/// decoding alike, so every constructible tree serializes to parseable
/// bytes.
pub const MAX_DEPTH: usize = 32;

/// A named, tagged datum. Payload bytes are always the canonical wire
/// representation for the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    name: String,
    tag: ValueTag,
    payload: Vec<u8>,
}

/// Decoded scalar view used by the coercing accessors.
enum Scalar {
    Signed(i64),
    Unsigned(u64),
    Floating(f64),
}

impl Value {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    /// The empty-payload null value.
    pub fn null(name: impl Into<String>) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Null,
            payload: Vec::new(),
        }
    }

    pub fn boolean(name: impl Into<String>, v: bool) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Bool,
            payload: vec![u8::from(v)],
        }
    }

    pub fn short(name: impl Into<String>, v: i16) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Short,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn ushort(name: impl Into<String>, v: u16) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::UShort,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn int(name: impl Into<String>, v: i32) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Int,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn uint(name: impl Into<String>, v: u32) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::UInt,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    /// Long takes a 64-bit input but serializes as 32-bit; inputs outside
    /// the `i32` range fail with a range-overflow error.
    pub fn long(name: impl Into<String>, v: i64) -> Result<Value, CodecError> {
        let narrowed = i32::try_from(v).map_err(|_| CodecError::RangeOverflow {
            tag: ValueTag::Long,
            value: v as i128,
        })?;
        Ok(Value {
            name: name.into(),
            tag: ValueTag::Long,
            payload: narrowed.to_le_bytes().to_vec(),
        })
    }

    /// ULong takes a 64-bit input but serializes as 32-bit; inputs outside
    /// the `u32` range fail with a range-overflow error.
    pub fn ulong(name: impl Into<String>, v: u64) -> Result<Value, CodecError> {
        let narrowed = u32::try_from(v).map_err(|_| CodecError::RangeOverflow {
            tag: ValueTag::ULong,
            value: v as i128,
        })?;
        Ok(Value {
            name: name.into(),
            tag: ValueTag::ULong,
            payload: narrowed.to_le_bytes().to_vec(),
        })
    }

    pub fn llong(name: impl Into<String>, v: i64) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::LLong,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn ullong(name: impl Into<String>, v: u64) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::ULLong,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn float(name: impl Into<String>, v: f32) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Float,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn double(name: impl Into<String>, v: f64) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Double,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn bytes(name: impl Into<String>, v: impl Into<Vec<u8>>) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Bytes,
            payload: v.into(),
        }
    }

    pub fn string(name: impl Into<String>, v: impl Into<String>) -> Value {
        Value {
            name: name.into(),
            tag: ValueTag::Str,
            payload: v.into().into_bytes(),
        }
    }

    /// Wrap a container as a nested value. Fails with depth-exceeded when
    /// the resulting tree would nest deeper than [`MAX_DEPTH`].
    pub fn container(name: impl Into<String>, c: &Container) -> Result<Value, CodecError> {
        let levels = 1 + c.value_levels();
        if levels > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { depth: levels });
        }
        Ok(Value {
            name: name.into(),
            tag: ValueTag::Container,
            payload: c.encode_body(),
        })
    }

    /// Build an array value from an ordered, possibly heterogeneous list
    /// of child values. Fails with depth-exceeded past [`MAX_DEPTH`].
    pub fn array(name: impl Into<String>, children: Vec<Value>) -> Result<Value, CodecError> {
        let levels = 1 + children.iter().map(Value::levels).max().unwrap_or(0);
        if levels > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { depth: levels });
        }
        let mut payload = Vec::new();
        payload.extend_from_slice(&(children.len() as u32).to_le_bytes());
        for child in &children {
            child.encode_into(&mut payload);
        }
        Ok(Value {
            name: name.into(),
            tag: ValueTag::Array,
            payload,
        })
    }

    /// Construct from raw payload bytes and a tag, validating the payload
    /// against the tag: fixed-width tags must match exactly, string
    /// payloads must be UTF-8, composite payloads must parse in full.
    pub fn from_payload(
        name: impl Into<String>,
        tag: ValueTag,
        payload: Vec<u8>,
    ) -> Result<Value, CodecError> {
        if let Some(width) = tag.fixed_width()
            && payload.len() != width
        {
            return Err(CodecError::BadLength {
                offset: 0,
                declared: payload.len() as u64,
                remaining: width,
            });
        }
        if tag == ValueTag::Str && std::str::from_utf8(&payload).is_err() {
            return Err(CodecError::BadUtf8 { offset: 0 });
        }
        let value = Value {
            name: name.into(),
            tag,
            payload,
        };
        if tag.class() == TagClass::Composite {
            // A full child decode both validates the framing and enforces
            // the depth limit.
            value.children()?;
        }
        Ok(value)
    }

    /// Trusted constructor for payloads the decoder has already validated.
    pub(crate) fn from_raw_parts(name: String, tag: ValueTag, payload: Vec<u8>) -> Value {
        Value { name, tag, payload }
    }

    /// The tag's newly-constructed default: zero scalars, empty flat
    /// payloads, empty composite bodies.
    pub fn default_for(tag: ValueTag) -> Value {
        let mut v = Value {
            name: String::new(),
            tag,
            payload: Vec::new(),
        };
        v.write_default_payload();
        v
    }

    /// Reinitialize in place to the tag's default, retaining the name and
    /// payload buffer capacities. Used by the value pool so a recycled
    /// value is indistinguishable from a fresh one.
    pub fn reset(&mut self, tag: ValueTag) {
        self.name.clear();
        self.tag = tag;
        self.write_default_payload();
    }

    fn write_default_payload(&mut self) {
        self.payload.clear();
        match self.tag {
            ValueTag::Container => {
                // Empty body: five empty header strings plus a zero count
                self.payload.extend_from_slice(&[0u8; 24]);
            }
            ValueTag::Array => {
                self.payload.extend_from_slice(&0u32.to_le_bytes());
            }
            tag => {
                if let Some(width) = tag.fixed_width() {
                    self.payload.resize(width, 0);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tag(&self) -> ValueTag {
        self.tag
    }

    /// Canonical wire payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn is_null(&self) -> bool {
        self.tag == ValueTag::Null
    }

    /// Decompose into owned parts. Used by the pool to recycle buffers.
    pub fn into_parts(self) -> (String, ValueTag, Vec<u8>) {
        (self.name, self.tag, self.payload)
    }

    /// Composite nesting levels below and including this value: 0 for
    /// scalars and flat payloads, 1 + deepest child for composites.
    pub(crate) fn levels(&self) -> usize {
        match self.tag.class() {
            TagClass::Composite => {
                let children = self.children().unwrap_or_default();
                1 + children.iter().map(Value::levels).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    // ------------------------------------------------------------------
    // Composite access
    // ------------------------------------------------------------------

    /// Ordered child values of a composite tag. Array children come from
    /// the count-prefixed frame sequence; container children are the
    /// nested container's value list.
    pub fn children(&self) -> Result<Vec<Value>, CodecError> {
        match self.tag {
            ValueTag::Array => crate::decode::decode_array_payload(&self.payload, 1),
            ValueTag::Container => Ok(self.as_container()?.into_values()),
            _ => Err(CodecError::TypeMismatch {
                expected: ValueTag::Array,
                actual: self.tag,
            }),
        }
    }

    /// Materialize a container-tagged payload as a [`Container`].
    pub fn as_container(&self) -> Result<Container, CodecError> {
        if self.tag != ValueTag::Container {
            return Err(CodecError::TypeMismatch {
                expected: ValueTag::Container,
                actual: self.tag,
            });
        }
        Container::from_body(&self.payload)
    }

    // ------------------------------------------------------------------
    // Wire encoding
    // ------------------------------------------------------------------

    /// Emit the value frame: `tag | name_len u32 LE | name | payload_len
    /// u32 LE | payload`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(9 + self.name.len() + self.payload.len());
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.tag.as_u8());
        out.extend_from_slice(&(self.name.len() as u32).to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
    }

    // ------------------------------------------------------------------
    // Coercing accessors
    // ------------------------------------------------------------------

    fn le_bytes<const N: usize>(&self) -> [u8; N] {
        // Constructors and the decoder guarantee payload widths, so a
        // zero-padded copy never actually pads.
        let mut buf = [0u8; N];
        let n = self.payload.len().min(N);
        buf[..n].copy_from_slice(&self.payload[..n]);
        buf
    }

    fn scalar(&self) -> Option<Scalar> {
        match self.tag {
            ValueTag::Bool => Some(Scalar::Signed(i64::from(self.payload.first().copied().unwrap_or(0) != 0))),
            ValueTag::Short => Some(Scalar::Signed(i64::from(i16::from_le_bytes(self.le_bytes())))),
            ValueTag::UShort => Some(Scalar::Unsigned(u64::from(u16::from_le_bytes(self.le_bytes())))),
            ValueTag::Int | ValueTag::Long => {
                Some(Scalar::Signed(i64::from(i32::from_le_bytes(self.le_bytes()))))
            }
            ValueTag::UInt | ValueTag::ULong => {
                Some(Scalar::Unsigned(u64::from(u32::from_le_bytes(self.le_bytes()))))
            }
            ValueTag::LLong => Some(Scalar::Signed(i64::from_le_bytes(self.le_bytes()))),
            ValueTag::ULLong => Some(Scalar::Unsigned(u64::from_le_bytes(self.le_bytes()))),
            ValueTag::Float => Some(Scalar::Floating(f64::from(f32::from_le_bytes(self.le_bytes())))),
            ValueTag::Double => Some(Scalar::Floating(f64::from_le_bytes(self.le_bytes()))),
            _ => None,
        }
    }

    fn coerce_err(&self, to: &'static str, expected: ValueTag) -> CodecError {
        if self.tag == ValueTag::Null {
            CodecError::IllegalCoercion {
                from: ValueTag::Null,
                to,
            }
        } else {
            CodecError::TypeMismatch {
                expected,
                actual: self.tag,
            }
        }
    }

    pub fn as_bool(&self) -> Result<bool, CodecError> {
        if self.tag == ValueTag::Str {
            let text = self.utf8_lossy();
            let text = text.trim();
            return Ok(match text {
                "true" => true,
                "false" => false,
                _ => text.parse::<i64>().unwrap_or(0) != 0,
            });
        }
        match self.scalar() {
            Some(Scalar::Signed(v)) => Ok(v != 0),
            Some(Scalar::Unsigned(v)) => Ok(v != 0),
            Some(Scalar::Floating(v)) => Ok(v != 0.0),
            None => Err(self.coerce_err("bool", ValueTag::Bool)),
        }
    }

    pub fn as_i16(&self) -> Result<i16, CodecError> {
        self.as_integer::<i16>("short", ValueTag::Short)
    }

    pub fn as_u16(&self) -> Result<u16, CodecError> {
        self.as_integer::<u16>("ushort", ValueTag::UShort)
    }

    pub fn as_i32(&self) -> Result<i32, CodecError> {
        self.as_integer::<i32>("int", ValueTag::Int)
    }

    pub fn as_u32(&self) -> Result<u32, CodecError> {
        self.as_integer::<u32>("uint", ValueTag::UInt)
    }

    pub fn as_i64(&self) -> Result<i64, CodecError> {
        self.as_integer::<i64>("llong", ValueTag::LLong)
    }

    pub fn as_u64(&self) -> Result<u64, CodecError> {
        self.as_integer::<u64>("ullong", ValueTag::ULLong)
    }

    fn as_integer<T>(&self, to: &'static str, expected: ValueTag) -> Result<T, CodecError>
    where
        T: Cast + std::str::FromStr + Default,
    {
        if self.tag == ValueTag::Str {
            return Ok(self.utf8_lossy().trim().parse::<T>().unwrap_or_default());
        }
        match self.scalar() {
            Some(Scalar::Signed(v)) => Ok(T::from_i64(v)),
            Some(Scalar::Unsigned(v)) => Ok(T::from_u64(v)),
            Some(Scalar::Floating(v)) => Ok(T::from_f64(v)),
            None => Err(self.coerce_err(to, expected)),
        }
    }

    pub fn as_f32(&self) -> Result<f32, CodecError> {
        Ok(self.as_f64_impl("float", ValueTag::Float)? as f32)
    }

    pub fn as_f64(&self) -> Result<f64, CodecError> {
        self.as_f64_impl("double", ValueTag::Double)
    }

    fn as_f64_impl(&self, to: &'static str, expected: ValueTag) -> Result<f64, CodecError> {
        if self.tag == ValueTag::Str {
            return Ok(self.utf8_lossy().trim().parse::<f64>().unwrap_or(0.0));
        }
        match self.scalar() {
            Some(Scalar::Signed(v)) => Ok(v as f64),
            Some(Scalar::Unsigned(v)) => Ok(v as f64),
            Some(Scalar::Floating(v)) => Ok(v),
            None => Err(self.coerce_err(to, expected)),
        }
    }

    fn utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// String rendering of the value. Null renders empty, scalars render
    /// in decimal, bytes decode as UTF-8 (lossy). Composite tags refuse.
    pub fn as_string(&self) -> Result<String, CodecError> {
        match self.tag {
            ValueTag::Null => Ok(String::new()),
            ValueTag::Str | ValueTag::Bytes => Ok(self.utf8_lossy()),
            ValueTag::Bool => Ok(if self.payload.first().copied().unwrap_or(0) != 0 {
                "true".to_string()
            } else {
                "false".to_string()
            }),
            ValueTag::Float => Ok(f32::from_le_bytes(self.le_bytes()).to_string()),
            ValueTag::Double => Ok(f64::from_le_bytes(self.le_bytes()).to_string()),
            _ => match self.scalar() {
                Some(Scalar::Signed(v)) => Ok(v.to_string()),
                Some(Scalar::Unsigned(v)) => Ok(v.to_string()),
                _ => Err(CodecError::TypeMismatch {
                    expected: ValueTag::Str,
                    actual: self.tag,
                }),
            },
        }
    }
}

/// Wrapping casts from the scalar view, matching static-cast semantics.
trait Cast {
    fn from_i64(v: i64) -> Self;
    fn from_u64(v: u64) -> Self;
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_cast {
    ($($t:ty),*) => {
        $(impl Cast for $t {
            fn from_i64(v: i64) -> Self { v as $t }
            fn from_u64(v: u64) -> Self { v as $t }
            fn from_f64(v: f64) -> Self { v as $t }
        })*
    };
}

impl_cast!(i16, u16, i32, u32, i64, u64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "_" } else { &self.name };
        match self.tag {
            ValueTag::Bytes => write!(f, "{}:{}:{}", name, self.tag, hex::encode(&self.payload)),
            ValueTag::Container => write!(f, "{}:{}:<container>", name, self.tag),
            ValueTag::Array => {
                let count = u32::from_le_bytes(self.le_bytes());
                write!(f, "{}:{}:<{} elements>", name, self.tag, count)
            }
            _ => {
                let rendered = self.as_string().unwrap_or_default();
                write!(f, "{}:{}:{}", name, self.tag, rendered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_payloads_are_canonical_le() {
        assert_eq!(Value::short("s", -2).payload(), &[0xfe, 0xff]);
        assert_eq!(Value::int("i", 1).payload(), &[1, 0, 0, 0]);
        assert_eq!(Value::uint("u", 0xdead_beef).payload(), &[0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(Value::llong("l", 1).payload().len(), 8);
        assert_eq!(Value::double("d", 1.0).payload(), &1.0f64.to_le_bytes());
    }

    #[test]
    fn test_long_range_enforcement() {
        // 3_000_000_000 fits neither in i32 nor in the long wire width
        let err = Value::long("n", 3_000_000_000).unwrap_err();
        assert!(matches!(err, CodecError::RangeOverflow { tag: ValueTag::Long, .. }));

        // The same magnitude is fine as llong
        let ok = Value::llong("n", 3_000_000_000);
        assert_eq!(ok.as_i64().unwrap(), 3_000_000_000);

        // Long serializes as exactly 4 bytes
        let v = Value::long("n", -5).unwrap();
        assert_eq!(v.payload().len(), 4);
        assert_eq!(v.as_i32().unwrap(), -5);
    }

    #[test]
    fn test_ulong_range_enforcement() {
        let err = Value::ulong("n", u64::from(u32::MAX) + 1).unwrap_err();
        assert!(matches!(err, CodecError::RangeOverflow { tag: ValueTag::ULong, .. }));
        let ok = Value::ulong("n", u64::from(u32::MAX)).unwrap();
        assert_eq!(ok.as_u32().unwrap(), u32::MAX);
    }

    #[test]
    fn test_null_to_numeric_is_illegal() {
        let v = Value::null("nothing");
        assert!(matches!(
            v.as_i32(),
            Err(CodecError::IllegalCoercion { from: ValueTag::Null, .. })
        ));
        assert!(matches!(v.as_bool(), Err(CodecError::IllegalCoercion { .. })));
        // But null renders as an empty string
        assert_eq!(v.as_string().unwrap(), "");
    }

    #[test]
    fn test_numeric_cross_casts() {
        let v = Value::double("pi", 3.9);
        assert_eq!(v.as_i32().unwrap(), 3, "float to int truncates");
        assert_eq!(v.as_u16().unwrap(), 3);
        let v = Value::int("neg", -1);
        assert_eq!(v.as_u32().unwrap(), u32::MAX, "signed to unsigned wraps");
        assert!(v.as_bool().unwrap());
    }

    #[test]
    fn test_string_parses_decimal_or_zero() {
        assert_eq!(Value::string("n", "42").as_i32().unwrap(), 42);
        assert_eq!(Value::string("n", " -7 ").as_i64().unwrap(), -7);
        assert_eq!(Value::string("n", "2.5").as_f64().unwrap(), 2.5);
        assert_eq!(Value::string("n", "not a number").as_i32().unwrap(), 0);
        assert_eq!(Value::string("n", "").as_u64().unwrap(), 0);
        assert!(Value::string("b", "true").as_bool().unwrap());
        assert!(!Value::string("b", "junk").as_bool().unwrap());
    }

    #[test]
    fn test_bytes_to_string_is_lossy() {
        let v = Value::bytes("raw", vec![0x68, 0x69, 0xff]);
        let s = v.as_string().unwrap();
        assert!(s.starts_with("hi"), "valid prefix survives: {:?}", s);
    }

    #[test]
    fn test_composite_accessor_mismatch() {
        let v = Value::int("n", 1);
        assert!(matches!(v.children(), Err(CodecError::TypeMismatch { .. })));
        let arr = Value::array("a", vec![Value::int("x", 1)]).unwrap();
        assert!(matches!(arr.as_i32(), Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_frame_layout() {
        let v = Value::boolean("ok", true);
        let frame = v.encode();
        // tag | name_len | name | payload_len | payload
        assert_eq!(frame[0], ValueTag::Bool.as_u8());
        assert_eq!(&frame[1..5], &2u32.to_le_bytes());
        assert_eq!(&frame[5..7], b"ok");
        assert_eq!(&frame[7..11], &1u32.to_le_bytes());
        assert_eq!(frame[11], 1);
        assert_eq!(frame.len(), 12);
    }

    #[test]
    fn test_array_children_roundtrip() {
        let arr = Value::array(
            "mixed",
            vec![
                Value::int("a", 1),
                Value::string("b", "two"),
                Value::null("c"),
            ],
        )
        .unwrap();
        let kids = arr.children().unwrap();
        assert_eq!(kids.len(), 3);
        assert_eq!(kids[0].as_i32().unwrap(), 1);
        assert_eq!(kids[1].as_string().unwrap(), "two");
        assert!(kids[2].is_null());
    }

    #[test]
    fn test_from_payload_validates_width() {
        let err = Value::from_payload("n", ValueTag::Int, vec![1, 2]).unwrap_err();
        assert!(matches!(err, CodecError::BadLength { .. }));
        let ok = Value::from_payload("n", ValueTag::Int, vec![1, 0, 0, 0]).unwrap();
        assert_eq!(ok.as_i32().unwrap(), 1);
    }

    #[test]
    fn test_from_payload_validates_utf8() {
        let err = Value::from_payload("s", ValueTag::Str, vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::BadUtf8 { .. }));
    }

    #[test]
    fn test_depth_limit_on_construction() {
        // 32 nested arrays build, 33 refuse
        let mut v = Value::array("leaf", vec![]).unwrap();
        for _ in 0..31 {
            v = Value::array("wrap", vec![v]).unwrap();
        }
        let too_deep = Value::array("wrap", vec![v]);
        assert!(matches!(
            too_deep,
            Err(CodecError::DepthExceeded { depth: 33 })
        ));
    }

    #[test]
    fn test_reset_looks_newly_constructed() {
        let mut v = Value::string("old-name", "some payload text");
        v.reset(ValueTag::Int);
        assert_eq!(v, Value::default_for(ValueTag::Int));
        assert_eq!(v.as_i32().unwrap(), 0);
        assert_eq!(v.name(), "");
    }

    #[test]
    fn test_default_for_composites_is_valid() {
        let c = Value::default_for(ValueTag::Container);
        assert_eq!(c.children().unwrap().len(), 0);
        let a = Value::default_for(ValueTag::Array);
        assert_eq!(a.children().unwrap().len(), 0);
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Value::int("n", 42).to_string(), "n:int:42");
        assert_eq!(Value::bytes("b", vec![0xde, 0xad]).to_string(), "b:bytes:dead");
        assert_eq!(Value::null("").to_string(), "_:null:");
    }
}
