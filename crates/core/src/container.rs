//! Container: a routed, ordered multimap of values
//!
//! A container is the unit of serialization: a five-field routing header
//! (source id + sub-id, target id + sub-id, message type) plus an ordered
//! list of owned values. Names are not unique; duplicates keep insertion
//! order, and serialization emits frames in exactly that order.
//!
//! The binary form is normative. A serialized container is a single
//! container-tagged frame, so the first byte of any binary encoding is a
//! tag byte in `0x00..=0x0F` and can never collide with the text format's
//! leading `@`.

use crate::decode::{Cursor, decode_value};
use crate::error::CodecError;
use crate::tag::ValueTag;
use crate::value::{MAX_DEPTH, Value};
use std::fmt;

/// Serialization-format preference. Binary is the canonical interchange
/// format; the others are lossless (text) or structurally-faithful
/// (JSON/XML) projections for interop and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Binary,
    Text,
    /// Same bytes as Binary, returned as an opaque byte container
    ArrayBinary,
    Json,
    Xml,
}

/// Routed, ordered, multi-keyed collection of typed values.
#[derive(Debug, Clone)]
pub struct Container {
    source_id: String,
    source_sub_id: String,
    target_id: String,
    target_sub_id: String,
    message_type: String,
    values: Vec<Value>,
    format: WireFormat,
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

// Equality is the wire-observable state: header and ordered values. The
// format preference is a local emission setting, not part of identity.
impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
            && self.source_sub_id == other.source_sub_id
            && self.target_id == other.target_id
            && self.target_sub_id == other.target_sub_id
            && self.message_type == other.message_type
            && self.values == other.values
    }
}

impl Eq for Container {}

impl Container {
    pub fn new() -> Container {
        Container {
            source_id: String::new(),
            source_sub_id: String::new(),
            target_id: String::new(),
            target_sub_id: String::new(),
            message_type: String::new(),
            values: Vec::new(),
            format: WireFormat::Binary,
        }
    }

    // ------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------

    pub fn set_source(&mut self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.source_id = id.into();
        self.source_sub_id = sub_id.into();
    }

    pub fn set_target(&mut self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.target_id = id.into();
        self.target_sub_id = sub_id.into();
    }

    pub fn set_message_type(&mut self, message_type: impl Into<String>) {
        self.message_type = message_type.into();
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source_sub_id(&self) -> &str {
        &self.source_sub_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn target_sub_id(&self) -> &str {
        &self.target_sub_id
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn set_format(&mut self, format: WireFormat) {
        self.format = format;
    }

    // ------------------------------------------------------------------
    // Value list
    // ------------------------------------------------------------------

    /// Append a value. Duplicate names are kept; insertion order is the
    /// serialization order. Fails with depth-exceeded when the value would
    /// nest the container past the limit, leaving the container unchanged.
    pub fn add(&mut self, value: Value) -> Result<(), CodecError> {
        let depth = 1 + value.levels();
        if depth > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { depth });
        }
        self.values.push(value);
        Ok(())
    }

    /// First value with the given name, cloned; a null-tagged sentinel
    /// carrying the requested name when absent. Never fails.
    pub fn get_value(&self, name: &str) -> Value {
        match self.find(name) {
            Some(v) => v.clone(),
            None => Value::null(name),
        }
    }

    /// Borrowing variant of [`Container::get_value`].
    pub fn find(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|v| v.name() == name)
    }

    /// All values with the given name, cloned, in insertion order.
    pub fn value_array(&self, name: &str) -> Vec<Value> {
        self.values
            .iter()
            .filter(|v| v.name() == name)
            .cloned()
            .collect()
    }

    /// Remove every value with the given name. Idempotent; returns the
    /// number removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.values.len();
        self.values.retain(|v| v.name() != name);
        before - self.values.len()
    }

    /// Drop all values; the header is preserved.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Clone the header (and format preference); with `deep`, clone every
    /// value as well.
    pub fn copy(&self, deep: bool) -> Container {
        Container {
            source_id: self.source_id.clone(),
            source_sub_id: self.source_sub_id.clone(),
            target_id: self.target_id.clone(),
            target_sub_id: self.target_sub_id.clone(),
            message_type: self.message_type.clone(),
            values: if deep { self.values.clone() } else { Vec::new() },
            format: self.format,
        }
    }

    /// Concatenate the other container's values in order. The header is
    /// unchanged; name collisions become duplicates.
    pub fn merge(&mut self, other: &Container) {
        self.values.extend(other.values.iter().cloned());
    }

    /// Deepest composite nesting among held values.
    pub(crate) fn value_levels(&self) -> usize {
        self.values.iter().map(Value::levels).max().unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Wire codec
    // ------------------------------------------------------------------

    /// Encode the container body: five length-prefixed header strings in
    /// {source_id, source_sub_id, target_id, target_sub_id, message_type}
    /// order, then `value_count: u32 LE` and the value frames.
    pub(crate) fn encode_body(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for field in [
            &self.source_id,
            &self.source_sub_id,
            &self.target_id,
            &self.target_sub_id,
            &self.message_type,
        ] {
            out.extend_from_slice(&(field.len() as u32).to_le_bytes());
            out.extend_from_slice(field.as_bytes());
        }
        out.extend_from_slice(&(self.values.len() as u32).to_le_bytes());
        for value in &self.values {
            value.encode_into(&mut out);
        }
        out
    }

    /// Decode a container body from the cursor. `depth` is the nesting
    /// level the held values sit at.
    pub(crate) fn decode_body(cur: &mut Cursor<'_>, depth: usize) -> Result<Container, CodecError> {
        let mut c = Container::new();
        c.source_id = cur.read_lp_string()?;
        c.source_sub_id = cur.read_lp_string()?;
        c.target_id = cur.read_lp_string()?;
        c.target_sub_id = cur.read_lp_string()?;
        c.message_type = cur.read_lp_string()?;
        let count = cur.read_u32_le()?;
        for _ in 0..count {
            // Frames on the wire were depth-validated as they were read,
            // so push directly instead of re-measuring through add()
            c.values.push(decode_value(cur, depth)?);
        }
        Ok(c)
    }

    /// Parse a standalone container body (the payload of a container
    /// frame), requiring full consumption.
    pub(crate) fn from_body(bytes: &[u8]) -> Result<Container, CodecError> {
        let mut cur = Cursor::new(bytes);
        let c = Container::decode_body(&mut cur, 1)?;
        if !cur.is_empty() {
            return Err(CodecError::BadLength {
                offset: cur.position(),
                declared: cur.remaining() as u64,
                remaining: 0,
            });
        }
        Ok(c)
    }

    /// The normative binary encoding: one container-tagged frame with an
    /// empty name wrapping the body.
    pub fn serialize_binary(&self) -> Vec<u8> {
        let body = self.encode_body();
        let mut out = Vec::with_capacity(9 + body.len());
        out.push(ValueTag::Container.as_u8());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// Serialize according to the container's format preference.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        match self.format {
            WireFormat::Binary | WireFormat::ArrayBinary => Ok(self.serialize_binary()),
            WireFormat::Text => Ok(crate::text::encode(self).into_bytes()),
            WireFormat::Json => Ok(crate::json::to_json_string(self)?.into_bytes()),
            WireFormat::Xml => Ok(crate::xml::to_xml_string(self).into_bytes()),
        }
    }

    /// The binary bytes as an opaque byte vector, independent of the
    /// format preference.
    pub fn serialize_array(&self) -> Vec<u8> {
        self.serialize_binary()
    }

    /// Parse a serialized container, auto-detecting the format: a leading
    /// `@` selects the text form, anything else is binary. On error the
    /// receiver is left untouched; on success the header and values are
    /// replaced while the local format preference is kept.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let parsed = Container::parse(bytes)?;
        let format = self.format;
        *self = parsed;
        self.format = format;
        Ok(())
    }

    /// Parse a serialized container into a fresh instance.
    pub fn parse(bytes: &[u8]) -> Result<Container, CodecError> {
        let first = *bytes.first().ok_or(CodecError::ShortBuffer {
            offset: 0,
            needed: 1,
            remaining: 0,
        })?;
        if first == b'@' {
            tracing::debug!(len = bytes.len(), "deserializing text container");
            let text = std::str::from_utf8(bytes).map_err(|_| CodecError::BadUtf8 { offset: 0 })?;
            return crate::text::decode(text);
        }

        tracing::debug!(len = bytes.len(), "deserializing binary container");
        let mut cur = Cursor::new(bytes);
        let mut frames = Vec::new();
        while !cur.is_empty() {
            frames.push(decode_value(&mut cur, 0)?);
        }
        // A single container frame is a serialized container; anything
        // else is a bare frame sequence adopted under an empty header.
        if frames.len() == 1 && frames[0].tag() == ValueTag::Container {
            return frames[0].as_container();
        }
        let mut c = Container::new();
        c.values = frames;
        Ok(c)
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{} -> {}] type={} ({} values)",
            join_id(&self.source_id, &self.source_sub_id),
            join_id(&self.target_id, &self.target_sub_id),
            self.message_type,
            self.values.len()
        )?;
        for value in &self.values {
            writeln!(f, "  {}", value)?;
        }
        Ok(())
    }
}

fn join_id(id: &str, sub: &str) -> String {
    if sub.is_empty() {
        id.to_string()
    } else {
        format!("{}/{}", id, sub)
    }
}
