//! Value factory: decoding frames from a byte cursor
//!
//! The decoder reads one tagged value at a time and advances the cursor.
//! Composite payloads are re-entered recursively, bounded by the declared
//! payload length and the nesting limit. All lengths are validated before
//! any byte is copied, and every error carries the offset of the failing
//! read.

use crate::container::Container;
use crate::error::CodecError;
use crate::tag::{TagClass, ValueTag};
use crate::value::{MAX_DEPTH, Value};

/// Byte cursor over an input buffer. Offsets reported in errors are
/// absolute positions in the original input, even for sub-cursors over
/// composite payloads.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Cursor<'a> {
        Cursor { buf, pos: 0, base: 0 }
    }

    /// Sub-cursor whose reported offsets are absolute in the outer input.
    fn with_base(buf: &'a [u8], base: usize) -> Cursor<'a> {
        Cursor { buf, pos: 0, base }
    }

    /// Absolute position of the next read.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_fixed::<1>()?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_fixed::<4>()?))
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        if self.remaining() < N {
            return Err(CodecError::ShortBuffer {
                offset: self.position(),
                needed: N,
                remaining: self.remaining(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Read a run of bytes whose length was declared in the input.
    /// `declared_at` is the offset of the length field, reported when the
    /// declaration overruns the buffer.
    fn read_declared(&mut self, len: u32, declared_at: usize) -> Result<&'a [u8], CodecError> {
        let len = len as usize;
        if self.remaining() < len {
            return Err(CodecError::BadLength {
                offset: declared_at,
                declared: len as u64,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a `u32 LE` length-prefixed UTF-8 string, as used by container
    /// header fields.
    pub(crate) fn read_lp_string(&mut self) -> Result<String, CodecError> {
        let len_at = self.position();
        let len = self.read_u32_le()?;
        let at = self.position();
        let bytes = self.read_declared(len, len_at)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::BadUtf8 { offset: at })
    }

    /// Fail unless the cursor has consumed its buffer in full. Composite
    /// payloads must not carry trailing bytes.
    fn expect_exhausted(&self) -> Result<(), CodecError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::BadLength {
                offset: self.position(),
                declared: self.remaining() as u64,
                remaining: 0,
            })
        }
    }
}

/// Decode one value frame, advancing the cursor past it.
///
/// `depth` counts enclosing composite levels; a composite encountered at
/// depth 32 would start level 33 and fails with depth-exceeded.
pub fn decode_value(cur: &mut Cursor<'_>, depth: usize) -> Result<Value, CodecError> {
    let frame_start = cur.position();
    let raw_tag = cur.read_u8()?;
    let tag = ValueTag::from_u8(raw_tag).ok_or(CodecError::UnknownTag {
        tag: raw_tag,
        offset: frame_start,
    })?;

    let name_len_at = cur.position();
    let name_len = cur.read_u32_le()?;
    let name_at = cur.position();
    let name_bytes = cur.read_declared(name_len, name_len_at)?;
    let name = std::str::from_utf8(name_bytes)
        .map_err(|_| CodecError::BadUtf8 { offset: name_at })?
        .to_string();

    let payload_len_at = cur.position();
    let payload_len = cur.read_u32_le()?;
    let payload_at = cur.position();
    let payload = cur.read_declared(payload_len, payload_len_at)?;

    if let Some(width) = tag.fixed_width()
        && payload.len() != width
    {
        return Err(CodecError::BadLength {
            offset: payload_len_at,
            declared: u64::from(payload_len),
            remaining: width,
        });
    }

    match tag.class() {
        TagClass::Composite => {
            if depth >= MAX_DEPTH {
                tracing::debug!(offset = frame_start, "nesting limit hit while decoding");
                return Err(CodecError::DepthExceeded { depth: depth + 1 });
            }
            let mut sub = Cursor::with_base(payload, payload_at);
            match tag {
                ValueTag::Array => {
                    let count = sub.read_u32_le()?;
                    for _ in 0..count {
                        decode_value(&mut sub, depth + 1)?;
                    }
                }
                _ => {
                    Container::decode_body(&mut sub, depth + 1)?;
                }
            }
            sub.expect_exhausted()?;
        }
        TagClass::BytesLike => {
            if tag == ValueTag::Str && std::str::from_utf8(payload).is_err() {
                return Err(CodecError::BadUtf8 { offset: payload_at });
            }
        }
        TagClass::Primitive => {}
    }

    Ok(Value::from_raw_parts(name, tag, payload.to_vec()))
}

/// Decode a single frame from the front of `bytes`, returning the value
/// and the number of bytes consumed.
pub fn decode_one(bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    let mut cur = Cursor::new(bytes);
    let value = decode_value(&mut cur, 0)?;
    Ok((value, cur.position()))
}

/// Materialize the children of an array payload: `count u32 LE` then that
/// many frames, with no trailing bytes. `child_depth` is the nesting level
/// the children sit at.
pub(crate) fn decode_array_payload(
    payload: &[u8],
    child_depth: usize,
) -> Result<Vec<Value>, CodecError> {
    let mut cur = Cursor::new(payload);
    let count = cur.read_u32_le()?;
    let mut children = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        children.push(decode_value(&mut cur, child_depth)?);
    }
    cur.expect_exhausted()?;
    Ok(children)
}
