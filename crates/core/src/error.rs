//! Error taxonomy for the codec and container layers
//!
//! Every failure surfaces as a structured [`CodecError`]; nothing is caught
//! and swallowed internally. Decode-side variants carry the byte offset of
//! the failing read so malformed input can be located in the source buffer.

use crate::tag::ValueTag;

/// Structured error for construction, coercion, encoding and decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Input ended in the middle of a frame's fixed-size field
    ShortBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Wire byte outside the closed tag set
    UnknownTag { tag: u8, offset: usize },
    /// A declared length is inconsistent with the remaining buffer
    BadLength {
        offset: usize,
        declared: u64,
        remaining: usize,
    },
    /// Ill-formed UTF-8 where UTF-8 is required (names, string payloads)
    BadUtf8 { offset: usize },
    /// Text-format or projection input that does not match the grammar
    BadSyntax {
        offset: usize,
        expected: &'static str,
    },
    /// A long/ulong construction outside the 32-bit wire range
    RangeOverflow { tag: ValueTag, value: i128 },
    /// Accessor request incompatible with the stored tag
    TypeMismatch { expected: ValueTag, actual: ValueTag },
    /// A coercion the type system forbids, e.g. null to numeric
    IllegalCoercion { from: ValueTag, to: &'static str },
    /// Nesting deeper than the 32-level limit
    DepthExceeded { depth: usize },
    /// A pool acquire with fallback allocation disallowed found no slot
    PoolExhausted { tag: ValueTag },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::ShortBuffer {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "input ended mid-frame at offset {}: needed {} bytes, {} remaining",
                offset, needed, remaining
            ),
            CodecError::UnknownTag { tag, offset } => {
                write!(f, "unknown tag byte 0x{:02x} at offset {}", tag, offset)
            }
            CodecError::BadLength {
                offset,
                declared,
                remaining,
            } => write!(
                f,
                "declared length {} at offset {} is inconsistent with {} available bytes",
                declared, offset, remaining
            ),
            CodecError::BadUtf8 { offset } => {
                write!(f, "ill-formed UTF-8 at offset {}", offset)
            }
            CodecError::BadSyntax { offset, expected } => {
                write!(f, "expected {} at offset {}", expected, offset)
            }
            CodecError::RangeOverflow { tag, value } => {
                write!(f, "{} cannot carry {}: outside the 32-bit wire range", tag, value)
            }
            CodecError::TypeMismatch { expected, actual } => {
                write!(f, "expected a {} value, found {}", expected, actual)
            }
            CodecError::IllegalCoercion { from, to } => {
                write!(f, "cannot coerce {} to {}", from, to)
            }
            CodecError::DepthExceeded { depth } => {
                write!(f, "nesting depth {} exceeds the limit of 32", depth)
            }
            CodecError::PoolExhausted { tag } => {
                write!(f, "value pool for {} is empty and fallback allocation was declined", tag)
            }
        }
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_offsets() {
        let err = CodecError::ShortBuffer {
            offset: 7,
            needed: 4,
            remaining: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 7"), "message should locate the failure: {}", msg);
        assert!(msg.contains("needed 4"));
    }

    #[test]
    fn test_display_unknown_tag_is_hex() {
        let err = CodecError::UnknownTag { tag: 0x7f, offset: 0 };
        assert!(err.to_string().contains("0x7f"));
    }

    #[test]
    fn test_error_trait_object() {
        // The taxonomy must be usable through dyn Error like any other
        // library error.
        let err: Box<dyn std::error::Error> = Box::new(CodecError::DepthExceeded { depth: 33 });
        assert!(err.to_string().contains("33"));
    }
}
