//! Parcel core: typed data containers and the wire codec
//!
//! A container carries a routing header (source and target identities plus
//! a message type) and an ordered, multi-keyed list of typed values. This
//! crate owns the data model and the codecs:
//!
//! - `tag`: the closed sixteen-kind type registry
//! - `value`: named, tagged values with canonical little-endian payloads
//! - `decode`: the frame decoder (byte cursor in, value out)
//! - `container`: the container model and serialization driver
//! - `text`: the lossless `@header=..;@data=..;` text format
//! - `json` / `xml`: opt-in structural projections for interop
//! - `error`: the structured failure taxonomy
//!
//! The binary format is normative: its bytes are the interchange format,
//! and every encoding this crate produces parses back to a structurally
//! equal tree. Thread-safe access and value pooling live in the
//! `parcel-shared` crate on top of these types.

pub mod container;
pub mod decode;
pub mod error;
pub mod json;
pub mod tag;
pub mod text;
pub mod value;
pub mod xml;

// Re-export the types nearly every caller needs
pub use container::{Container, WireFormat};
pub use decode::{Cursor, decode_one, decode_value};
pub use error::CodecError;
pub use tag::{ALL_TAGS, TagClass, ValueTag};
pub use value::{MAX_DEPTH, Value};

// Projection entry points (opt-in; the binary format is normative)
pub use json::{from_json_str, to_json_string};
pub use xml::{from_xml_str, to_xml_string};
