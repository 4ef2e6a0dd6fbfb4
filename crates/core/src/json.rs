//! JSON projection
//!
//! An opt-in projection for debugging and interop. It is not the
//! normative format and does not round-trip bit-identically (base64 for
//! opaque bytes, string literals for non-finite floats), but it preserves
//! the value tree under structural equality in both directions.
//!
//! The container is mirrored into serde-derived shapes and handed to
//! serde_json; each entry carries its tag name so the reader can coerce
//! the JSON value back to the exact wire kind.

use crate::container::Container;
use crate::error::CodecError;
use crate::tag::ValueTag;
use crate::value::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct JsonContainer {
    header: JsonHeader,
    values: Vec<JsonEntry>,
}

// Missing header keys read as empty routing fields
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct JsonHeader {
    source_id: String,
    source_sub_id: String,
    target_id: String,
    target_sub_id: String,
    message_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    value: serde_json::Value,
}

fn syntax(expected: &'static str) -> CodecError {
    CodecError::BadSyntax { offset: 0, expected }
}

/// Render a container as a JSON document.
pub fn to_json_string(c: &Container) -> Result<String, CodecError> {
    let mirror = mirror_container(c)?;
    serde_json::to_string(&mirror).map_err(|_| syntax("serializable container"))
}

/// Parse the JSON projection back into a container.
pub fn from_json_str(s: &str) -> Result<Container, CodecError> {
    let mirror: JsonContainer = serde_json::from_str(s).map_err(|_| syntax("container JSON"))?;
    restore_container(mirror)
}

fn mirror_container(c: &Container) -> Result<JsonContainer, CodecError> {
    let mut values = Vec::with_capacity(c.len());
    for value in c {
        values.push(mirror_entry(value)?);
    }
    Ok(JsonContainer {
        header: JsonHeader {
            source_id: c.source_id().to_string(),
            source_sub_id: c.source_sub_id().to_string(),
            target_id: c.target_id().to_string(),
            target_sub_id: c.target_sub_id().to_string(),
            message_type: c.message_type().to_string(),
        },
        values,
    })
}

fn mirror_entry(value: &Value) -> Result<JsonEntry, CodecError> {
    Ok(JsonEntry {
        name: value.name().to_string(),
        kind: value.tag().name().to_string(),
        value: mirror_payload(value)?,
    })
}

fn mirror_payload(value: &Value) -> Result<serde_json::Value, CodecError> {
    use serde_json::Value as Json;
    Ok(match value.tag() {
        ValueTag::Null => Json::Null,
        ValueTag::Bool => Json::Bool(value.as_bool()?),
        ValueTag::Short | ValueTag::Int | ValueTag::Long | ValueTag::LLong => {
            Json::Number(value.as_i64()?.into())
        }
        ValueTag::UShort | ValueTag::UInt | ValueTag::ULong | ValueTag::ULLong => {
            Json::Number(value.as_u64()?.into())
        }
        ValueTag::Float | ValueTag::Double => {
            let v = value.as_f64()?;
            match serde_json::Number::from_f64(v) {
                Some(n) => Json::Number(n),
                // JSON has no NaN/inf literals; fall back to the decimal
                // string and let the declared type re-coerce on read
                None => Json::String(v.to_string()),
            }
        }
        ValueTag::Str => Json::String(value.as_string()?),
        ValueTag::Bytes => Json::String(BASE64.encode(value.payload())),
        ValueTag::Container => {
            let mirror = mirror_container(&value.as_container()?)?;
            serde_json::to_value(mirror).map_err(|_| syntax("serializable container"))?
        }
        ValueTag::Array => {
            let mut entries = Vec::new();
            for child in value.children()? {
                entries.push(serde_json::to_value(mirror_entry(&child)?)
                    .map_err(|_| syntax("serializable array element"))?);
            }
            Json::Array(entries)
        }
    })
}

fn restore_container(mirror: JsonContainer) -> Result<Container, CodecError> {
    let mut c = Container::new();
    c.set_source(mirror.header.source_id, mirror.header.source_sub_id);
    c.set_target(mirror.header.target_id, mirror.header.target_sub_id);
    c.set_message_type(mirror.header.message_type);
    for entry in mirror.values {
        let value = restore_entry(entry)?;
        c.add(value)?;
    }
    Ok(c)
}

fn restore_entry(entry: JsonEntry) -> Result<Value, CodecError> {
    let tag = ValueTag::from_name(&entry.kind).ok_or(syntax("a known type name"))?;
    restore_payload(entry.name, tag, entry.value)
}

fn restore_payload(
    name: String,
    tag: ValueTag,
    json: serde_json::Value,
) -> Result<Value, CodecError> {
    use serde_json::Value as Json;
    match (tag, json) {
        (ValueTag::Null, Json::Null) => Ok(Value::null(name)),
        (ValueTag::Bool, Json::Bool(b)) => Ok(Value::boolean(name, b)),
        (ValueTag::Short, j) => {
            let v = as_i64(&j)?;
            i16::try_from(v)
                .map(|v| Value::short(name, v))
                .map_err(|_| syntax("short-range number"))
        }
        (ValueTag::UShort, j) => {
            let v = as_u64(&j)?;
            u16::try_from(v)
                .map(|v| Value::ushort(name, v))
                .map_err(|_| syntax("ushort-range number"))
        }
        (ValueTag::Int, j) => {
            let v = as_i64(&j)?;
            i32::try_from(v)
                .map(|v| Value::int(name, v))
                .map_err(|_| syntax("int-range number"))
        }
        (ValueTag::UInt, j) => {
            let v = as_u64(&j)?;
            u32::try_from(v)
                .map(|v| Value::uint(name, v))
                .map_err(|_| syntax("uint-range number"))
        }
        (ValueTag::Long, j) => Value::long(name, as_i64(&j)?),
        (ValueTag::ULong, j) => Value::ulong(name, as_u64(&j)?),
        (ValueTag::LLong, j) => Ok(Value::llong(name, as_i64(&j)?)),
        (ValueTag::ULLong, j) => Ok(Value::ullong(name, as_u64(&j)?)),
        (ValueTag::Float, j) => Ok(Value::float(name, as_f64(&j)? as f32)),
        (ValueTag::Double, j) => Ok(Value::double(name, as_f64(&j)?)),
        (ValueTag::Str, Json::String(s)) => Ok(Value::string(name, s)),
        (ValueTag::Bytes, Json::String(s)) => BASE64
            .decode(&s)
            .map(|v| Value::bytes(name, v))
            .map_err(|_| syntax("base64 string")),
        (ValueTag::Container, j) => {
            let mirror: JsonContainer =
                serde_json::from_value(j).map_err(|_| syntax("nested container object"))?;
            let nested = restore_container(mirror)?;
            Value::container(name, &nested)
        }
        (ValueTag::Array, Json::Array(items)) => {
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                let entry: JsonEntry =
                    serde_json::from_value(item).map_err(|_| syntax("array element object"))?;
                children.push(restore_entry(entry)?);
            }
            Value::array(name, children)
        }
        _ => Err(syntax("JSON value matching the declared type")),
    }
}

fn as_i64(json: &serde_json::Value) -> Result<i64, CodecError> {
    json.as_i64().ok_or(syntax("integer number"))
}

fn as_u64(json: &serde_json::Value) -> Result<u64, CodecError> {
    json.as_u64().ok_or(syntax("unsigned number"))
}

fn as_f64(json: &serde_json::Value) -> Result<f64, CodecError> {
    match json {
        serde_json::Value::Number(n) => n.as_f64().ok_or(syntax("floating number")),
        // Non-finite floats are projected as strings
        serde_json::Value::String(s) => s.parse().map_err(|_| syntax("floating literal")),
        _ => Err(syntax("floating number")),
    }
}
