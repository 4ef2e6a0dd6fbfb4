//! Text wire format
//!
//! A lossless, human-readable projection of a container:
//!
//! ```text
//! @header={source_id:A,source_sub_id:a,target_id:B,target_sub_id:,message_type:ping};
//! @data={n:int:42,k:string:one\,two};
//! ```
//!
//! (emitted on a single line; shown wrapped here). Sections appear in
//! `header`, `data` order. Data entries are `name:type:literal`. The
//! characters `, ; { } : \` are escaped with a leading backslash wherever
//! they occur in names, header values, or literals. Bytes and composite
//! payloads are rendered as base64 of their binary payload encoding,
//! which keeps the grammar flat while staying lossless.
//!
//! A text encoding always begins with `@`; binary encodings begin with a
//! tag byte `0x00..=0x0F`, so the two can never be confused.

use crate::container::Container;
use crate::error::CodecError;
use crate::tag::ValueTag;
use crate::value::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Render a container in the text format.
pub fn encode(c: &Container) -> String {
    let mut out = String::new();
    out.push_str("@header={");
    let header = [
        ("source_id", c.source_id()),
        ("source_sub_id", c.source_sub_id()),
        ("target_id", c.target_id()),
        ("target_sub_id", c.target_sub_id()),
        ("message_type", c.message_type()),
    ];
    for (i, (key, value)) in header.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push(':');
        escape_into(&mut out, value);
    }
    out.push_str("};@data={");
    for (i, value) in c.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        escape_into(&mut out, value.name());
        out.push(':');
        out.push_str(value.tag().name());
        out.push(':');
        escape_into(&mut out, &literal(value));
    }
    out.push_str("};");
    out
}

/// Parse the text format back into a container.
pub fn decode(text: &str) -> Result<Container, CodecError> {
    let mut c = Container::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'@' {
            return Err(CodecError::BadSyntax {
                offset: pos,
                expected: "'@' section marker",
            });
        }
        let name_start = pos + 1;
        let eq = find_byte(bytes, name_start, b'=').ok_or(CodecError::BadSyntax {
            offset: name_start,
            expected: "'=' after section name",
        })?;
        let section = &text[name_start..eq];
        if bytes.get(eq + 1) != Some(&b'{') {
            return Err(CodecError::BadSyntax {
                offset: eq + 1,
                expected: "'{' opening the section",
            });
        }
        let body_start = eq + 2;
        let close = find_unescaped(bytes, body_start, b'}').ok_or(CodecError::BadSyntax {
            offset: body_start,
            expected: "'}' closing the section",
        })?;
        if bytes.get(close + 1) != Some(&b';') {
            return Err(CodecError::BadSyntax {
                offset: close + 1,
                expected: "';' after section",
            });
        }
        let body = &text[body_start..close];
        match section {
            "header" => parse_header(&mut c, body, body_start)?,
            "data" => parse_data(&mut c, body, body_start)?,
            _ => {
                return Err(CodecError::BadSyntax {
                    offset: name_start,
                    expected: "section 'header' or 'data'",
                });
            }
        }
        pos = close + 2;
    }
    Ok(c)
}

fn parse_header(c: &mut Container, body: &str, offset: usize) -> Result<(), CodecError> {
    for (entry, at) in split_entries(body, offset) {
        let (key, value) = split_once_unescaped(entry, b':').ok_or(CodecError::BadSyntax {
            offset: at,
            expected: "'key:value' header entry",
        })?;
        let value = unescape(value);
        match key {
            "source_id" => {
                let sub = c.source_sub_id().to_string();
                c.set_source(value, sub);
            }
            "source_sub_id" => {
                let id = c.source_id().to_string();
                c.set_source(id, value);
            }
            "target_id" => {
                let sub = c.target_sub_id().to_string();
                c.set_target(value, sub);
            }
            "target_sub_id" => {
                let id = c.target_id().to_string();
                c.set_target(id, value);
            }
            "message_type" => c.set_message_type(value),
            _ => {
                return Err(CodecError::BadSyntax {
                    offset: at,
                    expected: "a known header key",
                });
            }
        }
    }
    Ok(())
}

fn parse_data(c: &mut Container, body: &str, offset: usize) -> Result<(), CodecError> {
    for (entry, at) in split_entries(body, offset) {
        let (name, rest) = split_once_unescaped(entry, b':').ok_or(CodecError::BadSyntax {
            offset: at,
            expected: "'name:type:literal' data entry",
        })?;
        let (kind, literal) = split_once_unescaped(rest, b':').ok_or(CodecError::BadSyntax {
            offset: at,
            expected: "':' between type and literal",
        })?;
        let tag = ValueTag::from_name(kind).ok_or(CodecError::BadSyntax {
            offset: at,
            expected: "a known type name",
        })?;
        let value = value_from_literal(unescape(name), tag, &unescape(literal), at)?;
        c.add(value)?;
    }
    Ok(())
}

/// One value's text literal (pre-escaping).
fn literal(value: &Value) -> String {
    match value.tag() {
        ValueTag::Null => String::new(),
        ValueTag::Bytes | ValueTag::Container | ValueTag::Array => BASE64.encode(value.payload()),
        // as_string renders scalars in decimal and strings verbatim;
        // every non-composite tag accepts it
        _ => value.as_string().unwrap_or_default(),
    }
}

fn value_from_literal(
    name: String,
    tag: ValueTag,
    literal: &str,
    offset: usize,
) -> Result<Value, CodecError> {
    let syntax = |expected| CodecError::BadSyntax { offset, expected };
    match tag {
        ValueTag::Null => {
            if literal.is_empty() {
                Ok(Value::null(name))
            } else {
                Err(syntax("empty null literal"))
            }
        }
        ValueTag::Bool => match literal {
            "true" => Ok(Value::boolean(name, true)),
            "false" => Ok(Value::boolean(name, false)),
            _ => Err(syntax("'true' or 'false'")),
        },
        ValueTag::Short => literal
            .parse()
            .map(|v| Value::short(name, v))
            .map_err(|_| syntax("short literal")),
        ValueTag::UShort => literal
            .parse()
            .map(|v| Value::ushort(name, v))
            .map_err(|_| syntax("ushort literal")),
        ValueTag::Int => literal
            .parse()
            .map(|v| Value::int(name, v))
            .map_err(|_| syntax("int literal")),
        ValueTag::UInt => literal
            .parse()
            .map(|v| Value::uint(name, v))
            .map_err(|_| syntax("uint literal")),
        ValueTag::Long => {
            let v: i64 = literal.parse().map_err(|_| syntax("long literal"))?;
            Value::long(name, v)
        }
        ValueTag::ULong => {
            let v: u64 = literal.parse().map_err(|_| syntax("ulong literal"))?;
            Value::ulong(name, v)
        }
        ValueTag::LLong => literal
            .parse()
            .map(|v| Value::llong(name, v))
            .map_err(|_| syntax("llong literal")),
        ValueTag::ULLong => literal
            .parse()
            .map(|v| Value::ullong(name, v))
            .map_err(|_| syntax("ullong literal")),
        ValueTag::Float => literal
            .parse()
            .map(|v| Value::float(name, v))
            .map_err(|_| syntax("float literal")),
        ValueTag::Double => literal
            .parse()
            .map(|v| Value::double(name, v))
            .map_err(|_| syntax("double literal")),
        ValueTag::Str => Ok(Value::string(name, literal)),
        ValueTag::Bytes => BASE64
            .decode(literal)
            .map(|v| Value::bytes(name, v))
            .map_err(|_| syntax("base64 literal")),
        ValueTag::Container | ValueTag::Array => {
            let payload = BASE64.decode(literal).map_err(|_| syntax("base64 literal"))?;
            Value::from_payload(name, tag, payload)
        }
    }
}

// ----------------------------------------------------------------------
// Escaping and scanning
// ----------------------------------------------------------------------

const ESCAPED: &[char] = &[',', ';', '{', '}', ':', '\\'];

fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        if ESCAPED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| p + from)
}

/// First unescaped occurrence of `needle` at or after `from`. Delimiters
/// are ASCII, so byte scanning is UTF-8 safe.
fn find_unescaped(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == needle {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Split a section body on unescaped commas, yielding each raw entry with
/// its absolute offset. An empty body yields nothing.
fn split_entries<'a>(body: &'a str, offset: usize) -> Vec<(&'a str, usize)> {
    if body.is_empty() {
        return Vec::new();
    }
    let bytes = body.as_bytes();
    let mut entries = Vec::new();
    let mut start = 0;
    loop {
        match find_unescaped(bytes, start, b',') {
            Some(comma) => {
                entries.push((&body[start..comma], offset + start));
                start = comma + 1;
            }
            None => {
                entries.push((&body[start..], offset + start));
                break;
            }
        }
    }
    entries
}

fn split_once_unescaped(s: &str, needle: u8) -> Option<(&str, &str)> {
    let at = find_unescaped(s.as_bytes(), 0, needle)?;
    Some((&s[..at], &s[at + 1..]))
}
