//! XML projection
//!
//! Debugging/interop projection with a fixed element shape:
//!
//! ```text
//! <container>
//!   <header source_id="A" .. message_type="ping"/>
//!   <data>
//!     <value name="n" type="int">42</value>
//!     <value name="sub" type="container"><container>..</container></value>
//!   </data>
//! </container>
//! ```
//!
//! (emitted without whitespace). Like the JSON projection it is lossy for
//! exotic payloads (bytes render as base64) but preserves the value tree
//! under structural equality. The parser accepts exactly the subset the
//! emitter produces.

use crate::container::Container;
use crate::error::CodecError;
use crate::tag::ValueTag;
use crate::value::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Render a container as an XML document.
pub fn to_xml_string(c: &Container) -> String {
    let mut out = String::new();
    write_container(c, &mut out);
    out
}

fn write_container(c: &Container, out: &mut String) {
    out.push_str("<container><header");
    for (key, value) in [
        ("source_id", c.source_id()),
        ("source_sub_id", c.source_sub_id()),
        ("target_id", c.target_id()),
        ("target_sub_id", c.target_sub_id()),
        ("message_type", c.message_type()),
    ] {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(out, value);
        out.push('"');
    }
    out.push_str("/><data>");
    for value in c {
        write_value(value, out);
    }
    out.push_str("</data></container>");
}

fn write_value(value: &Value, out: &mut String) {
    out.push_str("<value name=\"");
    escape_into(out, value.name());
    out.push_str("\" type=\"");
    out.push_str(value.tag().name());
    out.push_str("\">");
    match value.tag() {
        ValueTag::Container => {
            // children() validated at construction, so the fallbacks are
            // unreachable for any value this library produced
            if let Ok(nested) = value.as_container() {
                write_container(&nested, out);
            }
        }
        ValueTag::Array => {
            for child in value.children().unwrap_or_default() {
                write_value(&child, out);
            }
        }
        ValueTag::Bytes => out.push_str(&BASE64.encode(value.payload())),
        _ => escape_into(out, &value.as_string().unwrap_or_default()),
    }
    out.push_str("</value>");
}

fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let (entity, len) = if tail.starts_with("&amp;") {
            ('&', 5)
        } else if tail.starts_with("&lt;") {
            ('<', 4)
        } else if tail.starts_with("&gt;") {
            ('>', 4)
        } else if tail.starts_with("&quot;") {
            ('"', 6)
        } else if tail.starts_with("&apos;") {
            ('\'', 6)
        } else {
            ('&', 1)
        };
        out.push(entity);
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

/// Parse the XML projection back into a container.
pub fn from_xml_str(s: &str) -> Result<Container, CodecError> {
    let mut scanner = Scanner { text: s, pos: 0 };
    let c = parse_container(&mut scanner)?;
    scanner.skip_whitespace();
    if scanner.pos != s.len() {
        return Err(scanner.err("end of document"));
    }
    Ok(c)
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn err(&self, expected: &'static str) -> CodecError {
        CodecError::BadSyntax {
            offset: self.pos,
            expected,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str, expected: &'static str) -> Result<(), CodecError> {
        self.skip_whitespace();
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.err(expected))
        }
    }

    fn peek(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        self.text[self.pos..].starts_with(token)
    }

    /// Raw text up to the next '<', unescaped.
    fn text_content(&mut self) -> Result<String, CodecError> {
        let rest = &self.text[self.pos..];
        let end = rest.find('<').ok_or(self.err("a closing tag"))?;
        self.pos += end;
        Ok(unescape(&rest[..end]))
    }

    /// One `key="value"` attribute, or None before `/>` and `>`.
    fn attribute(&mut self) -> Result<Option<(&'a str, String)>, CodecError> {
        self.skip_whitespace();
        if self.peek("/>") || self.peek(">") {
            return Ok(None);
        }
        let rest = &self.text[self.pos..];
        let eq = rest.find("=\"").ok_or(self.err("an attribute"))?;
        let key = &rest[..eq];
        let value_start = eq + 2;
        let close = rest[value_start..]
            .find('"')
            .ok_or(self.err("a closing quote"))?;
        let value = unescape(&rest[value_start..value_start + close]);
        self.pos += value_start + close + 1;
        Ok(Some((key, value)))
    }
}

fn parse_container(sc: &mut Scanner<'_>) -> Result<Container, CodecError> {
    sc.eat("<container>", "'<container>'")?;
    sc.eat("<header", "'<header'")?;

    let mut c = Container::new();
    while let Some((key, value)) = sc.attribute()? {
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
            _ => return Err(sc.err("a known header attribute")),
        }
    }
    sc.eat("/>", "'/>' closing the header")?;

    sc.eat("<data>", "'<data>'")?;
    while !sc.peek("</data>") {
        let value = parse_value(sc)?;
        c.add(value)?;
    }
    sc.eat("</data>", "'</data>'")?;
    sc.eat("</container>", "'</container>'")?;
    Ok(c)
}

fn parse_value(sc: &mut Scanner<'_>) -> Result<Value, CodecError> {
    sc.eat("<value", "'<value'")?;
    let mut name = String::new();
    let mut kind: Option<ValueTag> = None;
    while let Some((key, value)) = sc.attribute()? {
        match key {
            "name" => name = value,
            "type" => {
                kind = Some(ValueTag::from_name(&value).ok_or(sc.err("a known type name"))?);
            }
            _ => return Err(sc.err("'name' or 'type'")),
        }
    }
    let tag = kind.ok_or(sc.err("a 'type' attribute"))?;
    sc.eat(">", "'>'")?;

    let value = match tag {
        ValueTag::Container => {
            let nested = parse_container(sc)?;
            Value::container(name, &nested)?
        }
        ValueTag::Array => {
            let mut children = Vec::new();
            while !sc.peek("</value>") {
                children.push(parse_value(sc)?);
            }
            Value::array(name, children)?
        }
        _ => {
            let offset = sc.pos;
            let literal = sc.text_content()?;
            scalar_from_text(name, tag, &literal, offset)?
        }
    };
    sc.eat("</value>", "'</value>'")?;
    Ok(value)
}

fn scalar_from_text(
    name: String,
    tag: ValueTag,
    literal: &str,
    offset: usize,
) -> Result<Value, CodecError> {
    let syntax = |expected| CodecError::BadSyntax { offset, expected };
    match tag {
        ValueTag::Null => Ok(Value::null(name)),
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
            .map_err(|_| syntax("base64 text")),
        ValueTag::Container | ValueTag::Array => Err(syntax("composite element content")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(c: &Container) -> Container {
        let xml = to_xml_string(c);
        from_xml_str(&xml).expect("projection should parse")
    }

    #[test]
    fn test_header_attributes_roundtrip() {
        let mut c = Container::new();
        c.set_source("A", "a");
        c.set_target("B", "");
        c.set_message_type("ping");
        assert_eq!(roundtrip(&c), c);
    }

    #[test]
    fn test_scalars_and_bytes_roundtrip() {
        let mut c = Container::new();
        c.add(Value::null("z")).unwrap();
        c.add(Value::boolean("b", false)).unwrap();
        c.add(Value::llong("n", -9)).unwrap();
        c.add(Value::double("d", 0.25)).unwrap();
        c.add(Value::string("t", "x < y && y > z")).unwrap();
        c.add(Value::bytes("raw", vec![1, 2, 254])).unwrap();
        assert_eq!(roundtrip(&c), c);
    }

    #[test]
    fn test_nested_composites_roundtrip() {
        let mut inner = Container::new();
        inner.set_message_type("inner");
        inner.add(Value::int("x", 5)).unwrap();

        let mut c = Container::new();
        c.add(Value::container("sub", &inner).unwrap()).unwrap();
        c.add(Value::array("a", vec![Value::string("e", "one"), Value::int("f", 2)]).unwrap())
            .unwrap();
        assert_eq!(roundtrip(&c), c);
    }

    #[test]
    fn test_attribute_escaping() {
        let mut c = Container::new();
        c.set_message_type("a\"b<c>&'d");
        c.add(Value::string("na<>me", "payload")).unwrap();
        let back = roundtrip(&c);
        assert_eq!(back.message_type(), "a\"b<c>&'d");
        assert_eq!(back.values()[0].name(), "na<>me");
    }

    #[test]
    fn test_malformed_document() {
        assert!(from_xml_str("<container>").is_err());
        assert!(from_xml_str("not xml at all").is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let doc = "<container><header/><data><value name=\"n\" type=\"i32\">1</value></data></container>";
        let err = from_xml_str(doc).unwrap_err();
        assert!(matches!(err, CodecError::BadSyntax { .. }));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let mut c = Container::new();
        c.add(Value::int("n", 1)).unwrap();
        let mut xml = to_xml_string(&c);
        xml.push_str("<extra/>");
        assert!(from_xml_str(&xml).is_err());
    }
}
