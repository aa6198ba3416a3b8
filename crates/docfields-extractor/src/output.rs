//! JSON rendering of output records

use crate::error::ExtractorError;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io::{self, Write};

/// Pretty-print `value` with `indent` spaces per level
///
/// With `ensure_ascii`, every non-ASCII character in strings and keys is
/// written as a `\uXXXX` escape (UTF-16 surrogate pairs above U+FFFF), so
/// files match those written by Python's `json.dump` defaults.
pub(crate) fn to_json_bytes<T: Serialize>(
    value: &T,
    indent: usize,
    ensure_ascii: bool,
) -> Result<Vec<u8>, ExtractorError> {
    let indent = " ".repeat(indent);
    let pretty = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    if ensure_ascii {
        let formatter = AsciiFormatter { inner: pretty };
        value.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, formatter))?;
    } else {
        value.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, pretty))?;
    }
    Ok(buf)
}

/// `PrettyFormatter` layout with ASCII-only string contents
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn render(value: &Value, ensure_ascii: bool) -> String {
        String::from_utf8(to_json_bytes(value, 4, ensure_ascii).unwrap()).unwrap()
    }

    #[test]
    fn test_indent() {
        assert_eq!(
            render(&json!({"a": {"b": "c"}, "d": []}), true),
            "{\n    \"a\": {\n        \"b\": \"c\"\n    },\n    \"d\": []\n}"
        );
        assert_eq!(
            String::from_utf8(to_json_bytes(&json!({"a": 1}), 2, false).unwrap()).unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn test_non_ascii_escaped() {
        let out = render(&json!({"name": "علی خان", "city": "Zürich"}), true);
        assert!(out.is_ascii());
        assert!(out.contains(r#""name": "\u0639\u0644\u06cc \u062e\u0627\u0646""#));
        assert!(out.contains(r#""city": "Z\u00fcrich""#));
    }

    #[test]
    fn test_astral_char_uses_surrogate_pair() {
        let out = render(&json!(["ok 😀"]), true);
        assert!(out.contains(r#""ok \ud83d\ude00""#));
    }

    #[test]
    fn test_keys_and_control_chars() {
        let out = render(&json!({"نام": "line\nbreak \"quoted\""}), true);
        assert!(out.contains(r#""\u0646\u0627\u0645": "line\nbreak \"quoted\"""#));
    }

    #[test]
    fn test_raw_utf8_when_disabled() {
        let out = render(&json!({"name": "علی"}), false);
        assert!(out.contains("\"name\": \"علی\""));
    }

    #[test]
    fn test_escaped_output_parses_back() {
        let value = json!({"text": "Passport: علی 😀", "n": [1, 2]});
        let parsed: Value = serde_json::from_str(&render(&value, true)).unwrap();
        assert_eq!(parsed, value);
    }
}
