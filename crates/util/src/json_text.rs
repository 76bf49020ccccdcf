//! JSON text rendering for form-encoded request fields.
//!
//! Form values are sent as JSON text in a spaced, ASCII-only style:
//! `", "` between items, `": "` between keys and values, and every non-ASCII
//! character written as a `\uXXXX` escape (surrogate pairs above the BMP).

use std::io;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, Serializer};

#[derive(Debug, Default, Clone, Copy)]
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for character in fragment.chars() {
            if character.is_ascii() {
                writer.write_all(&[character as u8])?;
                continue;
            }
            for unit in character.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
        }
        Ok(())
    }
}

/// Render `value` as spaced, ASCII-only JSON text.
pub fn to_spaced_ascii_json(value: &Value) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, SpacedAsciiFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_and_arrays_use_spaced_separators() {
        assert_eq!(to_spaced_ascii_json(&json!({ "test": 123 })).unwrap(), r#"{"test": 123}"#);
        assert_eq!(to_spaced_ascii_json(&json!([1, "a", null])).unwrap(), r#"[1, "a", null]"#);
        assert_eq!(
            to_spaced_ascii_json(&json!({ "b": [true], "a": {} })).unwrap(),
            r#"{"b": [true], "a": {}}"#
        );
    }

    #[test]
    fn scalars_render_as_json_literals() {
        assert_eq!(to_spaced_ascii_json(&json!("plain")).unwrap(), r#""plain""#);
        assert_eq!(to_spaced_ascii_json(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(to_spaced_ascii_json(&json!(false)).unwrap(), "false");
    }

    #[test]
    fn non_ascii_is_escaped() {
        assert_eq!(to_spaced_ascii_json(&json!("café")).unwrap(), r#""caf\u00e9""#);
        assert_eq!(to_spaced_ascii_json(&json!("🚀")).unwrap(), r#""\ud83d\ude80""#);
        assert_eq!(to_spaced_ascii_json(&json!("a\"b\n")).unwrap(), r#""a\"b\n""#);
    }
}
