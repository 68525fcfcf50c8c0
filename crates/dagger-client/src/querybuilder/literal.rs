//! GraphQL input literals, rendered with `serde_graphql_input`.
//!
//! The crate writes string contents verbatim, so strings are escaped here
//! before they reach the writer. Chars render as one-character strings.

use std::io;

use serde::Serialize;
use serde_graphql_input::{error::Error, Formatter, Serializer};

struct EscapingFormatter;

impl Formatter for EscapingFormatter {
    // Keys and enum values are names and pass through unchanged.
    fn write_string<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let quoted = serde_json::to_string(value)?;
        writer.write_all(quoted[1..quoted.len() - 1].as_bytes())
    }

    fn write_char<W>(&mut self, writer: &mut W, value: char) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_string(writer)?;
        self.write_string(writer, value.encode_utf8(&mut [0; 4]))?;
        self.end_string(writer)
    }
}

pub fn to_literal<T>(value: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    let mut writer = Vec::with_capacity(128);

    let mut ser = Serializer::with_formatter(&mut writer, EscapingFormatter);
    value.serialize(&mut ser)?;

    String::from_utf8(writer).map_err(serde::ser::Error::custom)
}

/// Zero values are never sent for optional arguments.
pub fn is_zero_literal(literal: &str) -> bool {
    matches!(literal, "null" | "\"\"" | "false" | "[]" | "{}")
        || literal.parse::<f64>().map(|n| n == 0.0).unwrap_or(false)
}

/// A GraphQL name: `[_A-Za-z][_0-9A-Za-z]*`.
pub fn is_name(value: &str) -> bool {
    let mut chars = value.chars();

    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::{is_name, is_zero_literal, to_literal};

    #[derive(Serialize)]
    enum Protocol {
        #[serde(rename = "TCP")]
        Tcp,
    }

    #[derive(Serialize)]
    struct Forward {
        backend: isize,
        protocol: Protocol,
        label: Option<String>,
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(to_literal("a \"b\"\n").unwrap(), r#""a \"b\"\n""#);
        assert_eq!(to_literal(&vec![r"c:\tmp"]).unwrap(), r#"["c:\\tmp"]"#);
    }

    #[test]
    fn test_chars_are_strings() {
        assert_eq!(to_literal(&'"').unwrap(), r#""\"""#);
    }

    #[test]
    fn test_struct_keys_are_bare_and_enums_unquoted() {
        let value = Forward {
            backend: 8080,
            protocol: Protocol::Tcp,
            label: None,
        };

        assert_eq!(
            to_literal(&value).unwrap(),
            "{backend:8080,protocol:TCP,label:null}"
        );
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert("a", vec![1, 2]);

        assert_eq!(to_literal(&map).unwrap(), "{a:[1,2]}");
    }

    #[test]
    fn test_zero_literals() {
        for zero in ["null", "\"\"", "false", "0", "0.0", "[]", "{}"] {
            assert!(is_zero_literal(zero), "{zero} should be zero");
        }
        for set in ["\"a\"", "true", "1", "[1]", "{a:1}", "TCP"] {
            assert!(!is_zero_literal(set), "{set} should not be zero");
        }
    }

    #[test]
    fn test_names() {
        assert!(is_name("LOCKED"));
        assert!(is_name("_x9"));
        assert!(!is_name("9x"));
        assert!(!is_name("a b"));
        assert!(!is_name(""));
    }
}
