use crate::ast::{sorted_entries, Json, Map};
use crate::error::EncodeError;
use std::fmt;

type Result<T> = std::result::Result<T, EncodeError>;

/// Writes JSON text, either compact or in the sorted, indented form used for
/// display.
pub struct Formatter {
    depth: usize,
    pretty: bool,
    sort_keys: bool,
}

impl Formatter {
    pub fn compact() -> Self {
        Self {
            depth: 0,
            pretty: false,
            sort_keys: false,
        }
    }
    pub fn canonical() -> Self {
        Self {
            depth: 0,
            pretty: true,
            sort_keys: true,
        }
    }
    fn indent(&self) -> String {
        " ".repeat(4).repeat(self.depth)
    }
    fn write_line_break(&self, out: &mut Vec<u8>) {
        if self.pretty {
            out.push(b'\n');
            out.extend_from_slice(self.indent().as_bytes());
        }
    }
    fn format_string(&self, s: &str, out: &mut Vec<u8>) {
        out.push(b'"');
        for ch in s.chars() {
            match ch {
                '"' => out.extend_from_slice(b"\\\""),
                '\\' => out.extend_from_slice(b"\\\\"),
                '\x08' => out.extend_from_slice(b"\\b"),
                '\x0C' => out.extend_from_slice(b"\\f"),
                '\n' => out.extend_from_slice(b"\\n"),
                '\r' => out.extend_from_slice(b"\\r"),
                '\t' => out.extend_from_slice(b"\\t"),
                c if c < '\x20' => {
                    out.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
                }
                c => out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
            }
        }
        out.push(b'"');
    }
    fn format_number(&self, num: f64, out: &mut Vec<u8>) -> Result<()> {
        if !num.is_finite() {
            return Err(EncodeError::NonFiniteNumber(num));
        }
        // ECMAScript form: shortest round-trip digits, exponent outside [1e-6, 1e21)
        out.extend_from_slice(ryu_js::Buffer::new().format_finite(num).as_bytes());
        Ok(())
    }
    fn format_object(&mut self, map: &Map, out: &mut Vec<u8>) -> Result<()> {
        if map.is_empty() {
            out.extend_from_slice(b"{}");
            return Ok(());
        }
        let entries: Vec<(&String, &Json)> = if self.sort_keys {
            sorted_entries(map)
        } else {
            map.iter().collect()
        };
        let separator: &[u8] = if self.pretty { b": " } else { b":" };
        out.push(b'{');
        self.depth += 1;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            self.write_line_break(out);
            self.format_string(key, out);
            out.extend_from_slice(separator);
            self.format(value, out)?;
        }
        self.depth -= 1;
        self.write_line_break(out);
        out.push(b'}');
        Ok(())
    }
    fn format_array(&mut self, values: &[Json], out: &mut Vec<u8>) -> Result<()> {
        if values.is_empty() {
            out.extend_from_slice(b"[]");
            return Ok(());
        }
        out.push(b'[');
        self.depth += 1;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            self.write_line_break(out);
            self.format(value, out)?;
        }
        self.depth -= 1;
        self.write_line_break(out);
        out.push(b']');
        Ok(())
    }
    pub fn format(&mut self, v: &Json, out: &mut Vec<u8>) -> Result<()> {
        match v {
            Json::String(s) => self.format_string(s, out),
            Json::Bool(true) => out.extend_from_slice(b"true"),
            Json::Bool(false) => out.extend_from_slice(b"false"),
            Json::Number(num) => self.format_number(*num, out)?,
            Json::Null => out.extend_from_slice(b"null"),
            Json::Dictionary(map) => self.format_object(map, out)?,
            Json::Array(values) => self.format_array(values, out)?,
        }
        Ok(())
    }
    pub fn to_vec(mut self, v: &Json) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.format(v, &mut out)?;
        Ok(out)
    }
}

impl Json {
    /// Compact JSON text. Fails only on a non-finite number, which no decoded
    /// value can contain.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Formatter::compact().to_vec(self)
    }

    /// Indented JSON text with every object's keys sorted.
    pub fn canonical(&self) -> Result<Vec<u8>> {
        Formatter::canonical().to_vec(self)
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = match self.canonical() {
            Ok(bytes) => bytes,
            Err(_) => return f.write_str("invalid data"),
        };
        match String::from_utf8(bytes) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("encoding error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> String {
        Json::decode(text.as_bytes()).unwrap().to_string()
    }

    fn encode(text: &str) -> String {
        let v = Json::decode(text.as_bytes()).unwrap();
        String::from_utf8(v.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_format_string() {
        #[rustfmt::skip]
        let tests = vec![
            (r#""abc""#, r#""abc""#),
            (r#""  a bc   def""#, r#""  a bc   def""#),
            (r#""a\"b\\c\nd\u0001""#, r#""a\"b\\c\nd\u0001""#),
            (r#""é\/""#, "\"é/\""),
        ];
        for (input, expected) in tests {
            assert_eq!(format(input), String::from(expected));
        }
    }

    #[test]
    fn test_format_number() {
        #[rustfmt::skip]
        let tests = vec![
            ("123", "123"),
            ("-123.45", "-123.45"),
            ("5.0", "5"),
            ("1e3", "1000"),
            ("-0", "0"),
            ("0.1", "0.1"),
        ];
        for (input, expected) in tests {
            assert_eq!(format(input), String::from(expected));
        }
    }

    #[test]
    fn test_format_number_exponent() {
        #[rustfmt::skip]
        let tests = vec![
            ("1e-300", "1e-300"),
            ("1e21", "1e+21"),
            ("1e20", "100000000000000000000"),
            ("-2.5e-8", "-2.5e-8"),
            ("1.7976931348623157e308", "1.7976931348623157e+308"),
        ];
        for (input, expected) in tests {
            assert_eq!(format(input), String::from(expected));
            assert_eq!(encode(input), String::from(expected));
        }
        let v = Json::Number(f64::MAX);
        assert_eq!(Json::decode(&v.encode().unwrap()).unwrap(), v);
    }

    #[test]
    fn test_format_literals() {
        assert_eq!(format("true"), "true");
        assert_eq!(format("false"), "false");
        assert_eq!(format("null"), "null");
    }

    #[test]
    fn test_format_object() {
        #[rustfmt::skip]
        let tests = vec![
            ("{}", "{}"),
            ("{    }", "{}"),
            (
                r#"{"a":123}"#,
r#"{
    "a": 123
}"#,
            ),
            (
                r#"{"bc":45,"a":123}"#,
r#"{
    "a": 123,
    "bc": 45
}"#,
            ),
            (
                r#"{"b":{"d":6789,"c":45},"a":123}"#,
r#"{
    "a": 123,
    "b": {
        "c": 45,
        "d": 6789
    }
}"#,
            ),
            (
                r#"{"a": {}}"#,
r#"{
    "a": {}
}"#,
            ),
            (
                r#"{"a": []}"#,
r#"{
    "a": []
}"#,
            ),
        ];
        for (input, expected) in tests {
            assert_eq!(format(input), String::from(expected));
        }
    }

    #[test]
    fn test_format_array() {
        #[rustfmt::skip]
        let tests = vec![
            ("[]", "[]"),
            ("[    ]", "[]"),
            (
                "[123]",
r#"[
    123
]"#,
            ),
            (
                "[1,23,4]",
r#"[
    1,
    23,
    4
]"#,
            ),
            (
                r#"[{"a": 1}, {"b": 23}]"#,
r#"[
    {
        "a": 1
    },
    {
        "b": 23
    }
]"#,
            ),
            (
                r#"[{"a": [null, true]}]"#,
r#"[
    {
        "a": [
            null,
            true
        ]
    }
]"#,
            ),
        ];
        for (input, expected) in tests {
            assert_eq!(format(input), String::from(expected));
        }
    }

    #[test]
    fn test_sorted_by_code_point() {
        assert_eq!(
            format(r#"{"b": 1, "B": 2, "é": 3, "a": 4}"#),
            "{\n    \"B\": 2,\n    \"a\": 4,\n    \"b\": 1,\n    \"é\": 3\n}"
        );
    }

    #[test]
    fn test_encode_compact() {
        assert_eq!(encode(r#" [ 1 , "a" , [ ] , { } , null ] "#), r#"[1,"a",[],{},null]"#);
        assert_eq!(encode(r#"{ "k" : [ true, false ] }"#), r#"{"k":[true,false]}"#);
        assert_eq!(encode("\"tab\\there\""), "\"tab\\there\"");
    }

    #[test]
    fn test_encode_round_trip() {
        let inputs = [
            r#"{"a": [1, 2.5, -3e-7, "x\ny"], "b": {"c": null, "d": false}, "e": ""}"#,
            r#"[[[]], {}, "😀", 1e300]"#,
        ];
        for input in inputs {
            let v = Json::decode(input.as_bytes()).unwrap();
            assert_eq!(Json::decode(&v.encode().unwrap()).unwrap(), v);
            assert_eq!(Json::decode(&v.canonical().unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn test_non_finite_number() {
        let v = Json::Array(vec![Json::Number(f64::NAN)]);
        assert!(matches!(v.encode(), Err(EncodeError::NonFiniteNumber(_))));
        assert_eq!(v.to_string(), "invalid data");
        assert_eq!(Json::Number(f64::INFINITY).to_string(), "invalid data");
    }
}
