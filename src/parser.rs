use crate::ast::{Json, Map};
use crate::error::DecodeError;
use std::str::FromStr;
use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard ceiling on `DecodeOptions::max_depth`; the descent is recursive, so
/// larger limits would exhaust the stack before reporting an error.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest nesting of objects and arrays accepted. Values above
    /// [`MAX_DEPTH_LIMIT`] are clamped to it.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

const INVALID_DATA: &str = "invalid data";

type Candidate<'a> = fn(&mut Parser<'a>) -> Result<Json, DecodeError>;

pub struct Parser<'a> {
    pos: usize,
    input: &'a [u8],
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, &DecodeOptions::default())
    }
    pub fn with_options(input: &'a [u8], options: &DecodeOptions) -> Self {
        Self {
            pos: 0,
            input,
            depth: 0,
            max_depth: options.max_depth.min(MAX_DEPTH_LIMIT),
        }
    }
    fn line_at(&self, pos: usize) -> usize {
        self.input[..pos].iter().filter(|&&b| b == b'\n').count() + 1
    }
    // line is filled in by `locate` once the error leaves the parser
    fn error_at(&self, pos: usize, message: impl Into<String>) -> DecodeError {
        DecodeError::new(message.into(), pos, 0)
    }
    fn locate(&self, e: DecodeError) -> DecodeError {
        let message = if e.message() == INVALID_DATA {
            e.message().to_string()
        } else {
            format!("{}: {}", INVALID_DATA, e.message())
        };
        DecodeError::new(message, e.position(), self.line_at(e.position()))
    }
    fn error(&self, message: impl Into<String>) -> DecodeError {
        self.error_at(self.pos, message)
    }
    fn succ(&mut self) {
        self.pos += 1;
    }
    fn get_cur_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }
    fn cur_byte_is(&self, b: u8) -> bool {
        self.get_cur_byte() == Some(b)
    }
    fn expect_byte(&self, expect: u8) -> Result<(), DecodeError> {
        match self.get_cur_byte() {
            Some(actual) if actual == expect => Ok(()),
            Some(actual) => Err(self.error(format!(
                "expected: `{}`, found: `{}`",
                expect as char,
                actual.escape_ascii()
            ))),
            None => Err(self.error(format!("expected `{}`", expect as char))),
        }
    }
    // check current token and skip it
    fn consume_byte(&mut self, b: u8) -> Result<(), DecodeError> {
        self.expect_byte(b)?;
        self.succ();
        Ok(())
    }
    fn consume_literal(&mut self, literal: &str) -> Result<(), DecodeError> {
        if self.input[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", literal)))
        }
    }
    fn skip_whitespace(&mut self) {
        while matches!(self.get_cur_byte(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.succ();
        }
    }
    fn parse_hex4(&mut self) -> Result<u16, DecodeError> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        let code = std::str::from_utf8(digits)
            .ok()
            .filter(|s| s.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|s| u16::from_str_radix(s, 16).ok())
            .ok_or_else(|| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }
    // after `\u`
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let start = self.pos;
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.input[self.pos..].starts_with(b"\\u") {
                    return Err(self.error_at(start, "unpaired surrogate"));
                }
                self.pos += 2;
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(start, "unpaired surrogate"));
                }
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error_at(start, "unpaired surrogate")),
            _ => u32::from(high),
        };
        char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid unicode escape"))
    }
    fn parse_escape(&mut self) -> Result<char, DecodeError> {
        let ch = match self.get_cur_byte() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\x08',
            Some(b'f') => '\x0C',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.succ();
                return self.parse_unicode_escape();
            }
            Some(other) => {
                return Err(self.error(format!("invalid escape: `\\{}`", other.escape_ascii())))
            }
            None => return Err(self.error("unterminated escape")),
        };
        self.succ();
        Ok(ch)
    }
    fn parse_inner_string(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        self.consume_byte(b'"')?; // left quotes
        let mut buf = Vec::new();
        loop {
            match self.get_cur_byte() {
                Some(b'"') => break,
                Some(b'\\') => {
                    self.succ();
                    let ch = self.parse_escape()?;
                    buf.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes());
                }
                Some(b) if b < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                Some(b) => {
                    buf.push(b);
                    self.succ();
                }
                None => return Err(self.error("unterminated string")),
            }
        }
        self.consume_byte(b'"')?; // right quotes
        String::from_utf8(buf).map_err(|_| self.error_at(start, "invalid UTF-8 in string"))
    }
    fn parse_string_value(&mut self) -> Result<Json, DecodeError> {
        let s = self.parse_inner_string()?;
        Ok(Json::String(s))
    }
    fn parse_string_key(&mut self) -> Result<String, DecodeError> {
        self.parse_inner_string()
    }
    fn skip_digits(&mut self) -> Result<(), DecodeError> {
        if !matches!(self.get_cur_byte(), Some(b'0'..=b'9')) {
            return Err(self.error("expected digit"));
        }
        while matches!(self.get_cur_byte(), Some(b'0'..=b'9')) {
            self.succ();
        }
        Ok(())
    }
    fn parse_number(&mut self) -> Result<Json, DecodeError> {
        let start = self.pos;
        if self.cur_byte_is(b'-') {
            self.succ();
        }
        // no leading zeros
        if self.cur_byte_is(b'0') {
            self.succ();
        } else {
            self.skip_digits()?;
        }
        if self.cur_byte_is(b'.') {
            self.succ();
            self.skip_digits()?;
        }
        if matches!(self.get_cur_byte(), Some(b'e' | b'E')) {
            self.succ();
            if matches!(self.get_cur_byte(), Some(b'+' | b'-')) {
                self.succ();
            }
            self.skip_digits()?;
        }
        let num = std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| self.error_at(start, "invalid number"))?;
        if !num.is_finite() {
            return Err(self.error_at(start, "number out of range"));
        }
        Ok(Json::Number(num))
    }
    fn parse_null(&mut self) -> Result<Json, DecodeError> {
        self.consume_literal("null")?;
        Ok(Json::Null)
    }
    fn parse_bool(&mut self) -> Result<Json, DecodeError> {
        if self.consume_literal("true").is_ok() {
            return Ok(Json::Bool(true));
        }
        self.consume_literal("false")?;
        Ok(Json::Bool(false))
    }
    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.max_depth {
            return Err(self.error(format!("nesting deeper than {}", self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }
    fn parse_object(&mut self) -> Result<Json, DecodeError> {
        self.consume_byte(b'{')?;
        self.enter()?;
        let result = self.parse_members();
        self.depth -= 1;
        result
    }
    fn parse_members(&mut self) -> Result<Json, DecodeError> {
        self.skip_whitespace();
        let mut map = Map::new();
        if self.cur_byte_is(b'}') {
            self.succ();
            return Ok(Json::Dictionary(map));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string_key()?;
            self.skip_whitespace();
            self.consume_byte(b':')?;
            let value = self.parse_any()?;
            self.skip_whitespace();
            map.insert(key, value);
            match self.get_cur_byte() {
                Some(b',') => self.succ(),
                Some(b'}') => break,
                Some(other) => {
                    return Err(self.error(format!(
                        "expected: `,` or `}}`, found: `{}`",
                        other.escape_ascii()
                    )))
                }
                None => return Err(self.error("expected `,` or `}`")),
            }
        }
        self.consume_byte(b'}')?;
        Ok(Json::Dictionary(map))
    }
    fn parse_array(&mut self) -> Result<Json, DecodeError> {
        self.consume_byte(b'[')?;
        self.enter()?;
        let result = self.parse_elements();
        self.depth -= 1;
        result
    }
    fn parse_elements(&mut self) -> Result<Json, DecodeError> {
        self.skip_whitespace();
        if self.cur_byte_is(b']') {
            self.succ();
            return Ok(Json::Array(Vec::new()));
        }
        let mut values = vec![];
        loop {
            let value = self.parse_any()?;
            self.skip_whitespace();
            values.push(value);
            match self.get_cur_byte() {
                Some(b',') => self.succ(),
                Some(b']') => break,
                Some(other) => {
                    return Err(self.error(format!(
                        "expected: `,` or `]`, found: `{}`",
                        other.escape_ascii()
                    )))
                }
                None => return Err(self.error("expected `,` or `]`")),
            }
        }
        self.consume_byte(b']')?;
        Ok(Json::Array(values))
    }
    /// Decodes the value at the cursor by trying each grammar in turn and
    /// keeping the first that parses. When every candidate fails, the error
    /// of the one that got furthest is returned, or "invalid data" at the
    /// start of the value if none got past it.
    pub fn parse_value(&mut self) -> Result<Json, DecodeError> {
        self.parse_any().map_err(|e| self.locate(e))
    }
    fn parse_any(&mut self) -> Result<Json, DecodeError> {
        self.skip_whitespace();
        let start = self.pos;
        let candidates: [(&str, Candidate<'a>); 6] = [
            ("null", Self::parse_null),
            ("object", Self::parse_object),
            ("array", Self::parse_array),
            ("string", Self::parse_string_value),
            ("number", Self::parse_number),
            ("bool", Self::parse_bool),
        ];
        let mut furthest: Option<DecodeError> = None;
        for (name, candidate) in candidates {
            match candidate(self) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    trace!(candidate = name, position = e.position(), "candidate rejected");
                    self.pos = start;
                    let further = furthest
                        .as_ref()
                        .map_or(true, |best| e.position() > best.position());
                    if e.position() > start && further {
                        furthest = Some(e);
                    }
                }
            }
        }
        Err(furthest.unwrap_or_else(|| self.error_at(start, INVALID_DATA)))
    }
    /// Decodes the whole input as one document.
    pub fn parse_document(&mut self) -> Result<Json, DecodeError> {
        self.document().map_err(|e| self.locate(e))
    }
    fn document(&mut self) -> Result<Json, DecodeError> {
        if let Err(e) = std::str::from_utf8(self.input) {
            return Err(self.error_at(e.valid_up_to(), "invalid UTF-8"));
        }
        let value = self.parse_any()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error("unexpected trailing characters"));
        }
        Ok(value)
    }
}

impl Json {
    /// Decodes one JSON document.
    pub fn decode(input: &[u8]) -> Result<Json, DecodeError> {
        Self::decode_with(input, &DecodeOptions::default())
    }

    pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Json, DecodeError> {
        Parser::with_options(input, options)
            .parse_document()
            .map_err(|e| {
                debug!(position = e.position(), line = e.line(), "decode failed: {}", e.message());
                e
            })
    }
}

impl FromStr for Json {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Json::decode(s.as_bytes())
    }
}
