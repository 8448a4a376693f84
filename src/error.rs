use std::fmt;
use thiserror::Error;

/// The input is not a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corrupted data at line {line} (byte {position}): {message}")]
pub struct DecodeError {
    position: usize,
    line: usize,
    message: String,
}

impl DecodeError {
    pub fn new(message: String, position: usize, line: usize) -> Self {
        Self {
            position,
            line,
            message,
        }
    }

    /// Byte offset into the input where decoding gave up.
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based line of `position`.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The value holds something JSON text cannot express.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("cannot encode non-finite number `{0}`")]
    NonFiniteNumber(f64),
}

/// A native value whose shape has no JSON counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported native type: {shape}")]
pub struct BadTypeError {
    shape: String,
}

impl BadTypeError {
    pub fn new<S: Into<String>>(shape: S) -> Self {
        Self {
            shape: shape.into(),
        }
    }

    pub fn shape(&self) -> &str {
        &self.shape
    }
}

impl serde::ser::Error for BadTypeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let e = DecodeError::new(String::from("invalid data"), 7, 2);
        assert_eq!(e.to_string(), "corrupted data at line 2 (byte 7): invalid data");
        assert_eq!(e.position(), 7);
        assert_eq!(e.line(), 2);
    }

    #[test]
    fn test_bad_type_display() {
        let e = BadTypeError::new("unit struct `Opaque`");
        assert_eq!(e.to_string(), "unsupported native type: unit struct `Opaque`");
    }
}
