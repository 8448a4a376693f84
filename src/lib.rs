//! An immutable JSON value with text encode/decode, conversion to and from
//! native values, and a sorted, indented rendering for display.
//!
//! ```
//! use json_value::{json, Json};
//!
//! let v = Json::decode(br#"{"test": 5}"#).unwrap();
//! assert_eq!(v, json!({"test": 5}));
//! assert_eq!(v.to_string(), "{\n    \"test\": 5\n}");
//! ```

mod ast;
mod error;
mod formatter;
mod macros;
mod native;
mod parser;
mod serde_impls;

pub use ast::{Json, Map};
pub use error::{BadTypeError, DecodeError, EncodeError};
pub use formatter::Formatter;
pub use parser::{DecodeOptions, Parser, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
