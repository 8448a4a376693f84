//! Conversion between [`Json`] and the host's own untyped values.
//!
//! Import accepts anything that implements [`Serialize`] and classifies it by
//! the serde data-model call it makes: absence, text, float, integer, bool,
//! sequence, string-keyed map. Every other shape is rejected with
//! [`BadTypeError`]. Booleans arrive through `serialize_bool` alone, so they
//! never turn into numbers.
//!
//! Export targets [`serde_json::Value`].

use crate::ast::{Json, Map};
use crate::error::BadTypeError;
use serde::ser::{self, Impossible, Serialize};
use tracing::debug;

impl Json {
    /// Imports a native value.
    ///
    /// ```
    /// use json_value::Json;
    ///
    /// let v = Json::from_native(&("test", 5)).unwrap();
    /// assert_eq!(v, Json::Array(vec![Json::from("test"), Json::from(5)]));
    /// ```
    pub fn from_native<T: Serialize + ?Sized>(value: &T) -> Result<Json, BadTypeError> {
        value.serialize(NativeSerializer).map_err(|e| {
            debug!(shape = e.shape(), "native import failed");
            e
        })
    }

    /// Exports to a `serde_json::Value`. Non-finite numbers, which
    /// `serde_json` cannot hold, become `Null`.
    pub fn to_native(&self) -> serde_json::Value {
        match self {
            Json::String(s) => serde_json::Value::String(s.clone()),
            Json::Bool(b) => serde_json::Value::Bool(*b),
            Json::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Json::Null => serde_json::Value::Null,
            Json::Dictionary(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_native()))
                    .collect(),
            ),
            Json::Array(values) => {
                serde_json::Value::Array(values.iter().map(Json::to_native).collect())
            }
        }
    }
}

struct NativeSerializer;

type Unsupported = Impossible<Json, BadTypeError>;

impl ser::Serializer for NativeSerializer {
    type Ok = Json;
    type Error = BadTypeError;
    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = Unsupported;
    type SerializeTupleVariant = Unsupported;
    type SerializeMap = SerializeDictionary;
    type SerializeStruct = Unsupported;
    type SerializeStructVariant = Unsupported;

    fn serialize_none(self) -> Result<Json, BadTypeError> {
        Ok(Json::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Json, BadTypeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Json, BadTypeError> {
        Ok(Json::Null)
    }

    fn serialize_str(self, v: &str) -> Result<Json, BadTypeError> {
        Ok(Json::String(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Json, BadTypeError> {
        Ok(Json::String(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Json, BadTypeError> {
        Ok(Json::Number(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Json, BadTypeError> {
        Ok(Json::Number(v as f64))
    }

    fn serialize_i128(self, v: i128) -> Result<Json, BadTypeError> {
        Ok(Json::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Json, BadTypeError> {
        Ok(Json::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Json, BadTypeError> {
        Ok(Json::Number(v as f64))
    }

    fn serialize_u128(self, v: u128) -> Result<Json, BadTypeError> {
        Ok(Json::Number(v as f64))
    }

    fn serialize_bool(self, v: bool) -> Result<Json, BadTypeError> {
        Ok(Json::Bool(v))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, BadTypeError> {
        Ok(SerializeArray {
            values: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, BadTypeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDictionary, BadTypeError> {
        Ok(SerializeDictionary {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Json, BadTypeError> {
        Err(BadTypeError::new("byte buffer"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Json, BadTypeError> {
        Err(BadTypeError::new(format!("unit struct `{}`", name)))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Json, BadTypeError> {
        Err(BadTypeError::new(format!("enum variant `{}::{}`", name, variant)))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _value: &T,
    ) -> Result<Json, BadTypeError> {
        Err(BadTypeError::new(format!("newtype struct `{}`", name)))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Json, BadTypeError> {
        Err(BadTypeError::new(format!("enum variant `{}::{}`", name, variant)))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Unsupported, BadTypeError> {
        Err(BadTypeError::new(format!("tuple struct `{}`", name)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Unsupported, BadTypeError> {
        Err(BadTypeError::new(format!("enum variant `{}::{}`", name, variant)))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Unsupported, BadTypeError> {
        Err(BadTypeError::new(format!("struct `{}`", name)))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Unsupported, BadTypeError> {
        Err(BadTypeError::new(format!("enum variant `{}::{}`", name, variant)))
    }
}

struct SerializeArray {
    values: Vec<Json>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Json;
    type Error = BadTypeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BadTypeError> {
        self.values.push(value.serialize(NativeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Json, BadTypeError> {
        Ok(Json::Array(self.values))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Json;
    type Error = BadTypeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BadTypeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Json, BadTypeError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeDictionary {
    map: Map,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeDictionary {
    type Ok = Json;
    type Error = BadTypeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), BadTypeError> {
        match key.serialize(NativeSerializer)? {
            Json::String(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            other => Err(BadTypeError::new(format!("{} dictionary key", other.type_name()))),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BadTypeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| BadTypeError::new("dictionary value without a key"))?;
        // last value wins
        self.map.insert(key, value.serialize(NativeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Json, BadTypeError> {
        Ok(Json::Dictionary(self.map))
    }
}
