use std::collections::HashMap;
use std::hash::{Hash, Hasher};

pub type Map = HashMap<String, Json>;

/// A JSON value.
///
/// Values are immutable trees: every composite owns its children. Equality
/// is structural, with dictionaries compared regardless of insertion order
/// and arrays compared element by element.
#[derive(Debug, Clone, Default)]
pub enum Json {
    String(String),
    Bool(bool),
    Number(f64),
    #[default]
    Null,
    Dictionary(Map),
    Array(Vec<Json>),
}

impl Json {
    /// Builds a dictionary from key/value pairs. A repeated key keeps its
    /// last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Json)>,
        K: Into<String>,
    {
        Json::Dictionary(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Json::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Json::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Json::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Json::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Json]> {
        match self {
            Json::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Map> {
        match self {
            Json::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.as_dictionary().and_then(|map| map.get(key))
    }

    /// Looks up `index` if this is an array.
    pub fn get_index(&self, index: usize) -> Option<&Json> {
        self.as_array().and_then(|values| values.get(index))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Json::String(_) => "string",
            Json::Bool(_) => "bool",
            Json::Number(_) => "number",
            Json::Null => "null",
            Json::Dictionary(_) => "dictionary",
            Json::Array(_) => "array",
        }
    }
}

/// Dictionary entries ordered by key code points.
pub(crate) fn sorted_entries(map: &Map) -> Vec<(&String, &Json)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

// NaN equals NaN so that `Eq` stays reflexive.
fn number_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn number_bits(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for Json {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Json::String(a), Json::String(b)) => a == b,
            (Json::Bool(a), Json::Bool(b)) => a == b,
            (Json::Number(a), Json::Number(b)) => number_eq(*a, *b),
            (Json::Null, Json::Null) => true,
            (Json::Dictionary(a), Json::Dictionary(b)) => a == b,
            (Json::Array(a), Json::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Json {}

impl Hash for Json {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Json::String(s) => s.hash(state),
            Json::Bool(b) => b.hash(state),
            Json::Number(n) => number_bits(*n).hash(state),
            Json::Null => {}
            Json::Dictionary(map) => {
                map.len().hash(state);
                for (key, value) in sorted_entries(map) {
                    key.hash(state);
                    value.hash(state);
                }
            }
            Json::Array(values) => values.hash(state),
        }
    }
}

impl From<&str> for Json {
    fn from(s: &str) -> Self {
        Json::String(s.to_string())
    }
}

impl From<String> for Json {
    fn from(s: String) -> Self {
        Json::String(s)
    }
}

impl From<bool> for Json {
    fn from(b: bool) -> Self {
        Json::Bool(b)
    }
}

macro_rules! from_number {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Json {
                fn from(n: $ty) -> Self {
                    Json::Number(n as f64)
                }
            }
        )*
    };
}

from_number! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 }

impl From<()> for Json {
    fn from(_: ()) -> Self {
        Json::Null
    }
}

impl<T: Into<Json>> From<Option<T>> for Json {
    fn from(value: Option<T>) -> Self {
        value.map_or(Json::Null, Into::into)
    }
}

impl<T: Into<Json>> From<Vec<T>> for Json {
    fn from(values: Vec<T>) -> Self {
        Json::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Json {
    fn from(map: Map) -> Self {
        Json::Dictionary(map)
    }
}

impl FromIterator<Json> for Json {
    fn from_iter<I: IntoIterator<Item = Json>>(iter: I) -> Self {
        Json::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Json) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    fn number(n: f64) -> Json {
        Json::Number(n)
    }

    #[test]
    fn test_array_order_matters() {
        let a = Json::Array(vec![Json::from("a"), number(1.0)]);
        let b = Json::Array(vec![number(1.0), Json::from("a")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_dictionary_order_ignored() {
        let a = Json::from_pairs(vec![("k1", number(1.0)), ("k2", Json::Null)]);
        let b = Json::from_pairs(vec![("k2", Json::Null), ("k1", number(1.0))]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let a = Json::from_pairs(vec![("x", number(1.0)), ("x", number(2.0))]);
        let b = Json::from_pairs(vec![("x", number(2.0))]);
        assert_eq!(a, b);
        assert_eq!(a.get("x"), Some(&number(2.0)));
    }

    #[test]
    fn test_variants_differ() {
        assert_ne!(Json::from(false), number(0.0));
        assert_ne!(Json::Null, Json::from(""));
        assert_ne!(Json::Array(vec![]), Json::Dictionary(Map::new()));
    }

    #[test]
    fn test_number_equality() {
        assert_eq!(number(f64::NAN), number(f64::NAN));
        assert_eq!(hash_of(&number(f64::NAN)), hash_of(&number(-f64::NAN)));
        assert_eq!(number(0.0), number(-0.0));
        assert_eq!(hash_of(&number(0.0)), hash_of(&number(-0.0)));
        assert_eq!(Json::from(5), number(5.0));
    }

    #[test]
    fn test_literal_construction() {
        assert_eq!(Json::from(()), Json::Null);
        assert_eq!(Json::from(None::<bool>), Json::Null);
        assert_eq!(Json::from(Some("a")), Json::String(String::from("a")));
        assert_eq!(Json::from(1.5f32), number(1.5));
        assert_eq!(
            Json::from(vec![1u8, 2]),
            Json::Array(vec![number(1.0), number(2.0)])
        );
        let collected: Json = vec![Json::Null, Json::from(true)].into_iter().collect();
        assert_eq!(collected, Json::Array(vec![Json::Null, Json::Bool(true)]));
        assert_eq!(Json::default(), Json::Null);
    }

    #[test]
    fn test_accessors() {
        let v = Json::from_pairs(vec![(
            "list",
            Json::from(vec![Json::from("a"), Json::from(true)]),
        )]);
        assert_eq!(v.type_name(), "dictionary");
        let list = v.get("list").unwrap();
        assert_eq!(list.get_index(0).and_then(Json::as_str), Some("a"));
        assert_eq!(list.get_index(1).and_then(Json::as_bool), Some(true));
        assert!(list.get_index(2).is_none());
        assert!(v.get("missing").is_none());
        assert!(list.get("list").is_none());
        assert_eq!(Json::from(3).as_f64(), Some(3.0));
        assert!(Json::Null.is_null());
    }
}
