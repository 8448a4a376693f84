/// Builds a [`Json`](crate::Json) from literal syntax.
///
/// ```
/// use json_value::{json, Json};
///
/// let v = json!({"name": "x", "tags": ["a", 1, (-2.5), null], "ok": true});
/// assert_eq!(v.get("tags").and_then(|t| t.get_index(2)), Some(&Json::Number(-2.5)));
/// ```
///
/// Array elements and object values are single tokens; wrap anything longer,
/// such as `-1` or a method call, in parentheses. Repeated object keys keep
/// the last value.
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::Json::Null
    };
    ([]) => {
        $crate::Json::Array(::std::vec::Vec::new())
    };
    ([ $($element:tt),+ $(,)? ]) => {
        $crate::Json::Array(::std::vec![ $( $crate::json!($element) ),+ ])
    };
    ({}) => {
        $crate::Json::Dictionary($crate::Map::new())
    };
    ({ $($key:literal : $value:tt),+ $(,)? }) => {
        $crate::Json::from_pairs(::std::vec![ $( ($key, $crate::json!($value)) ),+ ])
    };
    ($other:expr) => {
        $crate::Json::from($other)
    };
}
