use json_value::{json, Json};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use test_case::test_case;

#[test_case(r#""string""#, json!("string") ; "string")]
#[test_case("null", Json::Null ; "null")]
#[test_case("5", Json::Number(5.0) ; "number")]
#[test_case("false", Json::Bool(false) ; "bool")]
#[test_case(r#"{"test": 5 }"#, json!({"test": 5}) ; "dictionary")]
#[test_case(r#"["test", 5]"#, json!(["test", 5]) ; "array")]
fn test_decode(input: &str, expected: Json) {
    assert_eq!(Json::decode(input.as_bytes()).unwrap(), expected);
}

#[test_case("{bad json" ; "unterminated object")]
#[test_case("NaN" ; "nan")]
#[test_case("[1] trailing" ; "trailing garbage")]
#[test_case("" ; "empty")]
#[test_case("'single'" ; "single quotes")]
fn test_decode_corrupted(input: &str) {
    assert!(Json::decode(input.as_bytes()).is_err());
}

#[test]
fn test_from_native_array() {
    let v = Json::from_native(&("test", 5)).unwrap();
    assert_eq!(v, json!(["test", 5]));
}

#[test]
fn test_from_native_dictionary() {
    let mut data = HashMap::new();
    data.insert("test", 5);
    assert_eq!(Json::from_native(&data).unwrap(), json!({"test": 5}));
}

#[test]
fn test_from_native_opaque() {
    #[derive(Serialize)]
    struct Opaque;

    assert!(Json::from_native(&Opaque).is_err());
}

#[test_case(json!(["a", 1, null, {"b": [true, 2.5]}]) ; "mixed")]
#[test_case(json!({}) ; "empty dictionary")]
#[test_case(json!("\u{1F600} \"quoted\"\n") ; "escaped string")]
fn test_round_trips(v: Json) {
    let encoded = v.encode().unwrap();
    assert_eq!(Json::decode(&encoded).unwrap(), v);
    assert_eq!(Json::from_native(&v.to_native()).unwrap(), v);
}

#[test]
fn test_order() {
    assert_ne!(json!(["a", "b"]), json!(["b", "a"]));
    assert_eq!(json!({"k1": 1, "k2": 2}), json!({"k2": 2, "k1": 1}));
    assert_eq!(json!({"x": 1, "x": 2}), json!({"x": 2}));
}

#[test]
fn test_hash_structural() {
    fn hash_of(v: &Json) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }
    let a = Json::decode(br#"{"a": 1, "b": [1, 2], "c": {"d": null, "e": "f"}}"#).unwrap();
    let b = Json::decode(br#"{"c": {"e": "f", "d": null}, "b": [1, 2], "a": 1}"#).unwrap();
    assert_eq!(hash_of(&a), hash_of(&b));

    let set: HashSet<Json> = vec![a, b, json!([1, 2]), json!([2, 1])].into_iter().collect();
    assert_eq!(set.len(), 3);
}

#[test]
fn test_display_is_sorted_and_indented() {
    let v = json!({"b": [1, "x"], "a": null});
    let expected = r#"{
    "a": null,
    "b": [
        1,
        "x"
    ]
}"#;
    assert_eq!(v.to_string(), expected);
}
