use compact_str::CompactString;
use serde_json::{Map, Number, Value};

use crate::{
    arena::{
        self,
        node::{Arena, Node, NodeId},
        ValueRef,
    },
    Error, JsonTraits, JsonType,
};

/// [`JsonTraits`] over [`serde_json::Value`].
///
/// Integers are the numbers representable as `i64`; everything else stored in
/// a [`Number`] is classified as a floating-point number.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJson;

#[inline]
fn mismatch(expected: JsonType, value: &Value) -> Error {
    Error::bad_coercion(expected, SerdeJson::classify(value).ok())
}

impl JsonTraits for SerdeJson {
    type Value = Value;
    type Object = Map<String, Value>;
    type Array = Vec<Value>;
    type Document = Value;

    fn classify(value: &Value) -> Result<JsonType, Error> {
        if value.is_boolean() {
            Ok(JsonType::Boolean)
        } else if value.is_i64() {
            Ok(JsonType::Integer)
        } else if value.is_number() {
            Ok(JsonType::Number)
        } else if value.is_string() {
            Ok(JsonType::String)
        } else if value.is_array() {
            Ok(JsonType::Array)
        } else if value.is_object() {
            Ok(JsonType::Object)
        } else {
            Err(Error::unclassifiable())
        }
    }

    fn as_object(value: &Value) -> Result<Map<String, Value>, Error> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| mismatch(JsonType::Object, value))
    }

    fn as_array(value: &Value) -> Result<Vec<Value>, Error> {
        value
            .as_array()
            .cloned()
            .ok_or_else(|| mismatch(JsonType::Array, value))
    }

    fn as_string(value: &Value) -> Result<String, Error> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(JsonType::String, value))
    }

    fn as_int(value: &Value) -> Result<i64, Error> {
        value
            .as_i64()
            .ok_or_else(|| mismatch(JsonType::Integer, value))
    }

    fn as_bool(value: &Value) -> Result<bool, Error> {
        value
            .as_bool()
            .ok_or_else(|| mismatch(JsonType::Boolean, value))
    }

    fn as_number(value: &Value) -> Result<f64, Error> {
        match value {
            Value::Number(number) if !number.is_i64() => number.as_f64(),
            _ => None,
        }
        .ok_or_else(|| mismatch(JsonType::Number, value))
    }

    fn from_object(object: Map<String, Value>) -> Value {
        Value::Object(object)
    }

    fn from_array(array: Vec<Value>) -> Value {
        Value::Array(array)
    }

    fn from_string(string: String) -> Value {
        Value::String(string)
    }

    fn from_int(integer: i64) -> Value {
        Value::Number(integer.into())
    }

    fn from_bool(boolean: bool) -> Value {
        Value::Bool(boolean)
    }

    fn from_number(number: f64) -> Value {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }

    fn array_len(array: &Vec<Value>) -> usize {
        array.len()
    }

    fn array_get(array: &Vec<Value>, index: usize) -> Option<Value> {
        array.get(index).cloned()
    }

    fn array_push(array: &mut Vec<Value>, value: Value) {
        array.push(value);
    }

    fn object_find(object: &Map<String, Value>, key: &str) -> Option<Value> {
        object.get(key).cloned()
    }

    fn object_find_or_insert(object: &mut Map<String, Value>, key: &str) -> Value {
        object.entry(key).or_insert(Value::Null).clone()
    }

    fn object_insert(object: &mut Map<String, Value>, key: &str, value: Value) {
        object.insert(key.to_owned(), value);
    }

    fn parse(document: &mut Value, text: &str) -> bool {
        match serde_json::from_str(text) {
            Ok(parsed) => {
                *document = parsed;
                true
            }
            Err(_) => false,
        }
    }

    fn serialize(document: &Value) -> String {
        document.to_string()
    }

    fn serialize_value(value: &Value) -> String {
        value.to_string()
    }

    fn root(document: &Value) -> Value {
        document.clone()
    }

    fn into_document(value: Value) -> Value {
        value
    }
}

impl From<Value> for arena::Value {
    fn from(value: Value) -> Self {
        let mut arena = Arena::default();
        let root = lower(&mut arena, value);
        arena::Value { arena, root }
    }
}

fn lower(arena: &mut Arena, value: Value) -> NodeId {
    let node = match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(number) => lower_number(&number),
        Value::String(s) => Node::String(CompactString::from(s)),
        Value::Array(items) => Node::Array(
            items
                .into_iter()
                .map(|item| lower(arena, item))
                .collect(),
        ),
        Value::Object(entries) => Node::Object(
            entries
                .into_iter()
                .map(|(key, item)| (CompactString::from(key), lower(arena, item)))
                .collect(),
        ),
    };
    arena.alloc(node)
}

fn lower_number(number: &Number) -> Node {
    if let Some(i) = number.as_i64() {
        Node::Integer(i)
    } else if let Some(u) = number.as_u64() {
        Node::from_u64(u)
    } else {
        number.as_f64().map_or(Node::Null, Node::from_f64)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value.node() {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Integer(i) => Value::Number((*i).into()),
            Node::Number(f) => SerdeJson::from_number(*f),
            Node::String(s) => Value::String(s.to_string()),
            Node::Array(_) => Value::Array(value.elements().map(Value::from).collect()),
            Node::Object(_) => Value::Object(
                value
                    .entries()
                    .map(|(key, item)| (key.to_owned(), Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<&arena::Value> for Value {
    fn from(value: &arena::Value) -> Self {
        value.view().into()
    }
}

impl PartialEq<Value> for ValueRef<'_> {
    fn eq(&self, other: &Value) -> bool {
        eq(other, *self)
    }
}

impl PartialEq<ValueRef<'_>> for Value {
    fn eq(&self, other: &ValueRef<'_>) -> bool {
        eq(self, *other)
    }
}

impl PartialEq<Value> for arena::Value {
    fn eq(&self, other: &Value) -> bool {
        eq(other, self.view())
    }
}

impl PartialEq<arena::Value> for Value {
    fn eq(&self, other: &arena::Value) -> bool {
        eq(self, other.view())
    }
}

#[allow(clippy::float_cmp)]
fn eq(lhs: &Value, rhs: ValueRef<'_>) -> bool {
    match (lhs, rhs.node()) {
        (Value::Null, Node::Null) => true,
        (Value::Bool(l), Node::Bool(r)) => l == r,
        (Value::Number(l), Node::Integer(r)) => l.as_i64() == Some(*r),
        (Value::Number(l), Node::Number(r)) => !l.is_i64() && l.as_f64() == Some(*r),
        (Value::String(l), Node::String(r)) => l.as_str() == r.as_str(),
        (Value::Array(l), Node::Array(r)) => {
            if l.len() != r.len() {
                return false;
            }
            l.iter()
                .zip(rhs.elements())
                .all(|(l, r)| eq(l, r))
        }
        (Value::Object(l), Node::Object(r)) => {
            if l.len() != r.len() {
                return false;
            }
            rhs.entries()
                .all(|(key, r)| l.get(key).is_some_and(|l| eq(l, r)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Mapping, Sequence};
    use serde_json::json;
    use test_case::test_case;

    fn arena_value(text: &str) -> arena::Value {
        text.parse::<arena::Document>()
            .expect("Valid JSON")
            .into_value()
    }

    #[test_case(json!(true), JsonType::Boolean; "bool")]
    #[test_case(json!(42), JsonType::Integer; "positive integer")]
    #[test_case(json!(-42), JsonType::Integer; "negative integer")]
    #[test_case(json!(u64::MAX), JsonType::Number; "u64 above i64 range")]
    #[test_case(json!(3.5), JsonType::Number; "float")]
    #[test_case(json!(1.0), JsonType::Number; "integral float")]
    #[test_case(json!("hello"), JsonType::String; "string")]
    #[test_case(json!([1, 2, 3]), JsonType::Array; "array")]
    #[test_case(json!({"a": 1}), JsonType::Object; "object")]
    fn classify(value: Value, expected: JsonType) {
        assert_eq!(SerdeJson::classify(&value).expect("Has a type"), expected);
    }

    #[test]
    fn classify_null_fails() {
        assert!(SerdeJson::classify(&Value::Null).is_err());
    }

    #[test]
    fn numbers_are_not_integers() {
        assert!(SerdeJson::as_int(&json!(1.0)).expect_err("Float").is_bad_coercion());
        assert!(SerdeJson::as_number(&json!(1)).expect_err("Integer").is_bad_coercion());
        assert_eq!(SerdeJson::as_number(&json!(1.5)).expect("Float"), 1.5);
        assert_eq!(SerdeJson::as_int(&json!(-1)).expect("Integer"), -1);
    }

    #[test]
    fn non_finite_number_becomes_null() {
        assert_eq!(SerdeJson::from_number(f64::INFINITY), Value::Null);
    }

    #[test]
    fn find_or_insert_keeps_existing_entry() {
        let mut object = SerdeJson::as_object(&json!({"iat": 1})).expect("Object");
        assert_eq!(SerdeJson::object_find_or_insert(&mut object, "iat"), json!(1));
        assert_eq!(SerdeJson::object_find_or_insert(&mut object, "nbf"), Value::Null);
        assert_eq!(Value::Object(object), json!({"iat": 1, "nbf": null}));
    }

    #[test_case(json!(null), "null"; "null")]
    #[test_case(json!(true), "true"; "bool")]
    #[test_case(json!(42u64), "42"; "positive integer")]
    #[test_case(json!(-42), "-42"; "negative integer")]
    #[test_case(json!(2.5), "2.5"; "float")]
    #[test_case(json!("hello"), r#""hello""#; "string")]
    #[test_case(json!([1, 2, 3]), "[1,2,3]"; "array")]
    #[test_case(json!({"a": 1, "b": "test", "c": true}), r#"{"a":1,"b":"test","c":true}"#; "object")]
    fn test_json_conversion(value: Value, expected: &str) {
        let converted = arena::Value::from(value.clone());
        assert_eq!(converted, arena_value(expected));
        assert_eq!(Value::from(&converted), value);
    }

    #[test_case(json!(null), "null"; "null equals")]
    #[test_case(json!(true), "true"; "bool equals")]
    #[test_case(json!(42), "42"; "positive number equals")]
    #[test_case(json!(-42), "-42"; "negative number equals")]
    #[test_case(json!(2.5), "2.5"; "float number equals")]
    #[test_case(json!("hello"), r#""hello""#; "string equals")]
    #[test_case(json!([1, 2, 3]), "[1,2,3]"; "array equals")]
    #[test_case(json!({"b": "test", "a": 1, "c": true}), r#"{"a":1,"b":"test","c":true}"#; "object equals")]
    fn test_comparison_eq(serde_value: Value, text: &str) {
        let custom = arena_value(text);
        assert_eq!(serde_value, custom);
        assert_eq!(custom, serde_value);
        assert_eq!(serde_value, custom.view());
        assert_eq!(custom.view(), serde_value);
    }

    #[test_case(json!(null), "true"; "null != bool")]
    #[test_case(json!(true), "false"; "bool not equal")]
    #[test_case(json!(42), "-42"; "positive vs negative number not equal")]
    #[test_case(json!(1), "1.0"; "integer vs float not equal")]
    #[test_case(json!(2.5), "0.75"; "different floats not equal")]
    #[test_case(json!("hello"), r#""world""#; "different strings not equal")]
    #[test_case(json!([1, 2, 3]), "[1,2,4]"; "different arrays not equal")]
    #[test_case(json!([1, 2, 3]), "[1,2]"; "different array lengths not equal")]
    #[test_case(json!({"a": 1}), r#"{"a":2}"#; "different object not equal")]
    #[test_case(json!({"a": 1}), r#"{"b":1}"#; "different keys not equal")]
    fn test_comparison_neq(serde_value: Value, text: &str) {
        let custom = arena_value(text);
        assert_ne!(serde_value, custom);
        assert_ne!(custom, serde_value);
    }

    #[test]
    fn nested_containers_survive_conversion() {
        let mut payload = Mapping::new();
        payload.insert("aud", Sequence::from_range(["a", "b"]));
        payload.insert("ctx", Mapping::from_iter([("depth", 2)]));
        let converted = Value::from(&arena::Value::from(payload));
        assert_eq!(converted, json!({"aud": ["a", "b"], "ctx": {"depth": 2}}));
    }
}
