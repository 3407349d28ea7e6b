use crate::{
    arena::{Document, Mapping, Sequence, Value},
    Error, JsonTraits, JsonType,
};

/// [`JsonTraits`] over the native [`arena`](crate::arena) tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaJson;

impl JsonTraits for ArenaJson {
    type Value = Value;
    type Object = Mapping;
    type Array = Sequence;
    type Document = Document;

    fn classify(value: &Value) -> Result<JsonType, Error> {
        value.json_type().ok_or_else(Error::unclassifiable)
    }

    fn as_object(value: &Value) -> Result<Mapping, Error> {
        Mapping::try_from(value.clone())
    }

    fn as_array(value: &Value) -> Result<Sequence, Error> {
        Sequence::try_from(value.clone())
    }

    fn as_string(value: &Value) -> Result<String, Error> {
        value
            .view()
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::bad_coercion(JsonType::String, value.json_type()))
    }

    fn as_int(value: &Value) -> Result<i64, Error> {
        value
            .view()
            .as_integer()
            .ok_or_else(|| Error::bad_coercion(JsonType::Integer, value.json_type()))
    }

    fn as_bool(value: &Value) -> Result<bool, Error> {
        value
            .view()
            .as_bool()
            .ok_or_else(|| Error::bad_coercion(JsonType::Boolean, value.json_type()))
    }

    fn as_number(value: &Value) -> Result<f64, Error> {
        value
            .view()
            .as_number()
            .ok_or_else(|| Error::bad_coercion(JsonType::Number, value.json_type()))
    }

    fn from_object(object: Mapping) -> Value {
        object.into()
    }

    fn from_array(array: Sequence) -> Value {
        array.into()
    }

    fn from_string(string: String) -> Value {
        string.into()
    }

    fn from_int(integer: i64) -> Value {
        integer.into()
    }

    fn from_bool(boolean: bool) -> Value {
        boolean.into()
    }

    fn from_number(number: f64) -> Value {
        number.into()
    }

    fn array_len(array: &Sequence) -> usize {
        array.len()
    }

    fn array_get(array: &Sequence, index: usize) -> Option<Value> {
        array.get(index).map(|item| item.to_value())
    }

    fn array_push(array: &mut Sequence, value: Value) {
        array.push(value);
    }

    fn object_find(object: &Mapping, key: &str) -> Option<Value> {
        object.find(key).map(|value| value.to_value())
    }

    fn object_find_or_insert(object: &mut Mapping, key: &str) -> Value {
        object.find_or_insert(key).view().to_value()
    }

    fn object_insert(object: &mut Mapping, key: &str, value: Value) {
        object.insert(key, value);
    }

    fn parse(document: &mut Document, text: &str) -> bool {
        document.parse(text).is_ok()
    }

    fn serialize(document: &Document) -> String {
        document.serialize()
    }

    fn serialize_value(value: &Value) -> String {
        value.to_string()
    }

    fn root(document: &Document) -> Value {
        document.to_value()
    }

    fn into_document(value: Value) -> Document {
        value.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn as_object_copies() {
        let mut value = Value::from(Mapping::from_iter([("a", 1)]));
        let mut object = ArenaJson::as_object(&value).expect("Object");
        object.insert("b", 2);
        value.view_mut().insert("c", 3).expect("Object");
        assert_eq!(object.to_string(), r#"{"a":1,"b":2}"#);
        assert_eq!(value.to_string(), r#"{"a":1,"c":3}"#);
    }

    #[test]
    fn non_finite_numbers_are_null() {
        assert!(ArenaJson::from_number(f64::NAN).is_null());
        assert!(ArenaJson::from_number(f64::NEG_INFINITY).is_null());
        assert_eq!(ArenaJson::serialize_value(&ArenaJson::from_number(f64::INFINITY)), "null");
    }

    #[test]
    fn find_or_insert_adds_null_entry() {
        let mut object = Mapping::new();
        assert!(ArenaJson::object_find_or_insert(&mut object, "nbf").is_null());
        assert!(object.contains_key("nbf"));
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn classify_null_fails() {
        let error = ArenaJson::classify(&Value::null()).expect_err("Null");
        assert_eq!(error.kind(), &ErrorKind::Unclassifiable);
    }

    #[test]
    fn coercion_reports_both_kinds() {
        let error = ArenaJson::as_int(&Value::from("1")).expect_err("String");
        assert_eq!(
            error.kind(),
            &ErrorKind::BadCoercion {
                expected: JsonType::Integer,
                actual: Some(JsonType::String),
            }
        );
    }
}
