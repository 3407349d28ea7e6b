//! # claim-json
//!
//! A backend-agnostic JSON value contract for token claims.
//!
//! Token processing code is written once against [`JsonTraits`] and runs on
//! any JSON engine that implements it. Two engines are provided:
//!
//! - [`ArenaJson`]: the native [`arena`] tree, where a document owns all of
//!   its nodes in a single arena;
//! - [`SerdeJson`]: plain [`serde_json::Value`].
//!
//! ```rust
//! use claim_json::{ArenaJson, JsonTraits, JsonType};
//!
//! let mut document = <ArenaJson as JsonTraits>::Document::default();
//! assert!(ArenaJson::parse(&mut document, r#"{"exp": 1700000000}"#));
//!
//! let payload = ArenaJson::as_object(&ArenaJson::root(&document))?;
//! let exp = ArenaJson::object_find(&payload, "exp").expect("Claim is present");
//! assert_eq!(ArenaJson::classify(&exp)?, JsonType::Integer);
//! assert_eq!(ArenaJson::as_int(&exp)?, 1_700_000_000);
//! // No silent conversion between integers and numbers
//! assert!(ArenaJson::as_number(&exp).is_err());
//! # Ok::<(), claim_json::Error>(())
//! ```
use core::fmt;

pub mod arena;
pub mod claim;
mod error;
mod impls;
mod types;

pub use claim::Claim;
pub use error::{Error, ErrorKind};
pub use impls::{ArenaJson, SerdeJson};
pub use types::JsonType;

/// The contract a JSON engine satisfies to carry token claims.
///
/// Every function is associated (no `self`), so an implementation is usually
/// a unit struct naming the engine.
pub trait JsonTraits {
    /// A single JSON value. `Clone` must be a deep copy.
    type Value: Clone + Default + PartialEq + fmt::Debug;
    /// A JSON object.
    type Object: Clone + Default + fmt::Debug;
    /// A JSON array.
    type Array: Clone
        + Default
        + fmt::Debug
        + FromIterator<Self::Value>
        + IntoIterator<Item = Self::Value>;
    /// The owner of a parsed or constructed tree.
    type Document: Default;

    /// Kind of `value`, tested in the order boolean, integer, number,
    /// string, array, object.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` matches none of them (`null`).
    fn classify(value: &Self::Value) -> Result<JsonType, Error>;

    /// # Errors
    ///
    /// Returns a coercion error unless `value` is an object.
    fn as_object(value: &Self::Value) -> Result<Self::Object, Error>;
    /// # Errors
    ///
    /// Returns a coercion error unless `value` is an array.
    fn as_array(value: &Self::Value) -> Result<Self::Array, Error>;
    /// # Errors
    ///
    /// Returns a coercion error unless `value` is a string.
    fn as_string(value: &Self::Value) -> Result<String, Error>;
    /// # Errors
    ///
    /// Returns a coercion error unless `value` is an integer.
    fn as_int(value: &Self::Value) -> Result<i64, Error>;
    /// # Errors
    ///
    /// Returns a coercion error unless `value` is a boolean.
    fn as_bool(value: &Self::Value) -> Result<bool, Error>;
    /// # Errors
    ///
    /// Returns a coercion error unless `value` is a floating-point number.
    fn as_number(value: &Self::Value) -> Result<f64, Error>;

    fn from_object(object: Self::Object) -> Self::Value;
    fn from_array(array: Self::Array) -> Self::Value;
    fn from_string(string: String) -> Self::Value;
    fn from_int(integer: i64) -> Self::Value;
    fn from_bool(boolean: bool) -> Self::Value;
    /// Non-finite numbers have no JSON representation and become `null`.
    fn from_number(number: f64) -> Self::Value;

    fn array_len(array: &Self::Array) -> usize;
    /// Copy of the element at `index`, or `None` if out of range.
    fn array_get(array: &Self::Array, index: usize) -> Option<Self::Value>;
    fn array_push(array: &mut Self::Array, value: Self::Value);

    /// Copy of the entry under `key`. Never inserts.
    fn object_find(object: &Self::Object, key: &str) -> Option<Self::Value>;
    /// Copy of the entry under `key`, inserting `null` under that key first
    /// if it is missing.
    fn object_find_or_insert(object: &mut Self::Object, key: &str) -> Self::Value;
    /// Store `value` under `key`, replacing any previous entry.
    fn object_insert(object: &mut Self::Object, key: &str, value: Self::Value);

    /// Parse `text` into `document`.
    ///
    /// Returns `false` on malformed input or on containers nested deeper than
    /// 127 levels; `document` is then not a complete parse and its content is
    /// engine-specific.
    fn parse(document: &mut Self::Document, text: &str) -> bool;
    /// Compact JSON text of `document`.
    ///
    /// Containers nested deeper than the parser accepts (127 levels) are
    /// written out but cannot be parsed back.
    fn serialize(document: &Self::Document) -> String;
    /// Compact JSON text of a single value.
    fn serialize_value(value: &Self::Value) -> String {
        Self::serialize(&Self::into_document(value.clone()))
    }
    /// Copy of the root value of `document`.
    fn root(document: &Self::Document) -> Self::Value;
    /// Make `value` the root of a new document.
    fn into_document(value: Self::Value) -> Self::Document;
}
