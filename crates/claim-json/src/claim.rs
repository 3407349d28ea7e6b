//! Claim values generic over the JSON engine.
use core::{fmt, str::FromStr};
use std::{
    collections::BTreeSet,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::de::IgnoredAny;

use crate::{Error, JsonTraits, JsonType};

/// A single token claim backed by the value type of `J`.
pub struct Claim<J: JsonTraits> {
    value: J::Value,
}

impl<J: JsonTraits> Claim<J> {
    /// Wrap an engine value as a claim.
    #[must_use]
    pub fn new(value: J::Value) -> Self {
        Claim { value }
    }

    #[must_use]
    pub fn from_string(string: impl Into<String>) -> Self {
        Claim::new(J::from_string(string.into()))
    }

    /// An array of unique strings in lexicographic order.
    #[must_use]
    pub fn from_set(set: BTreeSet<String>) -> Self {
        Claim::new(J::from_array(
            set.into_iter().map(J::from_string).collect(),
        ))
    }

    /// Whole seconds relative to the Unix epoch, negative before it.
    #[must_use]
    pub fn from_date(date: SystemTime) -> Self {
        let seconds = match date.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
        };
        Claim::new(J::from_int(seconds))
    }

    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = J::Value>,
    {
        values.into_iter().collect()
    }

    /// # Errors
    ///
    /// Fails for `null` claims.
    pub fn get_type(&self) -> Result<JsonType, Error> {
        J::classify(&self.value)
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is a string.
    pub fn as_string(&self) -> Result<String, Error> {
        J::as_string(&self.value)
    }

    /// Interpret an integer claim as seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns a coercion error unless the claim is an integer, and
    /// [`ErrorKind::InvalidTimestamp`](crate::ErrorKind::InvalidTimestamp)
    /// if the platform clock cannot represent it.
    pub fn as_date(&self) -> Result<SystemTime, Error> {
        let seconds = J::as_int(&self.value)?;
        let offset = Duration::from_secs(seconds.unsigned_abs());
        if seconds >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
        .ok_or_else(|| Error::invalid_timestamp(seconds))
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is an array.
    pub fn as_array(&self) -> Result<J::Array, Error> {
        J::as_array(&self.value)
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is an array of strings.
    pub fn as_set(&self) -> Result<BTreeSet<String>, Error> {
        self.as_array()?
            .into_iter()
            .map(|item| J::as_string(&item))
            .collect()
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is an integer.
    pub fn as_int(&self) -> Result<i64, Error> {
        J::as_int(&self.value)
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is a boolean.
    pub fn as_bool(&self) -> Result<bool, Error> {
        J::as_bool(&self.value)
    }

    /// # Errors
    ///
    /// Returns a coercion error unless the claim is a floating-point number.
    pub fn as_number(&self) -> Result<f64, Error> {
        J::as_number(&self.value)
    }

    #[must_use]
    pub fn to_json(&self) -> &J::Value {
        &self.value
    }

    #[must_use]
    pub fn into_json(self) -> J::Value {
        self.value
    }
}

impl<J: JsonTraits> Clone for Claim<J> {
    fn clone(&self) -> Self {
        Claim::new(self.value.clone())
    }
}

impl<J: JsonTraits> PartialEq for Claim<J> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<J: JsonTraits> fmt::Debug for Claim<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Claim").field(&self.value).finish()
    }
}

impl<J: JsonTraits> FromIterator<J::Value> for Claim<J> {
    fn from_iter<I: IntoIterator<Item = J::Value>>(iter: I) -> Self {
        Claim::new(J::from_array(iter.into_iter().collect()))
    }
}

impl<J: JsonTraits> FromStr for Claim<J> {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut document = J::Document::default();
        if J::parse(&mut document, text) {
            Ok(Claim::new(J::root(&document)))
        } else {
            Err(locate(text))
        }
    }
}

impl<J: JsonTraits> fmt::Display for Claim<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&J::serialize_value(&self.value))
    }
}

/// Engines only report success, so the failure position comes from a second,
/// validating pass.
fn locate(text: &str) -> Error {
    let error = serde_json::from_str::<IgnoredAny>(text).err().unwrap_or_else(|| {
        <serde_json::Error as serde::de::Error>::custom("document rejected by the JSON engine")
    });
    Error::parse(error)
}
