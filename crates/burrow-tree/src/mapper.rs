//! Bridge between application types and document values.
//!
//! Anything implementing `serde::Serialize` can be stored; anything
//! implementing `serde::de::DeserializeOwned` can be read back. Conversion
//! goes through `serde_json`'s value model, so the mapping is exactly the
//! JSON one: structs and maps become objects, sequences become arrays,
//! `None` becomes null.

use burrow_types::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize an application value into a fresh document value.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Value> {
    serde_json::to_value(value).map(Value::from)
}

/// Deserialize a document value into an application type.
///
/// Conversion is strict: a string is not accepted where a number is
/// expected, and a fractional number is not accepted as an integer.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> serde_json::Result<T> {
    serde_json::from_value(value.to_json())
}
