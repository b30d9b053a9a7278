//! Typed getters.
//!
//! Scalar getters never fail: a missing or unusable entry yields the
//! caller's default. Two quirks are part of the contract:
//!
//! - [`Node::get_string`] treats an empty string as unset.
//! - [`Node::get_number`] treats zero as unset.
//!
//! [`Node::get_string_strict`] and [`Node::get_number_strict`] report
//! exactly what is stored.
//!
//! Getters for mapped types ([`Node::get_object`], [`Node::get_list`]) have
//! no sensible default and fail with [`TreeError::InvalidType`] when the
//! stored shape does not fit.

use burrow_types::Value;
use serde::de::DeserializeOwned;

use crate::error::{TreeError, TreeResult};
use crate::mapper;
use crate::node::Node;

impl Node {
    /// The string form of the entry under `key`, or `default` if the entry
    /// is missing, null, or empty.
    ///
    /// Numbers and booleans come back as their literal text; nested nodes
    /// and lists as compact JSON.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(|v| v.to_text())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// The string stored under `key`, including the empty string.
    pub fn get_string_strict(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integral value of the entry under `key`, or `default` if it is
    /// missing, not numeric, or zero.
    ///
    /// Doubles truncate toward zero and numeric strings are parsed, so a
    /// stored `0.4` also yields `default`.
    pub fn get_number(&self, key: &str, default: i64) -> i64 {
        match self.get(key).map_or(0, |v| v.coerce_i64()) {
            0 => default,
            n => n,
        }
    }

    /// The integer stored under `key`, including zero.
    pub fn get_number_strict(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// The boolean under `key` (`"true"`/`"false"` strings are accepted), or
    /// `default` for anything else.
    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.coerce_bool())
            .unwrap_or(default)
    }

    /// The floating point value under `key`, or `default` if it is missing
    /// or not numeric.
    pub fn get_decimal(&self, key: &str, default: f64) -> f64 {
        let value = self.get(key).map_or(f64::NAN, |v| v.coerce_f64());
        if value.is_nan() {
            default
        } else {
            value
        }
    }

    /// Deserialize the nested object under `key`.
    ///
    /// Returns `Ok(None)` if there is no object under `key`.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> TreeResult<Option<T>> {
        let Some(object) = self.object().child_object(key) else {
            return Ok(None);
        };
        mapper::from_value(&Value::Object(object))
            .map(Some)
            .map_err(|e| TreeError::invalid_type(key, e.to_string()))
    }

    /// Convert every element of the list under `key`.
    ///
    /// Returns an empty list if there is no list under `key`, never an
    /// error. Fails if any element does not convert to `T`.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str) -> TreeResult<Vec<T>> {
        let Some(Value::Array(items)) = self.get(key) else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                mapper::from_value(item).map_err(|e| {
                    TreeError::invalid_type(
                        key,
                        format!("element {index} is not a {}: {e}", std::any::type_name::<T>()),
                    )
                })
            })
            .collect()
    }
}
