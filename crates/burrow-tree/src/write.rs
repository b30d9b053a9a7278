//! Typed puts and list mutation.
//!
//! Every write lands directly in the shared tree; nothing is persisted until
//! the caller commits. Values are copied on the way in, so the tree never
//! aliases a caller's value and can never contain a cycle.

use burrow_types::Value;
use serde::Serialize;
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::mapper;
use crate::node::Node;

impl Node {
    /// Create or update the entry under `key`.
    ///
    /// Accepts strings, integers, booleans, doubles, `Option`s and raw
    /// [`Value`]s. A null value (including `None`) removes the key. Doubles
    /// must be finite.
    pub fn put(&self, key: &str, value: impl Into<Value>) -> TreeResult<&Self> {
        self.store_raw(key, value.into())?;
        Ok(self)
    }

    /// Store a serializable value as a new nested object under `key`.
    ///
    /// The object is built fresh from `value`; it replaces whatever was
    /// under `key` and shares nothing with any other part of the tree.
    pub fn put_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> TreeResult<&Self> {
        let mapped = mapper::to_value(value).map_err(|e| TreeError::invalid_type(key, e.to_string()))?;
        if !mapped.is_object() {
            return Err(TreeError::invalid_type(
                key,
                format!("a {} cannot be stored as a node; use a struct or map", mapped.kind()),
            ));
        }
        self.object().insert(key, mapped);
        Ok(self)
    }

    /// Store a sequence of serializable values as a list under `key`.
    ///
    /// A slice always maps to a list; an empty slice stores an empty list.
    /// Fails with [`TreeError::InvalidType`] if any item cannot be mapped,
    /// in which case nothing is stored.
    pub fn put_list<T: Serialize>(&self, key: &str, items: &[T]) -> TreeResult<&Self> {
        let list = mapper::to_value(items).map_err(|e| TreeError::invalid_type(key, e.to_string()))?;
        self.object().insert(key, list);
        Ok(self)
    }

    /// Write every entry of `entries` as is, bypassing the mapper.
    ///
    /// Null values remove their keys.
    pub fn put_all<I, K, V>(&self, entries: I) -> TreeResult<&Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            let key = key.into();
            self.store_raw(&key, value.into())?;
        }
        Ok(self)
    }

    /// Append `value` to the existing list under `key`.
    ///
    /// Fails with [`TreeError::NotExists`] if there is no list under `key`.
    /// Lists are never created implicitly; store one with
    /// [`Node::put_list`] first.
    pub fn add_item(&self, key: &str, value: impl Into<Value>) -> TreeResult<()> {
        let value = value.into();
        value
            .validate()
            .map_err(|e| TreeError::invalid_type(key, e.to_string()))?;
        self.push_item(key, value.deep_clone())
    }

    /// Append a serializable value, mapped to a nested object, to the
    /// existing list under `key`.
    pub fn add_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> TreeResult<()> {
        let mapped = mapper::to_value(value).map_err(|e| TreeError::invalid_type(key, e.to_string()))?;
        if !mapped.is_object() {
            return Err(TreeError::invalid_type(
                key,
                format!("a {} cannot be stored as a node; use a struct or map", mapped.kind()),
            ));
        }
        self.push_item(key, mapped)
    }

    /// Remove and return the element at `index` of the list under `key`.
    ///
    /// Fails with [`TreeError::InvalidType`] if `key` does not hold a list
    /// or `index` is out of bounds.
    pub fn remove_item(&self, key: &str, index: usize) -> TreeResult<Value> {
        let outcome = self.object().with_array_mut(key, |items| {
            if index < items.len() {
                Ok(items.remove(index))
            } else {
                Err(items.len())
            }
        });

        match outcome {
            Some(Ok(removed)) => {
                debug!(path = %self.path(), key, index, "list item removed");
                Ok(removed)
            }
            Some(Err(len)) => Err(TreeError::invalid_type(
                key,
                format!("index {index} is out of bounds for a list of length {len}"),
            )),
            None => Err(TreeError::invalid_type(key, "key does not hold a list")),
        }
    }

    fn push_item(&self, key: &str, value: Value) -> TreeResult<()> {
        let len = self
            .object()
            .with_array_mut(key, |items| {
                items.push(value);
                items.len()
            })
            .ok_or_else(|| TreeError::NotExists {
                key: key.to_string(),
                reason: format!("there is no list with this key in node {:?}", self.path()),
            })?;
        debug!(path = %self.path(), key, len, "list item added");
        Ok(())
    }

    fn store_raw(&self, key: &str, value: Value) -> TreeResult<()> {
        if value.is_null() {
            self.object().remove(key);
            return Ok(());
        }
        value
            .validate()
            .map_err(|e| TreeError::invalid_type(key, e.to_string()))?;
        self.object().insert(key, value.deep_clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use burrow_types::{ObjectRef, Value};
    use serde::{Deserialize, Serialize};

    use crate::error::TreeError;
    use crate::node::tests::fresh;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        title: String,
        done: bool,
    }

    fn task(title: &str) -> Task {
        Task {
            title: title.into(),
            done: false,
        }
    }

    // -----------------------------------------------------------------------
    // put
    // -----------------------------------------------------------------------

    #[test]
    fn put_chains() {
        let (_, root) = fresh();
        root.put("a", 1).unwrap().put("b", "two").unwrap().put("c", true).unwrap();
        assert_eq!(root.children(), vec!["a", "b", "c"]);
    }

    #[test]
    fn put_none_removes_key() {
        let (_, root) = fresh();
        root.put("k", "v").unwrap();
        root.put("k", None::<String>).unwrap();
        assert!(!root.has_child("k"));
    }

    #[test]
    fn put_overwrites_in_place() {
        let (_, root) = fresh();
        root.put("a", 1).unwrap();
        root.put("b", 2).unwrap();
        root.put("a", "one").unwrap();
        assert_eq!(root.children(), vec!["a", "b"]);
        assert_eq!(root.get_string("a", ""), "one");
    }

    #[test]
    fn put_rejects_non_finite() {
        let (_, root) = fresh();
        let err = root.put("k", f64::NAN).unwrap_err();
        assert!(matches!(err, TreeError::InvalidType { .. }));
        assert!(!root.has_child("k"));
    }

    #[test]
    fn put_does_not_commit() {
        let (store, root) = fresh();
        root.put("k", 1).unwrap();
        assert_eq!(store.commit_count(), 0);
        root.commit().unwrap();
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn put_raw_object_is_copied() {
        let (_, root) = fresh();
        let external = ObjectRef::new();
        external.insert("x", Value::from(1));
        root.put("copy", Value::Object(external.clone())).unwrap();

        external.insert("x", Value::from(2));
        assert_eq!(root.node("copy").unwrap().get_number("x", 0), 1);
    }

    #[test]
    fn put_own_object_cannot_create_cycle() {
        let (_, root) = fresh();
        root.put("a", 1).unwrap();
        root.put("self", Value::Object(root.object().clone())).unwrap();
        let inner = root.node("self").unwrap();
        assert!(!inner.same_object(&root));
        assert_eq!(inner.children(), vec!["a"]);
        root.commit().unwrap();
    }

    // -----------------------------------------------------------------------
    // put_object / put_list / put_all
    // -----------------------------------------------------------------------

    #[test]
    fn put_object_creates_independent_node() {
        let (_, root) = fresh();
        root.put_object("t", &task("write")).unwrap();
        let node = root.node("t").unwrap();
        assert_eq!(node.get_string("title", ""), "write");
        assert!(!node.get_boolean("done", true));
    }

    #[test]
    fn put_object_rejects_non_objects() {
        let (_, root) = fresh();
        let err = root.put_object("n", &5).unwrap_err();
        assert!(matches!(err, TreeError::InvalidType { .. }));
        let err = root.put_object("l", &vec![1, 2]).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn put_object_accepts_maps() {
        let (_, root) = fresh();
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 3);
        root.put_object("m", &map).unwrap();
        assert_eq!(root.node("m").unwrap().get_number("k", 0), 3);
    }

    fn tuple_keyed() -> HashMap<(i32, i32), i32> {
        HashMap::from([((1, 2), 3)])
    }

    #[test]
    fn put_object_mapping_failure_stores_nothing() {
        let (_, root) = fresh();
        let err = root.put_object("grid", &tuple_keyed()).unwrap_err();
        assert!(matches!(err, TreeError::InvalidType { ref key, .. } if key == "grid"));
        assert!(!root.has_child("grid"));
    }

    #[test]
    fn put_list_mapping_failure_stores_nothing() {
        let (_, root) = fresh();
        root.put_list("cells", &[1]).unwrap();
        let err = root.put_list("cells", &[tuple_keyed()]).unwrap_err();
        assert!(matches!(err, TreeError::InvalidType { ref key, .. } if key == "cells"));
        assert_eq!(root.get_list::<i64>("cells").unwrap(), vec![1]);

        assert!(root.put_list("fresh", &[tuple_keyed()]).is_err());
        assert!(!root.has_child("fresh"));
    }

    #[test]
    fn put_empty_list() {
        let (_, root) = fresh();
        root.put_list::<Task>("tasks", &[]).unwrap();
        assert_eq!(root.get("tasks"), Some(Value::Array(Vec::new())));
        assert!(root.get_list::<Task>("tasks").unwrap().is_empty());
    }

    #[test]
    fn put_all_writes_raw_entries() {
        let (_, root) = fresh();
        root.put("gone", 1).unwrap();
        root.put_all(vec![
            ("a", Value::from(1)),
            ("b", Value::from("x")),
            ("gone", Value::Null),
        ])
        .unwrap();
        assert_eq!(root.children(), vec!["a", "b"]);
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    #[test]
    fn add_item_requires_existing_list() {
        let (_, root) = fresh();
        let err = root.add_item("missing", 1).unwrap_err();
        assert!(matches!(err, TreeError::NotExists { ref key, .. } if key == "missing"));
        assert!(!root.has_child("missing"));

        root.put("scalar", 1).unwrap();
        assert!(matches!(root.add_item("scalar", 1), Err(TreeError::NotExists { .. })));
    }

    #[test]
    fn add_item_appends_in_order() {
        let (_, root) = fresh();
        root.put_list("names", &["a"]).unwrap();
        root.add_item("names", "b").unwrap();
        root.add_item("names", "c").unwrap();
        assert_eq!(root.get_list::<String>("names").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_object_appends_mapped() {
        let (_, root) = fresh();
        root.put_list("tasks", &[task("one")]).unwrap();
        root.add_object("tasks", &task("two")).unwrap();
        let tasks = root.get_list::<Task>("tasks").unwrap();
        assert_eq!(tasks.last(), Some(&task("two")));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn remove_item_returns_element() {
        let (_, root) = fresh();
        root.put_list("n", &[10, 20, 30]).unwrap();
        assert_eq!(root.remove_item("n", 1).unwrap(), Value::from(20));
        assert_eq!(root.get_list::<i64>("n").unwrap(), vec![10, 30]);
    }

    #[test]
    fn remove_item_out_of_bounds() {
        let (_, root) = fresh();
        root.put_list("n", &[1]).unwrap();
        let err = root.remove_item("n", 5).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
        assert_eq!(root.get_list::<i64>("n").unwrap(), vec![1]);
    }

    #[test]
    fn remove_item_on_non_list() {
        let (_, root) = fresh();
        root.put("s", "x").unwrap();
        assert!(matches!(root.remove_item("s", 0), Err(TreeError::InvalidType { .. })));
        assert!(matches!(root.remove_item("missing", 0), Err(TreeError::InvalidType { .. })));
    }
}
