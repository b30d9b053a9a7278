//! Node handles and navigation.
//!
//! A [`Node`] holds three things: the shared root of the document, the
//! object it points at, and the path it was reached by. The path is for
//! diagnostics only; all lookups go through the live object reference.
//!
//! Handles are never cached. Every call to [`Node::node`] builds a fresh
//! handle, which is cheap: it is a few reference-count bumps and a string.

use std::fmt;
use std::rc::Rc;

use burrow_types::{Map, NodePath, ObjectRef, Value};
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::gate::CommitGate;
use crate::query::Query;

/// Handle onto one object of a shared document tree.
///
/// Once the object a handle points at is deleted through another handle,
/// the handle is detached: it still works, but nothing written through it
/// is reachable from the root or will ever be committed.
#[derive(Clone)]
pub struct Node {
    root: ObjectRef,
    object: ObjectRef,
    path: String,
    gate: Rc<CommitGate>,
}

impl Node {
    /// Handle onto the root object of a document.
    pub fn new_root(root: ObjectRef, gate: Rc<CommitGate>) -> Self {
        Self {
            object: root.clone(),
            root,
            path: String::new(),
            gate,
        }
    }

    /// Handle onto `object`, a direct child of this node stored under `key`.
    pub(crate) fn child(&self, key: &str, object: ObjectRef) -> Self {
        Self {
            root: self.root.clone(),
            object,
            path: format!("{}/{}", self.path, key),
            gate: Rc::clone(&self.gate),
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Enter the node at `name_or_path`, creating any missing objects on the
    /// way.
    ///
    /// `name_or_path` is a key or a relative path such as `"users/alice"`;
    /// a leading `/` is ignored. Creation mutates the tree but does not
    /// commit it.
    ///
    /// Fails with [`TreeError::NodeCreation`] if the path is malformed or an
    /// existing non-object value sits where a node is needed. Existing
    /// values are never overwritten.
    pub fn node(&self, name_or_path: &str) -> TreeResult<Node> {
        let parsed = NodePath::parse(name_or_path).map_err(|e| TreeError::NodeCreation {
            path: name_or_path.to_string(),
            reason: e.to_string(),
        })?;

        let path = parsed.join_onto(&self.path);
        let mut current = self.object.clone();

        for segment in parsed.segments() {
            let next = {
                let mut map = current.borrow_mut();
                match map.get(segment.as_str()) {
                    Some(Value::Object(existing)) => existing.clone(),
                    None | Some(Value::Null) => {
                        let created = ObjectRef::new();
                        map.insert(segment.clone(), Value::Object(created.clone()));
                        debug!(path = %path, key = %segment, "node created");
                        created
                    }
                    Some(other) => {
                        return Err(TreeError::NodeCreation {
                            reason: format!("existing {} value at {segment:?} is not a node", other.kind()),
                            path,
                        });
                    }
                }
            };
            current = next;
        }

        Ok(Node {
            root: self.root.clone(),
            object: current,
            path,
            gate: Rc::clone(&self.gate),
        })
    }

    /// Returns `true` if `key` holds any entry (node or value) directly
    /// under this node.
    pub fn has_child(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    /// Remove the entry `name` directly under this node and commit the whole
    /// document.
    ///
    /// Returns whether the entry existed. Unlike every other mutation this
    /// one persists itself; no separate [`Node::commit`] is needed. If the
    /// commit fails the entry stays removed in memory and the error is
    /// returned.
    pub fn delete(&self, name: &str) -> TreeResult<bool> {
        let existed = self.object.remove(name).is_some();
        debug!(path = %self.path, key = name, existed, "entry deleted");
        self.commit()?;
        Ok(existed)
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    /// Every key directly under this node, nodes and values alike, in
    /// insertion order.
    pub fn children(&self) -> Vec<String> {
        self.object.keys()
    }

    /// All entries of this node that are not nodes.
    ///
    /// Returns `None` when there are none, rather than an empty map.
    pub fn data(&self) -> Option<Map> {
        let data: Map = self
            .object
            .borrow()
            .iter()
            .filter(|(_, v)| !v.is_object())
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect();
        if data.is_empty() {
            None
        } else {
            Some(data)
        }
    }

    /// A copy of the raw entry under `key`.
    ///
    /// Nested objects come back as independent copies; use [`Node::node`]
    /// for a live handle.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.object.get(key).map(|v| v.deep_clone())
    }

    /// Number of entries directly under this node.
    pub fn len(&self) -> usize {
        self.object.len()
    }

    /// Returns `true` if this node has no entries.
    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Path from the root to this node (`""` for the root itself).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// Returns `true` if this handle points at the document root.
    pub fn is_root(&self) -> bool {
        self.object.ptr_eq(&self.root)
    }

    /// Returns `true` if both handles point at the same object.
    pub fn same_object(&self, other: &Node) -> bool {
        self.object.ptr_eq(&other.object)
    }

    /// Returns `true` if this node can still be reached from the root by
    /// its recorded path.
    pub fn is_attached(&self) -> bool {
        let mut current = self.root.clone();
        for key in self.path.split('/').filter(|k| !k.is_empty()) {
            match current.child_object(key) {
                Some(next) => current = next,
                None => return false,
            }
        }
        current.ptr_eq(&self.object)
    }

    /// Independent copy of this node's subtree.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.object.deep_clone())
    }

    // -----------------------------------------------------------------------
    // Query and commit
    // -----------------------------------------------------------------------

    /// Start a query over the sub-nodes of this node.
    pub fn query(&self) -> Query {
        Query::new(self.clone())
    }

    /// Persist the entire document, not only this node's subtree.
    ///
    /// Runs synchronously. Handles stay valid afterwards.
    pub fn commit(&self) -> TreeResult<()> {
        self.gate.commit(&self.root)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path)
            .field("entries", &self.object.len())
            .finish()
    }
}
