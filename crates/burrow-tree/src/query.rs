//! Filtering and sorting the sub-nodes of a node.
//!
//! A [`Query`] looks at the object-valued children of one node, one level
//! deep. Scalars and lists stored next to them are skipped. Predicates are
//! combined with AND; an entry whose field is missing or null never matches
//! a field predicate.
//!
//! ```
//! use std::rc::Rc;
//! use burrow_store::InMemoryRootStore;
//! use burrow_tree::{CommitGate, Node, ObjectRef, Order};
//!
//! let gate = Rc::new(CommitGate::new(Box::new(InMemoryRootStore::new())));
//! let root = Node::new_root(ObjectRef::new(), gate);
//! let users = root.node("users").unwrap();
//! users.node("ada").unwrap().put("age", 36).unwrap();
//! users.node("alan").unwrap().put("age", 41).unwrap();
//! users.node("grace").unwrap().put("age", 85).unwrap();
//!
//! let keys = users
//!     .query()
//!     .where_lt("age", 50)
//!     .order_by("age", Order::Descending)
//!     .keys();
//! assert_eq!(keys, vec!["alan", "ada"]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use burrow_types::Value;

use crate::node::Node;

/// Sort direction for [`Query::order_by`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    fn holds(self, actual: &Value, expected: &Value) -> bool {
        let ordering = actual.compare(expected);
        let equal = ordering == Some(Ordering::Equal) || actual == expected;
        match self {
            Self::Eq => equal,
            Self::Ne => !equal,
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

enum Predicate {
    Compare {
        field: String,
        op: Comparison,
        value: Value,
    },
    Exists(String),
    Custom(Box<dyn Fn(&Node) -> bool>),
}

impl Predicate {
    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Compare { field, op, value } => match node.get(field) {
                None | Some(Value::Null) => false,
                Some(actual) => op.holds(&actual, value),
            },
            Self::Exists(field) => node.get(field).is_some_and(|v| !v.is_null()),
            Self::Custom(f) => f(node),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { field, op, value } => write!(f, "{field} {op:?} {value}"),
            Self::Exists(field) => write!(f, "{field} exists"),
            Self::Custom(_) => f.write_str("<filter>"),
        }
    }
}

/// Builder for a query over the sub-nodes of one node.
///
/// Created by [`Node::query`]. Nothing is evaluated until [`Query::run`],
/// [`Query::keys`] or [`Query::count`] is called, and evaluation never
/// mutates the tree.
pub struct Query {
    node: Node,
    predicates: Vec<Predicate>,
    order: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Query {
    /// Query over the sub-nodes of `node`, matching all of them.
    pub fn new(node: Node) -> Self {
        Self {
            node,
            predicates: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Keep entries whose `field` equals `value`.
    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Eq, value.into())
    }

    /// Keep entries whose `field` is present and differs from `value`.
    pub fn where_ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Ne, value.into())
    }

    /// Keep entries whose `field` is greater than `value`.
    pub fn where_gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Gt, value.into())
    }

    /// Keep entries whose `field` is greater than or equal to `value`.
    pub fn where_ge(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Ge, value.into())
    }

    /// Keep entries whose `field` is less than `value`.
    pub fn where_lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Lt, value.into())
    }

    /// Keep entries whose `field` is less than or equal to `value`.
    pub fn where_le(self, field: &str, value: impl Into<Value>) -> Self {
        self.compare(field, Comparison::Le, value.into())
    }

    /// Keep entries that have a non-null `field`.
    pub fn where_exists(mut self, field: &str) -> Self {
        self.predicates.push(Predicate::Exists(field.to_string()));
        self
    }

    /// Keep entries for which `f` returns `true`.
    pub fn filter(mut self, f: impl Fn(&Node) -> bool + 'static) -> Self {
        self.predicates.push(Predicate::Custom(Box::new(f)));
        self
    }

    /// Sort results by `field`. The sort is stable, and entries without
    /// the field come last in either direction.
    pub fn order_by(mut self, field: &str, order: Order) -> Self {
        self.order = Some((field.to_string(), order));
        self
    }

    /// Return at most `n` results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Evaluate the query and return handles onto the matching sub-nodes.
    pub fn run(&self) -> Vec<Node> {
        self.evaluate().into_iter().map(|(_, node)| node).collect()
    }

    /// Keys of the matching sub-nodes, in result order.
    pub fn keys(&self) -> Vec<String> {
        self.evaluate().into_iter().map(|(key, _)| key).collect()
    }

    /// Number of matching sub-nodes, after any limit.
    pub fn count(&self) -> usize {
        self.evaluate().len()
    }

    fn evaluate(&self) -> Vec<(String, Node)> {
        let mut matched: Vec<(String, Node)> = self
            .node
            .object()
            .entries()
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Object(object) => {
                    let child = self.node.child(&key, object);
                    Some((key, child))
                }
                _ => None,
            })
            .filter(|(_, child)| self.predicates.iter().all(|p| p.matches(child)))
            .collect();

        if let Some((field, order)) = &self.order {
            matched = sort_by_field(matched, field, *order);
        }
        if let Some(n) = self.limit {
            matched.truncate(n);
        }
        matched
    }

    fn compare(mut self, field: &str, op: Comparison, value: Value) -> Self {
        self.predicates.push(Predicate::Compare {
            field: field.to_string(),
            op,
            value,
        });
        self
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("path", &self.node.path())
            .field("predicates", &self.predicates)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .finish()
    }
}

fn sort_by_field(entries: Vec<(String, Node)>, field: &str, order: Order) -> Vec<(String, Node)> {
    let (mut present, missing): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .map(|(key, node)| (node.get(field).unwrap_or_default(), key, node))
        .partition(|(value, _, _)| !value.is_null());

    present.sort_by(|(a, _, _), (b, _, _)| {
        let ordering = sort_key_cmp(a, b);
        match order {
            Order::Ascending => ordering,
            Order::Descending => ordering.reverse(),
        }
    });

    present
        .into_iter()
        .chain(missing)
        .map(|(_, key, node)| (key, node))
        .collect()
}

/// Total order over sort keys: numbers, then strings, then booleans, then
/// everything else (all equal).
fn sort_key_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Integer(_) | Value::Double(_) => 0,
            Value::String(_) => 1,
            Value::Bool(_) => 2,
            _ => 3,
        }
    }
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.compare(b).unwrap_or(Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::tests::fresh;

    fn people() -> Node {
        let (_, root) = fresh();
        let people = root.node("people").unwrap();
        for (name, age, city) in [
            ("ada", 36, Some("london")),
            ("alan", 41, Some("wilmslow")),
            ("grace", 85, None),
            ("linus", 28, Some("portland")),
        ] {
            let person = people.node(name).unwrap();
            person.put("age", age).unwrap();
            person.put("city", city).unwrap();
        }
        people.put("count", 4).unwrap();
        people
    }

    #[test]
    fn unfiltered_query_lists_sub_nodes_only() {
        let people = people();
        assert_eq!(people.query().keys(), vec!["ada", "alan", "grace", "linus"]);
        assert_eq!(people.query().count(), 4);
    }

    #[test]
    fn results_are_live_handles() {
        let people = people();
        let results = people.query().where_eq("age", 36).run();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path(), "/people/ada");
        results[0].put("age", 37).unwrap();
        assert_eq!(people.node("ada").unwrap().get_number("age", 0), 37);
    }

    #[test]
    fn comparisons() {
        let people = people();
        assert_eq!(people.query().where_gt("age", 40).keys(), vec!["alan", "grace"]);
        assert_eq!(people.query().where_ge("age", 41).keys(), vec!["alan", "grace"]);
        assert_eq!(people.query().where_lt("age", 36).keys(), vec!["linus"]);
        assert_eq!(people.query().where_le("age", 36).keys(), vec!["ada", "linus"]);
        assert_eq!(people.query().where_gt("age", 40.5).count(), 2);
    }

    #[test]
    fn predicates_combine_with_and() {
        let people = people();
        let keys = people
            .query()
            .where_gt("age", 30)
            .where_lt("age", 50)
            .keys();
        assert_eq!(keys, vec!["ada", "alan"]);
    }

    #[test]
    fn missing_fields_never_match() {
        let people = people();
        assert_eq!(people.query().where_ne("city", "london").keys(), vec!["alan", "linus"]);
        assert_eq!(people.query().where_exists("city").count(), 3);
        assert_eq!(people.query().where_eq("nope", 1).count(), 0);
    }

    #[test]
    fn incomparable_kinds_do_not_match() {
        let people = people();
        assert_eq!(people.query().where_gt("age", "30").count(), 0);
        assert_eq!(people.query().where_eq("age", "36").count(), 0);
    }

    #[test]
    fn custom_filter() {
        let people = people();
        let keys = people
            .query()
            .filter(|n| n.get_string("city", "").starts_with('w'))
            .keys();
        assert_eq!(keys, vec!["alan"]);
    }

    #[test]
    fn order_and_limit() {
        let people = people();
        let asc = people.query().order_by("age", Order::Ascending).keys();
        assert_eq!(asc, vec!["linus", "ada", "alan", "grace"]);

        let oldest = people
            .query()
            .order_by("age", Order::Descending)
            .limit(2)
            .keys();
        assert_eq!(oldest, vec!["grace", "alan"]);
    }

    #[test]
    fn missing_sort_keys_come_last() {
        let people = people();
        let asc = people.query().order_by("city", Order::Ascending).keys();
        assert_eq!(asc, vec!["ada", "linus", "alan", "grace"]);
        let desc = people.query().order_by("city", Order::Descending).keys();
        assert_eq!(desc, vec!["alan", "linus", "ada", "grace"]);
    }

    #[test]
    fn mixed_sort_keys_do_not_panic() {
        let (_, root) = fresh();
        let items = root.node("items").unwrap();
        items.node("a").unwrap().put("k", "text").unwrap();
        items.node("b").unwrap().put("k", 2.5).unwrap();
        items.node("c").unwrap().put("k", true).unwrap();
        items.node("d").unwrap().put("k", 1).unwrap();
        items.node("e").unwrap().node("k").unwrap();

        let keys = items.query().order_by("k", Order::Ascending).keys();
        assert_eq!(keys, vec!["d", "b", "a", "c", "e"]);
    }

    #[test]
    fn query_does_not_mutate_or_commit() {
        let (store, root) = fresh();
        root.node("a").unwrap().put("x", 1).unwrap();
        let before = root.snapshot();
        let _ = root.query().where_eq("missing", 1).order_by("x", Order::Ascending).run();
        assert_eq!(root.snapshot(), before);
        assert_eq!(store.commit_count(), 0);
    }
}
