//! Relative node paths.
//!
//! A node path is either a single key (`"users"`) or a sequence of keys
//! separated by `/` (`"users/alice/settings"`). Parsing rules:
//! - One leading `/` is stripped (`"/users"` is the same as `"users"`)
//! - One trailing `/` is ignored (`"users/"` is the same as `"users"`)
//! - The path must be non-empty after stripping
//! - Components between slashes must be non-empty (`"a//b"` is rejected)

use std::fmt;
use std::str::FromStr;

use crate::error::{TypeError, TypeResult};

/// Path separator between node keys.
pub const SEPARATOR: char = '/';

/// A parsed relative path from one node to a descendant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// Parse a key or slash-delimited relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow_types::NodePath;
    ///
    /// let path = NodePath::parse("/users/alice").unwrap();
    /// assert_eq!(path.segments(), ["users", "alice"]);
    /// assert!(NodePath::parse("").is_err());
    /// assert!(NodePath::parse("a//b").is_err());
    /// ```
    pub fn parse(input: &str) -> TypeResult<Self> {
        let trimmed = input.strip_prefix(SEPARATOR).unwrap_or(input);
        let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Err(TypeError::InvalidPath {
                path: input.to_string(),
                reason: "path must not be empty".into(),
            });
        }

        let mut segments = Vec::new();
        for component in trimmed.split(SEPARATOR) {
            if component.is_empty() {
                return Err(TypeError::InvalidPath {
                    path: input.to_string(),
                    reason: "path components must not be empty".into(),
                });
            }
            segments.push(component.to_string());
        }

        Ok(Self { segments })
    }

    /// The keys of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Append this path onto an absolute base path (`""` for the root).
    ///
    /// ```
    /// use burrow_types::NodePath;
    ///
    /// let path = NodePath::parse("b/c").unwrap();
    /// assert_eq!(path.join_onto("/a"), "/a/b/c");
    /// assert_eq!(path.join_onto(""), "/b/c");
    /// ```
    pub fn join_onto(&self, base: &str) -> String {
        let mut joined = String::from(base);
        for segment in &self.segments {
            joined.push(SEPARATOR);
            joined.push_str(segment);
        }
        joined
    }
}

impl FromStr for NodePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join_onto(""))
    }
}
