//! Persistent location tracker for the value under validation.
//!
//! A [`BreadCrumb`] is a reference-counted singly-linked list. Pushing a
//! segment allocates one node that points at its parent, so sibling branches
//! of a recursive descent share their common prefix and never observe each
//! other's segments.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// One step into a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// An object property name.
    Key(String),
    /// An array index.
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

#[derive(Debug)]
struct Node {
    segment: Segment,
    parent: Option<Arc<Node>>,
    depth: usize,
}

/// Immutable path from the root of the data to the current value.
#[derive(Debug, Clone, Default)]
pub struct BreadCrumb {
    head: Option<Arc<Node>>,
}

impl BreadCrumb {
    /// The root location.
    pub fn empty() -> Self {
        Self { head: None }
    }

    /// A new location with `segment` appended. `self` is left unchanged.
    pub fn push(&self, segment: impl Into<Segment>) -> Self {
        let depth = self.len() + 1;
        Self {
            head: Some(Arc::new(Node {
                segment: segment.into(),
                parent: self.head.clone(),
                depth,
            })),
        }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The segments from the root outwards.
    pub fn to_chain(&self) -> Vec<Segment> {
        let mut chain = Vec::with_capacity(self.len());
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            chain.push(node.segment.clone());
            cursor = node.parent.as_deref();
        }
        chain.reverse();
        chain
    }
}

impl PartialEq for BreadCrumb {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.to_chain() == other.to_chain()
    }
}

impl Eq for BreadCrumb {}

impl fmt::Display for BreadCrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in self.to_chain() {
            match segment {
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for BreadCrumb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_chain().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_segments() {
        let root = BreadCrumb::empty();
        assert!(root.is_empty());
        assert!(root.to_chain().is_empty());
        assert_eq!(root.to_string(), "$");
    }

    #[test]
    fn push_leaves_parent_untouched() {
        let root = BreadCrumb::empty();
        let items = root.push("items");
        let first = items.push(0usize);
        let second = items.push(1usize);

        assert!(root.is_empty());
        assert_eq!(items.to_chain(), vec![Segment::from("items")]);
        assert_eq!(
            first.to_chain(),
            vec![Segment::from("items"), Segment::Index(0)]
        );
        assert_eq!(
            second.to_chain(),
            vec![Segment::from("items"), Segment::Index(1)]
        );
    }

    #[test]
    fn display_renders_path() {
        let crumb = BreadCrumb::empty().push("items").push(1usize).push("name");
        assert_eq!(crumb.to_string(), "$.items[1].name");
        assert_eq!(crumb.len(), 3);
    }

    #[test]
    fn equality_is_structural() {
        let a = BreadCrumb::empty().push(1usize).push("name");
        let b = BreadCrumb::empty().push(1usize).push("name");
        assert_eq!(a, b);
        assert_ne!(a, BreadCrumb::empty().push(1usize));
    }

    #[test]
    fn serializes_as_chain() {
        let crumb = BreadCrumb::empty().push(1usize).push(0usize).push("name");
        let json = serde_json::to_value(&crumb).unwrap();
        assert_eq!(json, serde_json::json!([1, 0, "name"]));
    }

    #[test]
    fn shared_across_threads() {
        let base = BreadCrumb::empty().push("root");
        let handles: Vec<_> = (0..4usize)
            .map(|i| {
                let base = base.clone();
                std::thread::spawn(move || base.push(i).to_string())
            })
            .collect();
        let rendered: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(rendered[2], "$.root[2]");
        assert_eq!(base.to_string(), "$.root");
    }
}
