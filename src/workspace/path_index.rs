use std::collections::HashMap;

use crate::path_util::key_segments;

/// Maps folder keys to values and answers "which stored key contains this
/// path" queries.
///
/// Keys are stored as a trie over their path segments, so a containment
/// query walks the query's segments once and costs O(depth) regardless of
/// how many folders are stored. Matching is on whole segments: `/foo` does
/// not contain `/foobar`.
#[derive(Debug)]
pub struct PathIndex<T> {
    root: Node<T>,
    ignore_case: bool,
}

#[derive(Debug)]
struct Node<T> {
    children: HashMap<String, Node<T>>,
    value: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

impl<T> PathIndex<T> {
    pub fn new(ignore_case: bool) -> Self {
        Self {
            root: Node::default(),
            ignore_case,
        }
    }

    /// Inserts a value under `key`, replacing any previous value stored
    /// under an equivalent key.
    pub fn insert(&mut self, key: &str, value: T) {
        let mut node = &mut self.root;
        for segment in key_segments(key, self.ignore_case) {
            node = node.children.entry(segment).or_default();
        }
        node.value = Some(value);
    }

    /// The value stored under exactly `key`, if any.
    pub fn get_exact(&self, key: &str) -> Option<&T> {
        let mut node = &self.root;
        for segment in key_segments(key, self.ignore_case) {
            node = node.children.get(&segment)?;
        }
        node.value.as_ref()
    }

    /// The value stored under the deepest key that is an ancestor of, or
    /// equal to, `query`.
    pub fn find_containing(&self, query: &str) -> Option<&T> {
        let mut node = &self.root;
        let mut best = None;
        for segment in key_segments(query, self.ignore_case) {
            match node.children.get(&segment) {
                Some(child) => {
                    if child.value.is_some() {
                        best = child.value.as_ref();
                    }
                    node = child;
                }
                None => break,
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(keys: &[&str], ignore_case: bool) -> PathIndex<String> {
        let mut index = PathIndex::new(ignore_case);
        for key in keys {
            index.insert(key, key.to_string());
        }
        index
    }

    #[test]
    fn exact_and_nested_lookups() {
        let index = index(&["file:///a", "file:///x"], false);

        assert_eq!(index.get_exact("file:///a").unwrap(), "file:///a");
        assert_eq!(index.get_exact("file:///a/b"), None);
        assert_eq!(
            index.find_containing("file:///a/b/c.txt").unwrap(),
            "file:///a"
        );
        assert_eq!(index.find_containing("file:///a").unwrap(), "file:///a");
        assert_eq!(index.find_containing("file:///z/q"), None);
    }

    #[test]
    fn deepest_ancestor_wins() {
        let index = index(&["file:///a", "file:///a/b"], false);

        assert_eq!(
            index.find_containing("file:///a/b/c").unwrap(),
            "file:///a/b"
        );
        assert_eq!(index.find_containing("file:///a/x").unwrap(), "file:///a");
    }

    #[test]
    fn matches_whole_segments_only() {
        let index = index(&["file:///foo"], false);

        assert_eq!(index.find_containing("file:///foobar/x"), None);
        assert_eq!(index.find_containing("file:///foo/x").unwrap(), "file:///foo");
    }

    #[test]
    fn case_folding_is_opt_in() {
        let folded = index(&["file:///A"], true);
        assert_eq!(folded.find_containing("file:///a/b").unwrap(), "file:///A");

        let exact = index(&["file:///A"], false);
        assert_eq!(exact.find_containing("file:///a/b"), None);
    }

    #[test]
    fn reinsert_replaces_value() {
        let mut index = PathIndex::new(false);
        index.insert("file:///a", 1);
        index.insert("file:///a/", 2);

        assert_eq!(index.get_exact("file:///a"), Some(&2));
    }
}
